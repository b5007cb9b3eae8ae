//! Balance ledger and fee arithmetic

use crate::errors::BetRejection;
use crate::games::types::FeeQuote;
use serde::{Deserialize, Serialize};

/// Share of every stake labelled as service fee
pub const FEE_RATE: f64 = 0.005;

/// Fee charged on `stake`
pub fn fee(stake: u64) -> f64 {
    stake as f64 * FEE_RATE
}

/// Stake left after the fee; payout multipliers apply to this
pub fn net_stake(stake: u64) -> f64 {
    stake as f64 - fee(stake)
}

/// Fee breakdown for display before a bet is placed
pub fn quote(stake: u64) -> FeeQuote {
    FeeQuote {
        stake,
        fee: fee(stake),
        net_stake: net_stake(stake),
    }
}

/// Player balance and cumulative fees.
///
/// The fee is an accounting label on the debited stake, not a second charge:
/// `debit` removes exactly `stake` from the balance and adds `fee(stake)` to
/// `total_fees_paid`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    balance: f64,
    total_fees_paid: f64,
}

impl Ledger {
    /// Create a ledger holding `initial_balance` with no fees booked
    pub fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance,
            total_fees_paid: 0.0,
        }
    }

    /// Current spendable balance
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Fees booked across every accepted stake
    pub fn total_fees_paid(&self) -> f64 {
        self.total_fees_paid
    }

    /// Unconditional debit; callers own the affordability check
    pub fn debit(&mut self, stake: u64) {
        self.balance -= stake as f64;
        self.total_fees_paid += fee(stake);
    }

    /// Add a settled payout to the balance
    pub fn credit(&mut self, payout: f64) {
        self.balance += payout;
    }

    /// Check and debit in one step. Nothing changes on rejection.
    pub fn try_debit(&mut self, stake: u64) -> Result<(), BetRejection> {
        if stake == 0 {
            return Err(BetRejection::InvalidStake);
        }
        self.ensure_affordable(stake)?;
        self.debit(stake);
        Ok(())
    }

    /// Stake bound check without mutation
    pub fn ensure_affordable(&self, stake: u64) -> Result<(), BetRejection> {
        if stake as f64 > self.balance {
            return Err(BetRejection::InsufficientBalance {
                stake,
                balance: self.balance,
            });
        }
        Ok(())
    }
}
