//! Three-reel slot machine

use crate::errors::BetRejection;
use crate::games::types::{BetRecord, GameOutcome, GameType, OpenRound, SlotSymbol};
use crate::ledger::{net_stake, Ledger};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TRIPLE_MULTIPLIER: f64 = 10.0;
pub const PAIR_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotsPhase {
    Idle,
    Spinning,
}

impl fmt::Display for SlotsPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotsPhase::Idle => write!(f, "idle"),
            SlotsPhase::Spinning => write!(f, "spinning"),
        }
    }
}

/// Multiplier for a final draw.
///
/// A triple pays 10x and suppresses the pair rule. Otherwise an adjacent
/// pair (first two or last two reels) pays 2x. Reels 0 and 2 matching alone
/// does not count.
pub fn slots_multiplier(reels: &[SlotSymbol; 3]) -> f64 {
    if reels[0] == reels[1] && reels[1] == reels[2] {
        TRIPLE_MULTIPLIER
    } else if reels[0] == reels[1] || reels[1] == reels[2] {
        PAIR_MULTIPLIER
    } else {
        0.0
    }
}

/// Payout for a final set of reels
pub fn slots_payout(reels: &[SlotSymbol; 3], stake: u64) -> f64 {
    net_stake(stake) * slots_multiplier(reels)
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotsView {
    pub phase: SlotsPhase,
    pub reels: [SlotSymbol; 3],
}

#[derive(Debug, Clone)]
pub struct SlotsSession {
    phase: SlotsPhase,
    reels: [SlotSymbol; 3],
    round: Option<OpenRound>,
}

impl SlotsSession {
    /// Idle machine
    pub fn new() -> Self {
        Self {
            phase: SlotsPhase::Idle,
            reels: [SlotSymbol::SlotMachine; 3],
            round: None,
        }
    }

    /// Current phase of the machine
    pub fn phase(&self) -> SlotsPhase {
        self.phase
    }

    /// Pay for a spin and lock the machine until it settles
    pub fn begin(&mut self, ledger: &mut Ledger, stake: u64) -> Result<OpenRound, BetRejection> {
        if self.phase == SlotsPhase::Spinning {
            return Err(BetRejection::RoundInProgress(GameType::Slots));
        }
        ledger.try_debit(stake)?;

        let round = OpenRound::new(GameType::Slots, stake);
        self.round = Some(round.clone());
        self.phase = SlotsPhase::Spinning;
        Ok(round)
    }

    /// Cosmetic intermediate reels
    pub fn show_frame(&mut self, reels: [SlotSymbol; 3]) {
        if self.phase == SlotsPhase::Spinning {
            self.reels = reels;
        }
    }

    /// Resolve the open spin against its final reels and return to idle
    pub fn settle(&mut self, reels: [SlotSymbol; 3]) -> Option<BetRecord> {
        let round = self.round.take()?;
        self.reels = reels;
        self.phase = SlotsPhase::Idle;

        let payout = slots_payout(&reels, round.stake);
        Some(round.settle(payout, GameOutcome::Slots { symbols: reels }))
    }

    /// Snapshot of reels and phase
    pub fn view(&self) -> SlotsView {
        SlotsView {
            phase: self.phase,
            reels: self.reels,
        }
    }
}

impl Default for SlotsSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::types::BetResult;
    use SlotSymbol::*;

    #[test]
    fn test_multiplier_precedence() {
        assert_eq!(slots_multiplier(&[Seven, Seven, Seven]), 10.0);
        assert_eq!(slots_multiplier(&[Seven, Seven, Cherry]), 2.0);
        assert_eq!(slots_multiplier(&[Cherry, Seven, Seven]), 2.0);
        assert_eq!(slots_multiplier(&[Seven, Cherry, Seven]), 0.0);
        assert_eq!(slots_multiplier(&[Gem, Star, Die]), 0.0);
    }

    #[test]
    fn test_payout_uses_net_stake() {
        assert_eq!(slots_payout(&[Gem, Gem, Gem], 100), 995.0);
        assert_eq!(slots_payout(&[Gem, Gem, Star], 100), 199.0);
        assert_eq!(slots_payout(&[Gem, Star, Die], 100), 0.0);
    }

    #[test]
    fn test_busy_machine_rejects_second_spin() {
        let mut ledger = Ledger::new(1_000.0);
        let mut session = SlotsSession::new();

        session.begin(&mut ledger, 100).unwrap();
        assert_eq!(session.phase(), SlotsPhase::Spinning);

        let err = session.begin(&mut ledger, 100).unwrap_err();
        assert_eq!(err, BetRejection::RoundInProgress(GameType::Slots));
        assert_eq!(ledger.balance(), 900.0);
    }

    #[test]
    fn test_unaffordable_spin_leaves_machine_idle() {
        let mut ledger = Ledger::new(50.0);
        let mut session = SlotsSession::new();

        assert!(session.begin(&mut ledger, 100).is_err());
        assert_eq!(session.phase(), SlotsPhase::Idle);
        assert!(session.settle([Gem; 3]).is_none());
    }

    #[test]
    fn test_settle_returns_to_idle() {
        let mut ledger = Ledger::new(1_000.0);
        let mut session = SlotsSession::new();
        let round = session.begin(&mut ledger, 100).unwrap();

        session.show_frame([Star, Die, Gem]);
        assert_eq!(session.view().reels, [Star, Die, Gem]);

        let record = session.settle([Cherry, Cherry, Cherry]).unwrap();
        assert_eq!(record.id, round.id);
        assert_eq!(record.result, BetResult::Win);
        assert_eq!(record.payout, 995.0);
        assert_eq!(session.phase(), SlotsPhase::Idle);

        // frames outside a spin are ignored
        session.show_frame([Star, Die, Gem]);
        assert_eq!(session.view().reels, [Cherry, Cherry, Cherry]);
    }
}
