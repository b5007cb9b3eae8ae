//! Two dice, bet on the exact sum

use crate::errors::BetRejection;
use crate::games::types::{BetRecord, GameOutcome, GameType, OpenRound};
use crate::ledger::{net_stake, Ledger};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const TARGET_RANGE: RangeInclusive<u8> = 2..=12;
pub const DEFAULT_TARGET: u8 = 7;
pub const DICE_MULTIPLIER: f64 = 6.0;

/// Net stake times six when the sum hits the target, else nothing
pub fn dice_payout(dice: [u8; 2], target: u8, stake: u64) -> f64 {
    if dice[0] + dice[1] == target {
        net_stake(stake) * DICE_MULTIPLIER
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DicePhase {
    Idle,
    Rolling,
}

impl fmt::Display for DicePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DicePhase::Idle => write!(f, "idle"),
            DicePhase::Rolling => write!(f, "rolling"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiceView {
    pub phase: DicePhase,
    pub dice: [u8; 2],
    pub target: u8,
}

#[derive(Debug, Clone)]
pub struct DiceSession {
    phase: DicePhase,
    dice: [u8; 2],
    target: u8,
    round: Option<OpenRound>,
}

impl DiceSession {
    /// Idle table targeting 7
    pub fn new() -> Self {
        Self {
            phase: DicePhase::Idle,
            dice: [1, 1],
            target: DEFAULT_TARGET,
            round: None,
        }
    }

    /// Current phase of the table
    pub fn phase(&self) -> DicePhase {
        self.phase
    }

    /// Allowed at any time; a roll in flight picks up the new target
    pub fn select_target(&mut self, target: u8) -> Result<(), BetRejection> {
        if !TARGET_RANGE.contains(&target) {
            return Err(BetRejection::InvalidTarget(target));
        }
        self.target = target;
        Ok(())
    }

    /// Start a roll, optionally setting the target in the same step
    pub fn begin_with(
        &mut self,
        ledger: &mut Ledger,
        stake: u64,
        target: Option<u8>,
    ) -> Result<OpenRound, BetRejection> {
        if let Some(target) = target {
            if !TARGET_RANGE.contains(&target) {
                return Err(BetRejection::InvalidTarget(target));
            }
        }
        if self.phase == DicePhase::Rolling {
            return Err(BetRejection::RoundInProgress(GameType::Dice));
        }
        ledger.try_debit(stake)?;

        if let Some(target) = target {
            self.target = target;
        }
        let round = OpenRound::new(GameType::Dice, stake);
        self.round = Some(round.clone());
        self.phase = DicePhase::Rolling;
        Ok(round)
    }

    /// Record an animation frame while rolling
    pub fn show_frame(&mut self, dice: [u8; 2]) {
        if self.phase == DicePhase::Rolling {
            self.dice = dice;
        }
    }

    /// The target is read here, not at start
    pub fn settle(&mut self, dice: [u8; 2]) -> Option<BetRecord> {
        let round = self.round.take()?;
        self.dice = dice;
        self.phase = DicePhase::Idle;

        let target = self.target;
        let payout = dice_payout(dice, target, round.stake);
        Some(round.settle(payout, GameOutcome::Dice { dice, target }))
    }

    /// Snapshot of target, dice and phase
    pub fn view(&self) -> DiceView {
        DiceView {
            phase: self.phase,
            dice: self.dice,
            target: self.target,
        }
    }
}

impl Default for DiceSession {
    fn default() -> Self {
        Self::new()
    }
}
