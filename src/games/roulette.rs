//! Single-zero roulette, color bets only

use crate::errors::BetRejection;
use crate::games::types::{BetRecord, GameOutcome, GameType, OpenRound, RouletteColor};
use crate::ledger::{net_stake, Ledger};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RED_POCKETS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Color of a wheel pocket (0 is green)
pub fn pocket_color(number: u8) -> RouletteColor {
    if number == 0 {
        RouletteColor::Green
    } else if RED_POCKETS.contains(&number) {
        RouletteColor::Red
    } else {
        RouletteColor::Black
    }
}

/// Payout multiplier on net stake for a winning color
pub fn color_multiplier(color: RouletteColor) -> f64 {
    match color {
        RouletteColor::Green => 35.0,
        RouletteColor::Red | RouletteColor::Black => 2.0,
    }
}

/// Payout for `chosen` when the ball lands on `number`
pub fn roulette_payout(chosen: RouletteColor, number: u8, stake: u64) -> f64 {
    if pocket_color(number) == chosen {
        net_stake(stake) * color_multiplier(chosen)
    } else {
        0.0
    }
}

/// `AwaitingColor` covers both "nothing chosen yet" and "ready to spin again";
/// the chosen color survives settlement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoulettePhase {
    AwaitingColor,
    Spinning,
}

impl fmt::Display for RoulettePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoulettePhase::AwaitingColor => write!(f, "awaiting color"),
            RoulettePhase::Spinning => write!(f, "spinning"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouletteView {
    pub phase: RoulettePhase,
    pub chosen: Option<RouletteColor>,
    pub last_number: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct RouletteSession {
    phase: RoulettePhase,
    chosen: Option<RouletteColor>,
    last_number: Option<u8>,
    round: Option<(OpenRound, RouletteColor)>,
}

impl RouletteSession {
    /// Wheel at rest with no color chosen
    pub fn new() -> Self {
        Self {
            phase: RoulettePhase::AwaitingColor,
            chosen: None,
            last_number: None,
            round: None,
        }
    }

    /// Current phase of the wheel
    pub fn phase(&self) -> RoulettePhase {
        self.phase
    }

    /// Pick the color for the next spin. An in-flight spin keeps its own.
    pub fn select(&mut self, color: RouletteColor) {
        self.chosen = Some(color);
    }

    /// Start a spin, optionally choosing the color in the same step.
    /// A rejected call leaves the previous choice untouched.
    pub fn begin_with(
        &mut self,
        ledger: &mut Ledger,
        stake: u64,
        color: Option<RouletteColor>,
    ) -> Result<OpenRound, BetRejection> {
        if self.phase == RoulettePhase::Spinning {
            return Err(BetRejection::RoundInProgress(GameType::Roulette));
        }
        let chosen = color.or(self.chosen).ok_or(BetRejection::NoColorSelected)?;
        ledger.try_debit(stake)?;

        let round = OpenRound::new(GameType::Roulette, stake);
        self.chosen = Some(chosen);
        self.round = Some((round.clone(), chosen));
        self.phase = RoulettePhase::Spinning;
        Ok(round)
    }

    /// Resolve the spin in flight. `None` when nothing is spinning.
    pub fn settle(&mut self, number: u8) -> Option<BetRecord> {
        let (round, chosen) = self.round.take()?;
        self.last_number = Some(number);
        self.phase = RoulettePhase::AwaitingColor;

        let payout = roulette_payout(chosen, number, round.stake);
        Some(round.settle(
            payout,
            GameOutcome::Roulette {
                number,
                landed: pocket_color(number),
                chosen,
            },
        ))
    }

    /// Snapshot of choice, phase and last pocket
    pub fn view(&self) -> RouletteView {
        RouletteView {
            phase: self.phase,
            chosen: self.chosen,
            last_number: self.last_number,
        }
    }
}

impl Default for RouletteSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::types::BetResult;

    #[test]
    fn test_pocket_classification() {
        assert_eq!(pocket_color(0), RouletteColor::Green);
        assert_eq!(pocket_color(14), RouletteColor::Red);
        assert_eq!(pocket_color(36), RouletteColor::Red);
        assert_eq!(pocket_color(2), RouletteColor::Black);
        assert_eq!(pocket_color(35), RouletteColor::Black);

        let reds = (0..=36).filter(|&n| pocket_color(n) == RouletteColor::Red).count();
        let blacks = (0..=36).filter(|&n| pocket_color(n) == RouletteColor::Black).count();
        assert_eq!((reds, blacks), (18, 18));
    }

    #[test]
    fn test_payouts() {
        assert_eq!(roulette_payout(RouletteColor::Green, 0, 100), 99.5 * 35.0);
        assert_eq!(roulette_payout(RouletteColor::Red, 14, 100), 199.0);
        assert_eq!(roulette_payout(RouletteColor::Black, 14, 100), 0.0);
        assert_eq!(roulette_payout(RouletteColor::Black, 0, 100), 0.0);
    }

    #[test]
    fn test_spin_requires_color() {
        let mut ledger = Ledger::new(1_000.0);
        let mut session = RouletteSession::new();

        assert_eq!(
            session.begin_with(&mut ledger, 100, None),
            Err(BetRejection::NoColorSelected)
        );
        assert_eq!(ledger.balance(), 1_000.0);
        assert_eq!(session.phase(), RoulettePhase::AwaitingColor);
    }

    #[test]
    fn test_rejected_spin_keeps_previous_color() {
        let mut ledger = Ledger::new(50.0);
        let mut session = RouletteSession::new();
        session.select(RouletteColor::Red);

        assert!(session
            .begin_with(&mut ledger, 100, Some(RouletteColor::Green))
            .is_err());
        assert_eq!(session.view().chosen, Some(RouletteColor::Red));
    }

    #[test]
    fn test_color_captured_at_start_and_kept_after() {
        let mut ledger = Ledger::new(1_000.0);
        let mut session = RouletteSession::new();
        session.select(RouletteColor::Red);
        session.begin_with(&mut ledger, 100, None).unwrap();

        // changing the choice mid-spin only affects the next spin
        session.select(RouletteColor::Black);
        let record = session.settle(14).unwrap();
        assert_eq!(record.result, BetResult::Win);
        assert_eq!(record.payout, 199.0);

        let view = session.view();
        assert_eq!(view.phase, RoulettePhase::AwaitingColor);
        assert_eq!(view.chosen, Some(RouletteColor::Black));
        assert_eq!(view.last_number, Some(14));
    }
}
