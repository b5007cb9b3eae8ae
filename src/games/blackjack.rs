//! Simplified blackjack: cards are plain values 2..=10, no suits or aces

use crate::errors::BetRejection;
use crate::games::types::{BetRecord, BlackjackVerdict, GameOutcome, GameType, OpenRound};
use crate::ledger::{net_stake, Ledger};
use crate::outcomes::OutcomeSource;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BUST_LIMIT: u32 = 21;
pub const DEALER_STANDS_AT: u32 = 17;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlackjackPhase {
    Betting,
    Playing,
    Dealer,
    Result,
}

impl fmt::Display for BlackjackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlackjackPhase::Betting => write!(f, "betting"),
            BlackjackPhase::Playing => write!(f, "playing"),
            BlackjackPhase::Dealer => write!(f, "dealer"),
            BlackjackPhase::Result => write!(f, "result"),
        }
    }
}

/// Plain sum of card values
pub fn hand_total(cards: &[u8]) -> u32 {
    cards.iter().map(|&c| c as u32).sum()
}

/// Compare finished hands after the player stands
pub fn verdict(player_total: u32, dealer_total: u32) -> BlackjackVerdict {
    if dealer_total > BUST_LIMIT {
        BlackjackVerdict::DealerBust
    } else if player_total > dealer_total {
        BlackjackVerdict::PlayerHigher
    } else if player_total == dealer_total {
        BlackjackVerdict::Push
    } else {
        BlackjackVerdict::DealerHigher
    }
}

/// A push refunds the full stake, fee included; wins pay on the net stake.
pub fn blackjack_payout(verdict: BlackjackVerdict, stake: u64) -> f64 {
    match verdict {
        BlackjackVerdict::DealerBust | BlackjackVerdict::PlayerHigher => net_stake(stake) * 2.0,
        BlackjackVerdict::Push => stake as f64,
        BlackjackVerdict::PlayerBust | BlackjackVerdict::DealerHigher => 0.0,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlackjackView {
    pub phase: BlackjackPhase,
    pub player: Vec<u8>,
    pub dealer: Vec<u8>,
    pub player_total: u32,
    pub dealer_total: u32,
}

#[derive(Debug, Clone)]
pub struct BlackjackSession {
    phase: BlackjackPhase,
    player: Vec<u8>,
    dealer: Vec<u8>,
    round: Option<OpenRound>,
}

impl BlackjackSession {
    /// Fresh table waiting for a bet
    pub fn new() -> Self {
        Self {
            phase: BlackjackPhase::Betting,
            player: Vec::new(),
            dealer: Vec::new(),
            round: None,
        }
    }

    /// Current phase of the hand
    pub fn phase(&self) -> BlackjackPhase {
        self.phase
    }

    fn wrong_phase(&self) -> BetRejection {
        match self.phase {
            BlackjackPhase::Playing | BlackjackPhase::Dealer => {
                BetRejection::RoundInProgress(GameType::Blackjack)
            }
            phase => BetRejection::InvalidPhase {
                game: GameType::Blackjack,
                phase: phase.to_string(),
            },
        }
    }

    /// Pay the stake and deal two player cards and one dealer card
    pub fn deal(
        &mut self,
        ledger: &mut Ledger,
        stake: u64,
        outcomes: &mut dyn OutcomeSource,
    ) -> Result<OpenRound, BetRejection> {
        if self.phase != BlackjackPhase::Betting {
            return Err(self.wrong_phase());
        }
        ledger.try_debit(stake)?;

        let round = OpenRound::new(GameType::Blackjack, stake);
        self.player = vec![outcomes.card(), outcomes.card()];
        self.dealer = vec![outcomes.card()];
        self.round = Some(round.clone());
        self.phase = BlackjackPhase::Playing;
        Ok(round)
    }

    /// Draw one card. Going over 21 ends the round at once as a loss.
    pub fn hit(&mut self, outcomes: &mut dyn OutcomeSource) -> Result<Option<BetRecord>, BetRejection> {
        if self.phase != BlackjackPhase::Playing {
            return Err(BetRejection::InvalidPhase {
                game: GameType::Blackjack,
                phase: self.phase.to_string(),
            });
        }
        self.player.push(outcomes.card());

        if hand_total(&self.player) > BUST_LIMIT {
            return Ok(self.close(BlackjackVerdict::PlayerBust));
        }
        Ok(None)
    }

    /// Hand over to the dealer, who draws below 17. The comparison happens
    /// later in `settle`.
    pub fn stand(&mut self, outcomes: &mut dyn OutcomeSource) -> Result<(), BetRejection> {
        if self.phase != BlackjackPhase::Playing {
            return Err(BetRejection::InvalidPhase {
                game: GameType::Blackjack,
                phase: self.phase.to_string(),
            });
        }
        self.phase = BlackjackPhase::Dealer;
        while hand_total(&self.dealer) < DEALER_STANDS_AT {
            self.dealer.push(outcomes.card());
        }
        Ok(())
    }

    /// Close a hand the dealer has finished. `None` outside the dealer phase.
    pub fn settle(&mut self) -> Option<BetRecord> {
        if self.phase != BlackjackPhase::Dealer {
            return None;
        }
        let verdict = verdict(hand_total(&self.player), hand_total(&self.dealer));
        self.close(verdict)
    }

    fn close(&mut self, verdict: BlackjackVerdict) -> Option<BetRecord> {
        let round = self.round.take()?;
        self.phase = BlackjackPhase::Result;

        let payout = blackjack_payout(verdict, round.stake);
        Some(round.settle(
            payout,
            GameOutcome::Blackjack {
                player: self.player.clone(),
                dealer: self.dealer.clone(),
                verdict,
            },
        ))
    }

    /// Clear the table. Not allowed while a hand is still being decided.
    pub fn reset(&mut self) -> Result<(), BetRejection> {
        match self.phase {
            BlackjackPhase::Playing | BlackjackPhase::Dealer => Err(self.wrong_phase()),
            BlackjackPhase::Betting | BlackjackPhase::Result => {
                self.player.clear();
                self.dealer.clear();
                self.phase = BlackjackPhase::Betting;
                Ok(())
            }
        }
    }

    /// Snapshot of both hands for display
    pub fn view(&self) -> BlackjackView {
        BlackjackView {
            phase: self.phase,
            player: self.player.clone(),
            dealer: self.dealer.clone(),
            player_total: hand_total(&self.player),
            dealer_total: hand_total(&self.dealer),
        }
    }
}

impl Default for BlackjackSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::types::BetResult;
    use crate::outcomes::ScriptedOutcomes;

    fn dealt(cards: &[u8]) -> (Ledger, BlackjackSession, ScriptedOutcomes) {
        let mut ledger = Ledger::new(1_000.0);
        let mut session = BlackjackSession::new();
        let mut outcomes = ScriptedOutcomes::new().with_cards(cards.iter().copied());
        session.deal(&mut ledger, 100, &mut outcomes).unwrap();
        (ledger, session, outcomes)
    }

    #[test]
    fn test_verdicts() {
        assert_eq!(verdict(20, 18), BlackjackVerdict::PlayerHigher);
        assert_eq!(verdict(18, 18), BlackjackVerdict::Push);
        assert_eq!(verdict(17, 19), BlackjackVerdict::DealerHigher);
        assert_eq!(verdict(12, 24), BlackjackVerdict::DealerBust);
    }

    #[test]
    fn test_push_refunds_full_stake() {
        assert_eq!(blackjack_payout(BlackjackVerdict::Push, 100), 100.0);
        assert_eq!(blackjack_payout(BlackjackVerdict::PlayerHigher, 100), 199.0);
        assert_eq!(blackjack_payout(BlackjackVerdict::DealerHigher, 100), 0.0);
    }

    #[test]
    fn test_deal_order_player_then_dealer() {
        let (ledger, session, _) = dealt(&[10, 9, 6]);
        let view = session.view();
        assert_eq!(view.player, vec![10, 9]);
        assert_eq!(view.dealer, vec![6]);
        assert_eq!(view.phase, BlackjackPhase::Playing);
        assert_eq!(ledger.balance(), 900.0);
    }

    #[test]
    fn test_bust_on_hit_ends_round_immediately() {
        let (_, mut session, mut outcomes) = dealt(&[10, 8, 5, 4]);

        let record = session.hit(&mut outcomes).unwrap().expect("bust settles");
        assert_eq!(record.result, BetResult::Lose);
        assert_eq!(record.payout, 0.0);
        assert_eq!(session.phase(), BlackjackPhase::Result);
        assert_eq!(session.view().dealer, vec![5]);

        assert!(session.stand(&mut outcomes).is_err());
        assert!(session.settle().is_none());
    }

    #[test]
    fn test_dealer_draws_to_seventeen() {
        let (_, mut session, mut outcomes) = dealt(&[10, 8, 2, 3, 4, 5, 6]);
        session.stand(&mut outcomes).unwrap();
        assert_eq!(session.phase(), BlackjackPhase::Dealer);
        // 2+3+4+5 = 14, then +6 = 20 beats 18
        assert_eq!(session.view().dealer, vec![2, 3, 4, 5, 6]);

        let record = session.settle().unwrap();
        assert_eq!(record.result, BetResult::Lose);
        assert_eq!(record.payout, 0.0);
        assert!(matches!(
            record.outcome,
            GameOutcome::Blackjack { verdict: BlackjackVerdict::DealerHigher, .. }
        ));
    }

    #[test]
    fn test_stand_win_and_push() {
        let (_, mut session, mut outcomes) = dealt(&[10, 10, 9, 9]);
        session.stand(&mut outcomes).unwrap();
        let record = session.settle().unwrap();
        assert_eq!(record.payout, 199.0);
        assert_eq!(
            record.outcome,
            GameOutcome::Blackjack {
                player: vec![10, 10],
                dealer: vec![9, 9],
                verdict: BlackjackVerdict::PlayerHigher,
            }
        );

        let (_, mut session, mut outcomes) = dealt(&[9, 9, 9, 9]);
        session.stand(&mut outcomes).unwrap();
        let record = session.settle().unwrap();
        assert_eq!(record.result, BetResult::Win);
        assert_eq!(record.payout, 100.0);
    }

    #[test]
    fn test_reset_rules() {
        let (mut ledger, mut session, mut outcomes) = dealt(&[10, 10, 9, 9]);
        assert_eq!(
            session.reset(),
            Err(BetRejection::RoundInProgress(GameType::Blackjack))
        );
        assert_eq!(
            session.deal(&mut ledger, 100, &mut outcomes).unwrap_err(),
            BetRejection::RoundInProgress(GameType::Blackjack)
        );

        session.stand(&mut outcomes).unwrap();
        assert!(session.reset().is_err());
        session.settle().unwrap();

        // a finished hand must be cleared before the next deal
        assert!(matches!(
            session.deal(&mut ledger, 100, &mut outcomes),
            Err(BetRejection::InvalidPhase { .. })
        ));
        session.reset().unwrap();
        let view = session.view();
        assert_eq!(view.phase, BlackjackPhase::Betting);
        assert!(view.player.is_empty() && view.dealer.is_empty());
    }
}
