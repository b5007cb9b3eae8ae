use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Supported game types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Slots,
    Roulette,
    Blackjack,
    Dice,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Slots => write!(f, "slots"),
            GameType::Roulette => write!(f, "roulette"),
            GameType::Blackjack => write!(f, "blackjack"),
            GameType::Dice => write!(f, "dice"),
        }
    }
}

/// Display-only token the balance is denominated in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub symbol: String,
    /// Where fees are nominally sent. Nothing is ever transferred.
    pub fee_address: String,
}

impl Token {
    /// House token
    pub fn drb() -> Self {
        Self {
            symbol: "$DRB".to_string(),
            fee_address: "0xb1058c959987e3513600eb5b4fd82aeee2a0e4f9".to_string(),
        }
    }
}

/// Slot reel symbols
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotSymbol {
    SlotMachine,
    MoneyBag,
    Diamond,
    Seven,
    Cherry,
    Star,
    Die,
    Gem,
}

impl SlotSymbol {
    pub const ALL: [SlotSymbol; 8] = [
        SlotSymbol::SlotMachine,
        SlotSymbol::MoneyBag,
        SlotSymbol::Diamond,
        SlotSymbol::Seven,
        SlotSymbol::Cherry,
        SlotSymbol::Star,
        SlotSymbol::Die,
        SlotSymbol::Gem,
    ];

    /// Symbol at `index` in the alphabet, wrapping out-of-range values
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl fmt::Display for SlotSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self {
            SlotSymbol::SlotMachine => "🎰",
            SlotSymbol::MoneyBag => "💰",
            SlotSymbol::Diamond => "🔷",
            SlotSymbol::Seven => "7️⃣",
            SlotSymbol::Cherry => "🍒",
            SlotSymbol::Star => "⭐",
            SlotSymbol::Die => "🎲",
            SlotSymbol::Gem => "💎",
        };
        write!(f, "{}", glyph)
    }
}

/// Roulette pocket color
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RouletteColor {
    Red,
    Black,
    Green,
}

impl fmt::Display for RouletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouletteColor::Red => write!(f, "red"),
            RouletteColor::Black => write!(f, "black"),
            RouletteColor::Green => write!(f, "green"),
        }
    }
}

/// Bet result as shown in history. A blackjack push counts as a win.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    Win,
    Lose,
}

/// How a blackjack round ended
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlackjackVerdict {
    PlayerBust,
    DealerBust,
    PlayerHigher,
    Push,
    DealerHigher,
}

/// Game-specific detail of a settled round (discriminated union)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameOutcome {
    Slots {
        symbols: [SlotSymbol; 3],
    },
    Roulette {
        number: u8,
        landed: RouletteColor,
        chosen: RouletteColor,
    },
    Blackjack {
        player: Vec<u8>,
        dealer: Vec<u8>,
        verdict: BlackjackVerdict,
    },
    Dice {
        dice: [u8; 2],
        target: u8,
    },
}

/// Settled bet as kept in history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BetRecord {
    pub id: String,
    pub game: GameType,
    pub stake: u64,
    pub result: BetResult,
    pub payout: f64,
    pub timestamp: DateTime<Utc>,
    pub outcome: GameOutcome,
}

/// A round that has been paid for but not yet settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRound {
    pub id: String,
    pub game: GameType,
    pub stake: u64,
}

impl OpenRound {
    /// Open a round under a fresh id
    pub fn new(game: GameType, stake: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            game,
            stake,
        }
    }

    /// Close the round. Any positive payout counts as a win.
    pub fn settle(self, payout: f64, outcome: GameOutcome) -> BetRecord {
        let result = if payout > 0.0 { BetResult::Win } else { BetResult::Lose };
        BetRecord {
            id: self.id,
            game: self.game,
            stake: self.stake,
            result,
            payout,
            timestamp: Utc::now(),
            outcome,
        }
    }
}

/// Fee breakdown for a prospective stake
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeeQuote {
    pub stake: u64,
    pub fee: f64,
    pub net_stake: f64,
}

/// Per-game parameters for a bet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum BetConfig {
    Slots,
    Roulette { color: RouletteColor },
    Dice { target_sum: u8 },
    /// Deal a hand; the record arrives once the hand is decided
    Blackjack,
}

impl BetConfig {
    /// Game this bet targets
    pub fn game_type(&self) -> GameType {
        match self {
            BetConfig::Slots => GameType::Slots,
            BetConfig::Roulette { .. } => GameType::Roulette,
            BetConfig::Dice { .. } => GameType::Dice,
            BetConfig::Blackjack => GameType::Blackjack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bet_config_serialization() {
        let config = BetConfig::Roulette { color: RouletteColor::Green };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["game"], "roulette");
        assert_eq!(json["color"], "green");

        let parsed: BetConfig =
            serde_json::from_str(r#"{"game":"dice","target_sum":7}"#).unwrap();
        assert_eq!(parsed, BetConfig::Dice { target_sum: 7 });
        assert_eq!(parsed.game_type(), GameType::Dice);
    }

    #[test]
    fn test_slot_alphabet() {
        assert_eq!(SlotSymbol::ALL.len(), 8);
        assert_eq!(SlotSymbol::from_index(3), SlotSymbol::Seven);
        assert_eq!(SlotSymbol::from_index(8), SlotSymbol::SlotMachine);
    }

    #[test]
    fn test_open_round_settlement() {
        let round = OpenRound::new(GameType::Slots, 100);
        let id = round.id.clone();
        let outcome = GameOutcome::Slots { symbols: [SlotSymbol::Gem; 3] };

        let record = round.clone().settle(995.0, outcome.clone());
        assert_eq!(record.id, id);
        assert_eq!(record.result, BetResult::Win);
        assert_eq!(record.stake, 100);

        let record = round.settle(0.0, outcome);
        assert_eq!(record.result, BetResult::Lose);
        assert_eq!(record.payout, 0.0);
    }

    #[test]
    fn test_outcome_tagging() {
        let outcome = GameOutcome::Dice { dice: [3, 4], target: 7 };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["game"], "dice");
        assert_eq!(json["target"], 7);
    }
}
