//! Uniform outcome draws for every game
//!
//! `RandomOutcomes` is the production source. `ScriptedOutcomes` replays fixed
//! values so rounds can be reproduced exactly.

use crate::games::types::SlotSymbol;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Highest roulette pocket
pub const WHEEL_MAX: u8 = 36;
/// Card values are drawn from `CARD_MIN..=CARD_MAX`
pub const CARD_MIN: u8 = 2;
pub const CARD_MAX: u8 = 10;
pub const DIE_FACES: u8 = 6;

/// Source of uniform random draws
pub trait OutcomeSource: Send {
    /// One of the eight reel symbols
    fn symbol(&mut self) -> SlotSymbol;

    /// Pocket in `0..=36`
    fn wheel(&mut self) -> u8;

    /// Card value in `2..=10`
    fn card(&mut self) -> u8;

    /// Die face in `1..=6`
    fn die(&mut self) -> u8;

    fn reels(&mut self) -> [SlotSymbol; 3] {
        [self.symbol(), self.symbol(), self.symbol()]
    }

    fn dice(&mut self) -> [u8; 2] {
        [self.die(), self.die()]
    }
}

pub struct RandomOutcomes {
    rng: StdRng,
}

impl RandomOutcomes {
    /// Generator seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl OutcomeSource for RandomOutcomes {
    fn symbol(&mut self) -> SlotSymbol {
        SlotSymbol::ALL[self.rng.gen_range(0..SlotSymbol::ALL.len())]
    }

    fn wheel(&mut self) -> u8 {
        self.rng.gen_range(0..=WHEEL_MAX)
    }

    fn card(&mut self) -> u8 {
        self.rng.gen_range(CARD_MIN..=CARD_MAX)
    }

    fn die(&mut self) -> u8 {
        self.rng.gen_range(1..=DIE_FACES)
    }
}

/// Replays queued values in order.
///
/// An exhausted queue yields the lowest legal value for that draw.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOutcomes {
    symbols: VecDeque<SlotSymbol>,
    wheel: VecDeque<u8>,
    cards: VecDeque<u8>,
    dice: VecDeque<u8>,
}

impl ScriptedOutcomes {
    /// Empty script; every draw falls back to the lowest value
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue reel symbols
    pub fn with_symbols(mut self, symbols: impl IntoIterator<Item = SlotSymbol>) -> Self {
        self.symbols.extend(symbols);
        self
    }

    /// Queue wheel pockets
    pub fn with_wheel(mut self, pockets: impl IntoIterator<Item = u8>) -> Self {
        self.wheel.extend(pockets);
        self
    }

    /// Queue card values
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = u8>) -> Self {
        self.cards.extend(cards);
        self
    }

    /// Queue die faces
    pub fn with_dice(mut self, faces: impl IntoIterator<Item = u8>) -> Self {
        self.dice.extend(faces);
        self
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn symbol(&mut self) -> SlotSymbol {
        self.symbols.pop_front().unwrap_or(SlotSymbol::SlotMachine)
    }

    fn wheel(&mut self) -> u8 {
        self.wheel.pop_front().map(|n| n.min(WHEEL_MAX)).unwrap_or(0)
    }

    fn card(&mut self) -> u8 {
        self.cards
            .pop_front()
            .map(|c| c.clamp(CARD_MIN, CARD_MAX))
            .unwrap_or(CARD_MIN)
    }

    fn die(&mut self) -> u8 {
        self.dice
            .pop_front()
            .map(|d| d.clamp(1, DIE_FACES))
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_draws_stay_in_range() {
        let mut source = RandomOutcomes::from_entropy();
        for _ in 0..2_000 {
            assert!(source.wheel() <= WHEEL_MAX);
            assert!((CARD_MIN..=CARD_MAX).contains(&source.card()));
            assert!((1..=DIE_FACES).contains(&source.die()));
        }
    }

    #[test]
    fn test_random_draws_cover_alphabet() {
        let mut source = RandomOutcomes::seeded(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1_000 {
            seen.insert(source.symbol());
        }
        assert_eq!(seen.len(), SlotSymbol::ALL.len());
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = RandomOutcomes::seeded(42);
        let mut b = RandomOutcomes::seeded(42);
        let left: Vec<u8> = (0..32).map(|_| a.wheel()).collect();
        let right: Vec<u8> = (0..32).map(|_| b.wheel()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_scripted_replay_and_fallback() {
        let mut source = ScriptedOutcomes::new()
            .with_dice([3, 4])
            .with_cards([10, 11]);

        assert_eq!(source.dice(), [3, 4]);
        assert_eq!(source.die(), 1);
        assert_eq!(source.card(), 10);
        assert_eq!(source.card(), CARD_MAX);
        assert_eq!(source.card(), CARD_MIN);
        assert_eq!(source.wheel(), 0);
    }
}
