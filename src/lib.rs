//! neonplay - simulated wagering engine
//!
//! Takes a stake, books a 0.5% service fee against it, resolves one of four
//! chance games (slots, roulette, blackjack, dice), settles the balance and
//! keeps a short history of results. Presentation is left to the caller; the
//! engine exposes queries, a per-round result future and an event stream.

pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod games;
pub mod history;
pub mod ledger;
pub mod outcomes;

pub use config::{ConfigBuilder, ConfigLoader, EngineConfig};
pub use engine::WagerEngine;
pub use errors::{BetRejection, EngineError, EngineResult};
pub use events::EngineEvent;
pub use games::{BetConfig, BetRecord, BetResult, GameOutcome, GameType, PendingBet, RouletteColor, SlotSymbol};
pub use history::BetHistory;
pub use ledger::{fee, net_stake, Ledger};
pub use outcomes::{OutcomeSource, RandomOutcomes, ScriptedOutcomes};
