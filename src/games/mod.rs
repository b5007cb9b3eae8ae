pub mod types;
pub mod pending;
pub mod slots;
pub mod roulette;
pub mod blackjack;
pub mod dice;

pub use types::*;
pub use pending::{PendingBet, PendingBets};
pub use slots::{SlotsPhase, SlotsSession, SlotsView};
pub use roulette::{RoulettePhase, RouletteSession, RouletteView};
pub use blackjack::{BlackjackPhase, BlackjackSession, BlackjackView};
pub use dice::{DicePhase, DiceSession, DiceView};
