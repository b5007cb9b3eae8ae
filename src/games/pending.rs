use crate::errors::{EngineError, EngineResult};
use crate::games::types::{BetRecord, GameType, OpenRound};
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Rounds that have started but not settled, keyed by round id
pub struct PendingBets {
    /// Map of round id -> oneshot sender
    pending: Arc<DashMap<String, oneshot::Sender<BetRecord>>>,
}

impl PendingBets {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
        }
    }

    /// Register a freshly started round and hand back its result future
    pub fn register(&self, round: &OpenRound) -> PendingBet {
        let (sender, receiver) = oneshot::channel();
        self.pending.insert(round.id.clone(), sender);
        PendingBet {
            id: round.id.clone(),
            game: round.game,
            receiver,
        }
    }

    /// Deliver a settled record to whoever is waiting on it
    pub fn complete(&self, record: BetRecord) -> bool {
        if let Some((_, sender)) = self.pending.remove(&record.id) {
            // Send result (ignore if receiver dropped)
            let _ = sender.send(record);
            true
        } else {
            false
        }
    }

    /// Number of rounds still waiting for a record
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for PendingBets {
    fn default() -> Self {
        Self::new()
    }
}

/// Eventual result of an accepted bet.
///
/// Dropping it does not cancel the round; the record still lands in history.
#[derive(Debug)]
pub struct PendingBet {
    id: String,
    game: GameType,
    receiver: oneshot::Receiver<BetRecord>,
}

impl PendingBet {
    /// Id of the round this future resolves
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Game the round belongs to
    pub fn game(&self) -> GameType {
        self.game
    }
}

impl Future for PendingBet {
    type Output = EngineResult<BetRecord>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let polled = Pin::new(&mut self.receiver).poll(cx);
        polled.map(|result| {
            result.map_err(|_| {
                EngineError::Settlement(format!("{} round {} ended without a result", self.game, self.id))
            })
        })
    }
}
