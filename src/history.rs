//! Bounded log of settled bets, newest first

use crate::games::types::BetRecord;
use std::collections::VecDeque;

/// Maximum number of records kept
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct BetHistory {
    records: VecDeque<BetRecord>,
}

impl BetHistory {
    /// Empty history
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Prepend a record, silently dropping the oldest beyond capacity
    pub fn append(&mut self, record: BetRecord) {
        self.records.push_front(record);
        self.records.truncate(HISTORY_CAPACITY);
    }

    /// Snapshot, newest first
    pub fn records(&self) -> Vec<BetRecord> {
        self.records.iter().cloned().collect()
    }
}
