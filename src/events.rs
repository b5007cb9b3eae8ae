//! Notification stream for presentation layers
//!
//! Frames are cosmetic. Nothing in settlement waits on a subscriber, and a
//! lagging or dropped receiver only loses frames.

use crate::games::types::{BetRecord, GameType, SlotSymbol};
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    BetPlaced {
        id: String,
        game: GameType,
        stake: u64,
    },
    SlotsFrame {
        symbols: [SlotSymbol; 3],
    },
    DiceFrame {
        dice: [u8; 2],
    },
    BetSettled(BetRecord),
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Send to current subscribers, if any
    pub fn publish(&self, event: EngineEvent) {
        // No subscribers is the normal case
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        bus.publish(EngineEvent::DiceFrame { dice: [1, 2] });

        // late subscribers only see what comes after
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscriber_sees_events_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(EngineEvent::DiceFrame { dice: [1, 2] });
        bus.publish(EngineEvent::DiceFrame { dice: [5, 6] });

        match rx.recv().await.unwrap() {
            EngineEvent::DiceFrame { dice } => assert_eq!(dice, [1, 2]),
            other => panic!("unexpected event {:?}", other),
        }
        match rx.recv().await.unwrap() {
            EngineEvent::DiceFrame { dice } => assert_eq!(dice, [5, 6]),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
