//! Session Registry
//!
//! Outbound channels of every live connection, joined or not. Delivery is
//! fire-and-forget: a full or closed queue drops the message.

use std::collections::BTreeMap;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::game::events::GameEvent;
use crate::game::state::PlayerId;
use crate::network::protocol::ServerMessage;

/// Outcome of delivering one event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Messages queued
    pub sent: u64,
    /// Messages dropped
    pub dropped: u64,
}

/// All connected sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<PlayerId, mpsc::Sender<ServerMessage>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's outbound queue.
    pub fn register(&mut self, id: PlayerId, sender: mpsc::Sender<ServerMessage>) {
        self.sessions.insert(id, sender);
    }

    /// Drop a connection's outbound queue. Returns whether it was registered.
    pub fn unregister(&mut self, id: &PlayerId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no connection is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Queue an event for its audience without waiting.
    pub fn deliver(&self, event: GameEvent) -> DeliveryReport {
        let audience = event.audience;
        let message = ServerMessage::from(event.data);
        let mut report = DeliveryReport::default();

        for (id, sender) in &self.sessions {
            if !audience.includes(*id) {
                continue;
            }
            match sender.try_send(message.clone()) {
                Ok(()) => report.sent += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("Outbound queue full for session {}, dropping message", id);
                    report.dropped += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    report.dropped += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Player;

    fn left(id: u64) -> GameEvent {
        GameEvent::player_left(PlayerId::new(id))
    }

    #[tokio::test]
    async fn test_deliver_respects_audience() {
        let mut registry = SessionRegistry::new();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        registry.register(PlayerId::new(1), tx1);
        registry.register(PlayerId::new(2), tx2);

        let player = Player::new(PlayerId::new(1), 50.0, 50.0);
        let report = registry.deliver(GameEvent::player_joined(player.clone()));

        assert_eq!(report, DeliveryReport { sent: 1, dropped: 0 });
        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.try_recv().unwrap(), ServerMessage::PlayerJoined(player));
    }

    #[tokio::test]
    async fn test_full_queue_drops() {
        let mut registry = SessionRegistry::new();
        let (tx, mut rx) = mpsc::channel(1);
        registry.register(PlayerId::new(1), tx);

        registry.deliver(left(7));
        let report = registry.deliver(left(8));

        assert_eq!(report, DeliveryReport { sent: 0, dropped: 1 });
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::PlayerLeft(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_queue_drops() {
        let mut registry = SessionRegistry::new();
        let (tx, rx) = mpsc::channel(4);
        registry.register(PlayerId::new(1), tx);
        drop(rx);

        assert_eq!(registry.deliver(left(2)).dropped, 1);
    }

    #[tokio::test]
    async fn test_unregister() {
        let mut registry = SessionRegistry::new();
        let (tx, _rx) = mpsc::channel(4);
        registry.register(PlayerId::new(1), tx);

        assert!(registry.unregister(&PlayerId::new(1)));
        assert!(!registry.unregister(&PlayerId::new(1)));
        assert!(registry.is_empty());
    }
}
