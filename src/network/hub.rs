//! World Hub
//!
//! A single task owns the [`GameWorld`] and the [`SessionRegistry`] and
//! applies one command at a time, so no handler ever interleaves with
//! another. Connection tasks talk to it through a cloneable [`WorldHandle`].

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::game::state::PlayerId;
use crate::game::world::{GameWorld, WorldStats};
use crate::network::protocol::{ClientMessage, ServerMessage};
use crate::network::session::SessionRegistry;

/// Capacity of the inbound command queue.
const COMMAND_QUEUE: usize = 1024;

/// Commands accepted by the world task.
#[derive(Debug)]
pub enum WorldCommand {
    /// A connection opened.
    Connect {
        id: PlayerId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// A decoded client message.
    Message { id: PlayerId, message: ClientMessage },
    /// A frame that failed to decode.
    Malformed { id: PlayerId },
    /// A connection closed.
    Disconnect { id: PlayerId },
    /// Read the counters.
    Stats { reply: oneshot::Sender<WorldStats> },
}

/// World owner plus delivery.
pub struct WorldHub {
    world: GameWorld,
    sessions: SessionRegistry,
}

impl WorldHub {
    /// Wrap a world. Events it already queued are delivered to nobody.
    pub fn new(world: GameWorld) -> Self {
        let mut hub = Self {
            world,
            sessions: SessionRegistry::new(),
        };
        hub.flush();
        hub
    }

    /// Apply one command to completion and deliver its events.
    pub fn handle(&mut self, command: WorldCommand) {
        match command {
            WorldCommand::Connect { id, sender } => {
                self.sessions.register(id, sender);
                debug!("Session {} registered ({} live)", id, self.sessions.len());
            }
            WorldCommand::Message { id, message } => match message {
                ClientMessage::PlayerJoin(payload) => {
                    self.world.handle_join(id, payload.to_join_request());
                }
                ClientMessage::Move(payload) => {
                    // Rejections are silent by contract
                    let _ = self.world.handle_move(id, &payload.direction, &payload.amount);
                }
            },
            WorldCommand::Malformed { id } => {
                debug!("Malformed frame from session {}", id);
                self.world.record_malformed();
            }
            WorldCommand::Disconnect { id } => {
                // Unregister first: the leaver gets nothing
                self.sessions.unregister(&id);
                if self.world.handle_disconnect(id) {
                    info!("Player {} left", id);
                }
            }
            WorldCommand::Stats { reply } => {
                let _ = reply.send(self.world.stats().clone());
            }
        }
        self.flush();
    }

    fn flush(&mut self) {
        let mut dropped = 0;
        for event in self.world.take_events() {
            dropped += self.sessions.deliver(event).dropped;
        }
        if dropped > 0 {
            self.world.record_dropped(dropped);
        }
    }

    /// Read-only view of the world.
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Process commands until every handle is dropped.
    pub async fn run(mut self, mut commands: mpsc::Receiver<WorldCommand>) {
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        info!("World task stopped ({})", self.world.stats());
    }
}

/// Cloneable sender side of the world task.
#[derive(Clone)]
pub struct WorldHandle {
    commands: mpsc::Sender<WorldCommand>,
}

impl WorldHandle {
    /// Spawn the world task.
    pub fn spawn(world: GameWorld) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
        let task = tokio::spawn(WorldHub::new(world).run(rx));
        (Self { commands: tx }, task)
    }

    async fn send(&self, command: WorldCommand) {
        // The world task only ends once every handle is gone
        let _ = self.commands.send(command).await;
    }

    /// Register a connection.
    pub async fn connect(&self, id: PlayerId, sender: mpsc::Sender<ServerMessage>) {
        self.send(WorldCommand::Connect { id, sender }).await;
    }

    /// Forward a decoded message.
    pub async fn message(&self, id: PlayerId, message: ClientMessage) {
        self.send(WorldCommand::Message { id, message }).await;
    }

    /// Report an undecodable frame.
    pub async fn malformed(&self, id: PlayerId) {
        self.send(WorldCommand::Malformed { id }).await;
    }

    /// Report a closed connection.
    pub async fn disconnect(&self, id: PlayerId) {
        self.send(WorldCommand::Disconnect { id }).await;
    }

    /// Current counters, or `None` if the world task is gone.
    pub async fn stats(&self) -> Option<WorldStats> {
        let (reply, rx) = oneshot::channel();
        self.send(WorldCommand::Stats { reply }).await;
        rx.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;
    use crate::game::spawner::SpawnConfig;
    use crate::network::protocol::{JoinPayload, MovePayload};
    use serde_json::json;

    fn hub() -> WorldHub {
        WorldHub::new(GameWorld::new(DeterministicRng::new(1), SpawnConfig::default()))
    }

    fn connect(hub: &mut WorldHub, raw: u64) -> (PlayerId, mpsc::Receiver<ServerMessage>) {
        let id = PlayerId::new(raw);
        let (tx, rx) = mpsc::channel(32);
        hub.handle(WorldCommand::Connect { id, sender: tx });
        (id, rx)
    }

    fn join(hub: &mut WorldHub, id: PlayerId) {
        hub.handle(WorldCommand::Message {
            id,
            message: ClientMessage::PlayerJoin(JoinPayload::default()),
        });
    }

    fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn test_join_snapshot_and_broadcast() {
        let mut hub = hub();
        let (a, mut rx_a) = connect(&mut hub, 1);
        let (b, mut rx_b) = connect(&mut hub, 2);

        join(&mut hub, a);
        let to_a = drain(&mut rx_a);
        assert_eq!(to_a.len(), 1);
        match &to_a[0] {
            ServerMessage::WorldState(snapshot) => {
                assert_eq!(snapshot.players.len(), 1);
                assert_eq!(snapshot.collectibles.len(), 1);
            }
            other => panic!("expected worldState, got {:?}", other),
        }
        // Connected but not joined sessions still hear about joins
        assert!(matches!(drain(&mut rx_b).as_slice(), [ServerMessage::PlayerJoined(p)] if p.id == a));

        join(&mut hub, b);
        assert!(matches!(drain(&mut rx_a).as_slice(), [ServerMessage::PlayerJoined(p)] if p.id == b));
        assert!(matches!(drain(&mut rx_b).as_slice(), [ServerMessage::WorldState(s)] if s.players.len() == 2));
    }

    #[tokio::test]
    async fn test_move_reaches_everyone() {
        let mut hub = hub();
        let (a, mut rx_a) = connect(&mut hub, 1);
        let (_b, mut rx_b) = connect(&mut hub, 2);
        join(&mut hub, a);
        drain(&mut rx_a);
        drain(&mut rx_b);

        hub.handle(WorldCommand::Message {
            id: a,
            message: ClientMessage::Move(MovePayload { direction: json!("up"), amount: json!(9999) }),
        });

        for rx in [&mut rx_a, &mut rx_b] {
            let msgs = drain(rx);
            assert!(matches!(
                msgs.as_slice(),
                [ServerMessage::PlayerMoved(m)] if m.y == 0.0 && m.rank == "Rank: 1/1"
            ));
        }
    }

    #[tokio::test]
    async fn test_invalid_move_is_silent() {
        let mut hub = hub();
        let (a, mut rx_a) = connect(&mut hub, 1);
        join(&mut hub, a);
        drain(&mut rx_a);

        hub.handle(WorldCommand::Message {
            id: a,
            message: ClientMessage::Move(MovePayload { direction: json!("up"), amount: json!("10") }),
        });
        hub.handle(WorldCommand::Malformed { id: a });

        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(hub.world().stats().rejected_amount, 1);
        assert_eq!(hub.world().stats().malformed_messages, 1);
    }

    #[tokio::test]
    async fn test_disconnect_without_join_is_quiet() {
        let mut hub = hub();
        let (_a, mut rx_a) = connect(&mut hub, 1);
        let (b, _rx_b) = connect(&mut hub, 2);

        hub.handle(WorldCommand::Disconnect { id: b });
        assert!(drain(&mut rx_a).is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_announces_to_remaining() {
        let mut hub = hub();
        let (a, mut rx_a) = connect(&mut hub, 1);
        let (b, mut rx_b) = connect(&mut hub, 2);
        join(&mut hub, b);
        drain(&mut rx_a);
        drain(&mut rx_b);

        hub.handle(WorldCommand::Disconnect { id: b });

        assert!(matches!(drain(&mut rx_a).as_slice(), [ServerMessage::PlayerLeft(l)] if l.id == b));
        assert!(drain(&mut rx_b).is_empty());
        assert!(hub.world().state().get_player(&b).is_none());
        assert!(hub.world().state().get_player(&a).is_none());
    }

    #[tokio::test]
    async fn test_handle_stats_roundtrip() {
        let (handle, task) = WorldHandle::spawn(GameWorld::new(
            DeterministicRng::new(1),
            SpawnConfig::default(),
        ));
        let (tx, _rx) = mpsc::channel(8);
        handle.connect(PlayerId::new(1), tx).await;
        handle
            .message(PlayerId::new(1), ClientMessage::PlayerJoin(JoinPayload::default()))
            .await;

        let stats = handle.stats().await.unwrap();
        assert_eq!(stats.joins, 1);
        assert_eq!(stats.spawns, 1);

        drop(handle);
        task.await.unwrap();
    }
}
