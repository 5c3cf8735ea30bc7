//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket.
//! Every frame is a JSON text frame shaped `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::events::GameEventData;
use crate::game::lifecycle::JoinRequest;
use crate::game::state::{Collectible, CollectibleId, Meta, Player, PlayerId};

/// Frame decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Not JSON, or not a known event.
    #[error("Invalid message: {0}")]
    Decode(#[from] serde_json::Error),

    /// Only text frames carry messages.
    #[error("Unsupported frame type")]
    UnsupportedFrame,
}

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter the world.
    PlayerJoin(JoinPayload),

    /// Move the caller's player.
    Move(MovePayload),
}

/// Join payload. Every field is optional and loosely typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinPayload {
    /// Initial x; used only if numeric.
    #[serde(default)]
    pub x: Value,
    /// Initial y; used only if numeric.
    #[serde(default)]
    pub y: Value,
    /// Display attributes; used only if an object.
    #[serde(default)]
    pub meta: Value,
}

impl JoinPayload {
    /// Convert to a JoinRequest for the game layer.
    pub fn to_join_request(&self) -> JoinRequest {
        JoinRequest {
            x: self.x.as_f64().filter(|v| v.is_finite()),
            y: self.y.as_f64().filter(|v| v.is_finite()),
            meta: match &self.meta {
                Value::Object(map) => map.clone(),
                _ => Meta::new(),
            },
        }
    }
}

/// Move payload. Kept raw so validation can reject it silently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovePayload {
    /// Expected: "up" | "down" | "left" | "right"
    #[serde(default)]
    pub direction: Value,
    /// Expected: a number
    #[serde(default)]
    pub amount: Value,
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full world, to the joiner only.
    WorldState(WorldSnapshot),

    /// Someone else joined.
    PlayerJoined(Player),

    /// A move was accepted.
    PlayerMoved(PlayerMoved),

    /// A collectible was picked up.
    Collected(Collected),

    /// A collectible appeared.
    CollectibleSpawned(Collectible),

    /// A player left.
    PlayerLeft(PlayerLeft),
}

/// Snapshot of the whole world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// All players
    pub players: Vec<Player>,
    /// All collectibles
    pub collectibles: Vec<Collectible>,
}

/// Position, score and rank after a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMoved {
    /// Mover
    pub id: PlayerId,
    /// New x
    pub x: f64,
    /// New y
    pub y: f64,
    /// Score after any pickups
    pub score: u64,
    /// `Rank: R/T`
    pub rank: String,
}

/// Pickup notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collected {
    /// Who picked it up
    pub collector_id: PlayerId,
    /// What was picked up
    pub collectible_id: CollectibleId,
    /// Collector's score afterwards
    pub new_score: u64,
}

/// Departure notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLeft {
    /// Departed player
    pub id: PlayerId,
}

impl From<GameEventData> for ServerMessage {
    fn from(data: GameEventData) -> Self {
        match data {
            GameEventData::WorldSnapshot { players, collectibles } => {
                ServerMessage::WorldState(WorldSnapshot { players, collectibles })
            }
            GameEventData::PlayerJoined { player } => ServerMessage::PlayerJoined(player),
            GameEventData::PlayerMoved { id, x, y, score, rank } => {
                ServerMessage::PlayerMoved(PlayerMoved { id, x, y, score, rank })
            }
            GameEventData::Collected { collector_id, collectible_id, new_score } => {
                ServerMessage::Collected(Collected { collector_id, collectible_id, new_score })
            }
            GameEventData::CollectibleSpawned { collectible } => {
                ServerMessage::CollectibleSpawned(collectible)
            }
            GameEventData::PlayerLeft { id } => ServerMessage::PlayerLeft(PlayerLeft { id }),
        }
    }
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(s)?)
    }
}
