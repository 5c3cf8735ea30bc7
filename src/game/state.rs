//! World State Store
//!
//! The authoritative player and collectible tables. Both use BTreeMap so
//! every scan runs in ascending id order.

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

use crate::core::bounds::clamp_coordinate;

// =============================================================================
// PLAYER
// =============================================================================

/// Connection identifier, doubling as the player's identity.
///
/// Assigned in connection order, so ordering by id is ordering by arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create from a raw connection number.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied display attributes (name, color, ...).
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Meta keys that would shadow core player fields.
pub const RESERVED_META_KEYS: [&str; 4] = ["id", "x", "y", "score"];

/// A joined player.
///
/// Meta fields are flattened onto the record on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Owning connection
    pub id: PlayerId,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Accumulated score
    pub score: u64,
    /// Display attributes, never interpreted by the server
    #[serde(flatten)]
    pub meta: Meta,
}

impl Player {
    /// Create a player with zero score at a clamped position.
    pub fn new(id: PlayerId, x: f64, y: f64) -> Self {
        Self {
            id,
            x: clamp_coordinate(x),
            y: clamp_coordinate(y),
            score: 0,
            meta: Meta::new(),
        }
    }

    /// Attach meta, dropping any key listed in [`RESERVED_META_KEYS`].
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta
            .into_iter()
            .filter(|(key, _)| !RESERVED_META_KEYS.contains(&key.as_str()))
            .collect();
        self
    }

    /// Set position, clamping each axis into the world.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = clamp_coordinate(x);
        self.y = clamp_coordinate(y);
    }

    /// Add collected value. Score never decreases.
    pub fn add_score(&mut self, amount: u32) -> u64 {
        self.score = self.score.saturating_add(u64::from(amount));
        self.score
    }
}

// =============================================================================
// COLLECTIBLE
// =============================================================================

/// Collectible identifier.
///
/// Numeric internally so BTreeMap order is numeric order; rendered as a
/// decimal string on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CollectibleId(pub u64);

impl fmt::Display for CollectibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CollectibleId> for String {
    fn from(id: CollectibleId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CollectibleId {
    type Error = ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse().map(CollectibleId)
    }
}

/// An item a player picks up by walking over it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Unique, never reused
    pub id: CollectibleId,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Score awarded on pickup (>= 1)
    pub value: u32,
}

// =============================================================================
// WORLD STATE
// =============================================================================

/// The in-memory world.
///
/// Fields are private: every read and write goes through the methods below.
#[derive(Clone, Debug)]
pub struct WorldState {
    players: BTreeMap<PlayerId, Player>,
    collectibles: BTreeMap<CollectibleId, Collectible>,
    /// Next collectible id (monotonic, never reset)
    next_collectible_id: u64,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    /// Create an empty world. Collectible ids start at 1.
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
            collectibles: BTreeMap::new(),
            next_collectible_id: 1,
        }
    }

    /// Insert or replace the player for a connection.
    ///
    /// Returns the previous record if the connection had already joined.
    pub fn upsert_player(&mut self, id: PlayerId, mut player: Player) -> Option<Player> {
        player.id = id;
        self.players.insert(id, player)
    }

    /// Get a player by connection id.
    pub fn get_player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Get a player mutably by connection id.
    pub(crate) fn get_player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    /// Remove a player.
    pub fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        self.players.remove(id)
    }

    /// Snapshot of all players in ascending id order.
    pub fn list_players(&self) -> Vec<Player> {
        self.players.values().cloned().collect()
    }

    /// Borrowing iterator over players in ascending id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Number of joined players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Take the next collectible id.
    pub fn allocate_collectible_id(&mut self) -> CollectibleId {
        let id = CollectibleId(self.next_collectible_id);
        self.next_collectible_id += 1;
        id
    }

    /// Insert a collectible.
    pub fn add_collectible(&mut self, item: Collectible) {
        self.collectibles.insert(item.id, item);
    }

    /// Remove a collectible.
    pub fn remove_collectible(&mut self, id: &CollectibleId) -> Option<Collectible> {
        self.collectibles.remove(id)
    }

    /// Get a collectible by id.
    pub fn get_collectible(&self, id: &CollectibleId) -> Option<&Collectible> {
        self.collectibles.get(id)
    }

    /// Snapshot of all collectibles in ascending id order.
    pub fn list_collectibles(&self) -> Vec<Collectible> {
        self.collectibles.values().cloned().collect()
    }

    /// Number of live collectibles.
    pub fn collectible_count(&self) -> usize {
        self.collectibles.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
