//! Session Lifecycle
//!
//! Join and disconnect handling. A connection has no player until it
//! sends a join; joining again replaces the record.

use tracing::debug;

use crate::game::events::GameEvent;
use crate::game::state::{Meta, Player, PlayerId, WorldState};

/// Spawn position used when a join gives none.
pub const DEFAULT_SPAWN: (f64, f64) = (50.0, 50.0);

/// Validated join payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoinRequest {
    /// Requested x (missing or zero means 50)
    pub x: Option<f64>,
    /// Requested y (missing or zero means 50)
    pub y: Option<f64>,
    /// Display attributes
    pub meta: Meta,
}

/// Result of a join.
#[derive(Debug)]
pub struct JoinOutcome {
    /// The stored record
    pub player: Player,
    /// Whether an earlier record for this session was replaced
    pub rejoined: bool,
    /// Snapshot for the joiner, then presence for everyone else
    pub events: Vec<GameEvent>,
}

/// Create (or replace) the player for a session.
pub fn join(state: &mut WorldState, id: PlayerId, request: JoinRequest) -> JoinOutcome {
    let x = spawn_coordinate(request.x, DEFAULT_SPAWN.0);
    let y = spawn_coordinate(request.y, DEFAULT_SPAWN.1);
    let player = Player::new(id, x, y).with_meta(request.meta);

    let rejoined = state.upsert_player(id, player.clone()).is_some();
    if rejoined {
        debug!("Player {} re-joined, record replaced", id);
    }

    let events = vec![
        GameEvent::world_snapshot(id, state.list_players(), state.list_collectibles()),
        GameEvent::player_joined(player.clone()),
    ];

    JoinOutcome { player, rejoined, events }
}

// Zero and NaN count as unset
fn spawn_coordinate(requested: Option<f64>, default: f64) -> f64 {
    requested.filter(|v| *v != 0.0 && !v.is_nan()).unwrap_or(default)
}

/// Remove a session's player, if it ever joined.
pub fn disconnect(state: &mut WorldState, id: PlayerId) -> Option<GameEvent> {
    state
        .remove_player(&id)
        .map(|player| GameEvent::player_left(player.id))
}
