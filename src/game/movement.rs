//! Move Resolution
//!
//! The authoritative move handler: validate, displace, clamp, collect,
//! respawn, rank, announce. Runs to completion against the world it is
//! given; the caller guarantees no other event touches the world meanwhile.

use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::core::bounds::in_world;
use crate::game::collision::find_pickups;
use crate::game::events::GameEvent;
use crate::game::rank::{rank_of, RankLabel};
use crate::game::spawner::CollectibleSpawner;
use crate::game::state::{CollectibleId, PlayerId, WorldState};

/// Largest displacement a single move may apply.
pub const MAX_MOVE_AMOUNT: f64 = 100.0;

/// Movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards y = 0
    Up,
    /// Towards y = max
    Down,
    /// Towards x = 0
    Left,
    /// Towards x = max
    Right,
}

impl Direction {
    /// Displacement `(dx, dy)` for a given amount.
    pub fn delta(self, amount: f64) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -amount),
            Direction::Down => (0.0, amount),
            Direction::Left => (-amount, 0.0),
            Direction::Right => (amount, 0.0),
        }
    }
}

impl FromStr for Direction {
    type Err = MoveRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(MoveRejection::InvalidDirection),
        }
    }
}

/// Why a move was dropped. Never reported to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    /// Sender has not joined.
    #[error("unknown player")]
    UnknownPlayer,

    /// Direction is not one of the four literals.
    #[error("invalid direction")]
    InvalidDirection,

    /// Amount is missing or not a finite number.
    #[error("amount is not numeric")]
    NonNumericAmount,
}

/// A validated move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveCommand {
    /// Direction of travel
    pub direction: Direction,
    /// Claimed amount, not yet clamped
    pub amount: f64,
}

impl MoveCommand {
    /// Validate raw payload fields.
    ///
    /// Only a JSON string direction and a JSON number amount are accepted;
    /// `"5"` is not a number.
    pub fn from_raw(direction: &Value, amount: &Value) -> Result<Self, MoveRejection> {
        let direction = direction
            .as_str()
            .ok_or(MoveRejection::InvalidDirection)?
            .parse::<Direction>()?;
        let amount = amount
            .as_f64()
            .filter(|a| a.is_finite())
            .ok_or(MoveRejection::NonNumericAmount)?;

        Ok(Self { direction, amount })
    }
}

/// Clamp a claimed amount to `[0, MAX_MOVE_AMOUNT]`.
#[inline]
pub fn clamp_amount(amount: f64) -> f64 {
    if amount.is_nan() {
        return 0.0;
    }
    amount.clamp(0.0, MAX_MOVE_AMOUNT)
}

/// Result of an accepted move.
#[derive(Debug, Default)]
pub struct MoveOutcome {
    /// Events in emission order
    pub events: Vec<GameEvent>,
    /// Collectibles picked up, in pickup order
    pub collected: Vec<CollectibleId>,
    /// Mover's rank after the move
    pub rank: Option<RankLabel>,
}

/// Apply one move.
///
/// Collisions are checked against the collectibles present once the
/// player has moved; replacements spawned during the pass wait for the
/// next move.
pub fn apply_move(
    state: &mut WorldState,
    spawner: &mut CollectibleSpawner,
    player_id: PlayerId,
    command: MoveCommand,
) -> Result<MoveOutcome, MoveRejection> {
    let player = state
        .get_player_mut(&player_id)
        .ok_or(MoveRejection::UnknownPlayer)?;

    let amount = clamp_amount(command.amount);
    let (dx, dy) = command.direction.delta(amount);
    player.set_position(player.x + dx, player.y + dy);
    debug_assert!(in_world(player.x, player.y));
    let moved = player.clone();

    let mut outcome = MoveOutcome::default();

    for collectible_id in find_pickups(state, &moved) {
        let Some(item) = state.remove_collectible(&collectible_id) else {
            continue;
        };
        let Some(player) = state.get_player_mut(&player_id) else {
            break;
        };
        let new_score = player.add_score(item.value);

        debug!("Player {} collected {} (score {})", player_id, collectible_id, new_score);
        outcome.events.push(GameEvent::collected(player_id, collectible_id, new_score));
        outcome.collected.push(collectible_id);

        spawner.spawn_replacement(state, &mut outcome.events);
    }

    let rank = rank_of(player_id, state.players());
    if let Some(player) = state.get_player(&player_id) {
        outcome.events.push(GameEvent::player_moved(player, rank.to_string()));
    }
    outcome.rank = Some(rank);

    Ok(outcome)
}
