//! Collision Detection
//!
//! Player-vs-collectible pickup test. Both are treated as points and a
//! pickup happens when the per-axis distance is within the threshold on
//! both axes (a square, not a circle).

use crate::game::state::{Collectible, CollectibleId, Player, WorldState};

/// Pickup threshold per axis, in pixels (inclusive).
pub const PICKUP_THRESHOLD: f64 = 20.0;

/// Check if a point is within pickup range of a collectible.
#[inline]
pub fn within_pickup_range(x: f64, y: f64, item: &Collectible) -> bool {
    let dx = (x - item.x).abs();
    let dy = (y - item.y).abs();
    dx <= PICKUP_THRESHOLD && dy <= PICKUP_THRESHOLD
}

/// Check if a player collides with a collectible.
#[inline]
pub fn check_pickup(player: &Player, item: &Collectible) -> bool {
    within_pickup_range(player.x, player.y, item)
}

/// All collectibles the player currently touches, in ascending id order.
pub fn find_pickups(state: &WorldState, player: &Player) -> Vec<CollectibleId> {
    state
        .list_collectibles()
        .iter()
        .filter(|item| check_pickup(player, item))
        .map(|item| item.id)
        .collect()
}
