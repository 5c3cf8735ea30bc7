//! Collectible Spawning
//!
//! One seed item at startup, then one replacement per pickup at a random
//! whole-pixel spot in the spawn region.

use crate::core::bounds::clamp_coordinate;
use crate::core::rng::DeterministicRng;
use crate::game::events::GameEvent;
use crate::game::state::{Collectible, WorldState};

/// Configuration for collectible spawning.
#[derive(Clone, Debug)]
pub struct SpawnConfig {
    /// Position of the startup item
    pub seed_position: (f64, f64),
    /// Value of the startup item
    pub seed_value: u32,
    /// Replacements land in `[0, extent) × [0, extent)`
    pub respawn_extent: u32,
    /// Value of every replacement
    pub respawn_value: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            seed_position: (200.0, 200.0),
            seed_value: 5,
            respawn_extent: 400,
            respawn_value: 1,
        }
    }
}

/// Creates collectibles and announces them.
#[derive(Clone, Debug)]
pub struct CollectibleSpawner {
    rng: DeterministicRng,
    config: SpawnConfig,
}

impl CollectibleSpawner {
    /// Create a spawner with its own RNG.
    pub fn new(rng: DeterministicRng, config: SpawnConfig) -> Self {
        Self { rng, config }
    }

    /// Allocate an id, insert the item and queue a `collectibleSpawned` event.
    ///
    /// Position is clamped to the world and value is at least 1.
    pub fn spawn(
        &mut self,
        state: &mut WorldState,
        x: f64,
        y: f64,
        value: u32,
        events: &mut Vec<GameEvent>,
    ) -> Collectible {
        let item = Collectible {
            id: state.allocate_collectible_id(),
            x: clamp_coordinate(x),
            y: clamp_coordinate(y),
            value: value.max(1),
        };
        state.add_collectible(item.clone());
        events.push(GameEvent::collectible_spawned(item.clone()));
        item
    }

    /// Spawn the startup item.
    pub fn spawn_seed(&mut self, state: &mut WorldState, events: &mut Vec<GameEvent>) -> Collectible {
        let (x, y) = self.config.seed_position;
        let value = self.config.seed_value;
        self.spawn(state, x, y, value, events)
    }

    /// Spawn a replacement at a random spot in the spawn region.
    pub fn spawn_replacement(
        &mut self,
        state: &mut WorldState,
        events: &mut Vec<GameEvent>,
    ) -> Collectible {
        let x = self.rng.next_coordinate(self.config.respawn_extent);
        let y = self.rng.next_coordinate(self.config.respawn_extent);
        let value = self.config.respawn_value;
        self.spawn(state, x, y, value, events)
    }
}
