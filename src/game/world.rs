//! Game World
//!
//! Owns the world state, the spawner and the counters, and is the only
//! way handlers reach them. Each handler runs to completion and queues
//! its events; the owner drains them with [`GameWorld::take_events`].

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::game::events::GameEvent;
use crate::game::lifecycle::{self, JoinRequest};
use crate::game::movement::{apply_move, MoveCommand, MoveRejection};
use crate::game::spawner::{CollectibleSpawner, SpawnConfig};
use crate::game::state::{PlayerId, WorldState};

/// Counters for everything the world accepted, rejected or dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Accepted joins (including re-joins)
    pub joins: u64,
    /// Joins that replaced an existing record
    pub rejoins: u64,
    /// Disconnects of joined sessions
    pub departures: u64,
    /// Accepted moves
    pub moves_applied: u64,
    /// Moves from sessions without a player
    pub rejected_unknown_player: u64,
    /// Moves with a bad direction
    pub rejected_direction: u64,
    /// Moves with a non-numeric amount
    pub rejected_amount: u64,
    /// Frames that did not decode to a known message
    pub malformed_messages: u64,
    /// Pickups
    pub collections: u64,
    /// Collectibles created, startup item included
    pub spawns: u64,
    /// Outbound messages dropped on full or closed queues
    pub deliveries_dropped: u64,
}

impl WorldStats {
    /// Total silently dropped moves.
    pub fn moves_rejected(&self) -> u64 {
        self.rejected_unknown_player + self.rejected_direction + self.rejected_amount
    }

    fn record_rejection(&mut self, reason: MoveRejection) {
        match reason {
            MoveRejection::UnknownPlayer => self.rejected_unknown_player += 1,
            MoveRejection::InvalidDirection => self.rejected_direction += 1,
            MoveRejection::NonNumericAmount => self.rejected_amount += 1,
        }
    }
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "joins={} rejoins={} departures={} moves={} rejected={} (unknown_player={} direction={} amount={}) malformed={} collections={} spawns={} dropped={}",
            self.joins,
            self.rejoins,
            self.departures,
            self.moves_applied,
            self.moves_rejected(),
            self.rejected_unknown_player,
            self.rejected_direction,
            self.rejected_amount,
            self.malformed_messages,
            self.collections,
            self.spawns,
            self.deliveries_dropped,
        )
    }
}

/// The authoritative world.
pub struct GameWorld {
    state: WorldState,
    spawner: CollectibleSpawner,
    stats: WorldStats,
    /// Events generated since the last drain
    pending_events: Vec<GameEvent>,
}

impl GameWorld {
    /// Create a world and spawn the startup collectible.
    pub fn new(rng: DeterministicRng, spawn: SpawnConfig) -> Self {
        let mut world = Self {
            state: WorldState::new(),
            spawner: CollectibleSpawner::new(rng, spawn),
            stats: WorldStats::default(),
            pending_events: Vec::new(),
        };

        let seed = world.spawner.spawn_seed(&mut world.state, &mut world.pending_events);
        world.stats.spawns += 1;
        debug!("Seed collectible {} at ({}, {})", seed.id, seed.x, seed.y);

        world
    }

    /// Handle a join.
    pub fn handle_join(&mut self, id: PlayerId, request: JoinRequest) {
        let outcome = lifecycle::join(&mut self.state, id, request);
        self.stats.joins += 1;
        if outcome.rejoined {
            self.stats.rejoins += 1;
        }
        self.pending_events.extend(outcome.events);
    }

    /// Handle a raw move payload. Rejections change nothing but the counters.
    pub fn handle_move(
        &mut self,
        id: PlayerId,
        direction: &Value,
        amount: &Value,
    ) -> Result<(), MoveRejection> {
        let result = self.try_move(id, direction, amount);
        if let Err(reason) = result {
            self.stats.record_rejection(reason);
            debug!("Dropped move from {}: {}", id, reason);
        }
        result
    }

    fn try_move(&mut self, id: PlayerId, direction: &Value, amount: &Value) -> Result<(), MoveRejection> {
        if self.state.get_player(&id).is_none() {
            return Err(MoveRejection::UnknownPlayer);
        }
        let command = MoveCommand::from_raw(direction, amount)?;
        let outcome = apply_move(&mut self.state, &mut self.spawner, id, command)?;

        self.stats.moves_applied += 1;
        self.stats.collections += outcome.collected.len() as u64;
        self.stats.spawns += outcome.collected.len() as u64;
        self.pending_events.extend(outcome.events);
        Ok(())
    }

    /// Handle a transport disconnect. Returns whether a player was removed.
    pub fn handle_disconnect(&mut self, id: PlayerId) -> bool {
        match lifecycle::disconnect(&mut self.state, id) {
            Some(event) => {
                self.stats.departures += 1;
                self.pending_events.push(event);
                true
            }
            None => false,
        }
    }

    /// Count an undecodable frame.
    pub fn record_malformed(&mut self) {
        self.stats.malformed_messages += 1;
    }

    /// Count outbound messages that could not be queued.
    pub fn record_dropped(&mut self, count: u64) {
        self.stats.deliveries_dropped += count;
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Read-only view of the world.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Current counters.
    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }
}
