//! Game Events
//!
//! Everything the world emits, tagged with who should receive it. The
//! network layer turns these into wire messages and delivers them.

use crate::game::state::{Collectible, CollectibleId, Player, PlayerId};

/// Recipients of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audience {
    /// Every connected session, joined or not.
    All,
    /// A single session.
    Only(PlayerId),
    /// Every connected session except one.
    AllExcept(PlayerId),
}

impl Audience {
    /// Whether a session is a recipient.
    pub fn includes(&self, session: PlayerId) -> bool {
        match self {
            Audience::All => true,
            Audience::Only(id) => *id == session,
            Audience::AllExcept(id) => *id != session,
        }
    }
}

/// Game event data.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEventData {
    /// Full world, sent to a newly joined session
    WorldSnapshot {
        players: Vec<Player>,
        collectibles: Vec<Collectible>,
    },

    /// A session joined the world
    PlayerJoined { player: Player },

    /// A move was accepted
    PlayerMoved {
        id: PlayerId,
        x: f64,
        y: f64,
        score: u64,
        rank: String,
    },

    /// A player picked up a collectible
    Collected {
        collector_id: PlayerId,
        collectible_id: CollectibleId,
        new_score: u64,
    },

    /// A collectible entered the world
    CollectibleSpawned { collectible: Collectible },

    /// A joined session disconnected
    PlayerLeft { id: PlayerId },
}

/// An event with its recipients.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEvent {
    /// Who receives it
    pub audience: Audience,
    /// What happened
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(audience: Audience, data: GameEventData) -> Self {
        Self { audience, data }
    }

    /// Snapshot for a joining session.
    pub fn world_snapshot(to: PlayerId, players: Vec<Player>, collectibles: Vec<Collectible>) -> Self {
        Self::new(Audience::Only(to), GameEventData::WorldSnapshot { players, collectibles })
    }

    /// Presence notice for everyone but the joiner.
    pub fn player_joined(player: Player) -> Self {
        let audience = Audience::AllExcept(player.id);
        Self::new(audience, GameEventData::PlayerJoined { player })
    }

    /// Position/score/rank update after an accepted move.
    pub fn player_moved(player: &Player, rank: String) -> Self {
        Self::new(
            Audience::All,
            GameEventData::PlayerMoved {
                id: player.id,
                x: player.x,
                y: player.y,
                score: player.score,
                rank,
            },
        )
    }

    /// Create collected event.
    pub fn collected(collector_id: PlayerId, collectible_id: CollectibleId, new_score: u64) -> Self {
        Self::new(
            Audience::All,
            GameEventData::Collected { collector_id, collectible_id, new_score },
        )
    }

    /// Create collectible spawned event.
    pub fn collectible_spawned(collectible: Collectible) -> Self {
        Self::new(Audience::All, GameEventData::CollectibleSpawned { collectible })
    }

    /// Departure notice. The leaver's session is already gone.
    pub fn player_left(id: PlayerId) -> Self {
        Self::new(Audience::AllExcept(id), GameEventData::PlayerLeft { id })
    }
}
