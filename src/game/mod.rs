//! Game Logic Module
//!
//! Everything that reads or writes world state. No I/O happens here:
//! handlers return or queue [`GameEvent`]s and the network layer delivers
//! them.
//!
//! ## Module Structure
//!
//! - `state`: World State Store (players, collectibles, id counter)
//! - `spawner`: Collectible creation
//! - `collision`: Pickup detection
//! - `movement`: Move validation and resolution
//! - `rank`: Score ordering and rank labels
//! - `lifecycle`: Join and disconnect
//! - `world`: Owner of all of the above, plus counters
//! - `events`: Outbound events and their audiences

pub mod collision;
pub mod events;
pub mod lifecycle;
pub mod movement;
pub mod rank;
pub mod spawner;
pub mod state;
pub mod world;

// Re-export key types
pub use events::{Audience, GameEvent, GameEventData};
pub use lifecycle::JoinRequest;
pub use movement::{Direction, MoveCommand, MoveRejection};
pub use rank::RankLabel;
pub use spawner::{CollectibleSpawner, SpawnConfig};
pub use state::{Collectible, CollectibleId, Player, PlayerId, WorldState};
pub use world::{GameWorld, WorldStats};
