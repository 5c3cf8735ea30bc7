//! # Collect Arena Server
//!
//! Authoritative real-time game-state server. Clients join a shared 2D
//! world over WebSocket, move around, pick up collectibles and receive
//! live score and rank updates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   COLLECT ARENA SERVER                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── bounds.rs   - World bounds and clamping                 │
//! │  └── rng.rs      - Seedable xoroshiro128+ PRNG              │
//! │                                                              │
//! │  game/           - Game logic (no I/O)                       │
//! │  ├── state.rs    - Players, collectibles, id counter         │
//! │  ├── spawner.rs  - Collectible creation                      │
//! │  ├── collision.rs- Pickup detection                          │
//! │  ├── movement.rs - Move validation and resolution            │
//! │  ├── rank.rs     - Rank labels                               │
//! │  ├── lifecycle.rs- Join and disconnect                       │
//! │  ├── events.rs   - Outbound events and audiences             │
//! │  └── world.rs    - World owner and counters                  │
//! │                                                              │
//! │  network/        - Networking                                │
//! │  ├── server.rs   - WebSocket server                          │
//! │  ├── hub.rs      - Single world task                         │
//! │  ├── protocol.rs - Message types                             │
//! │  └── session.rs  - Per-connection delivery queues            │
//! │                                                              │
//! │  config.rs       - Environment configuration                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Guarantee
//!
//! One task owns the world and handles one command at a time. Players
//! and collectibles live in `BTreeMap`s, so collision scans and rank
//! tie-breaks follow ascending id. With a fixed `SPAWN_SEED` the same
//! command sequence always produces the same events.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use crate::config::ServerConfig;
pub use crate::core::rng::DeterministicRng;
pub use game::state::{Collectible, CollectibleId, Player, PlayerId};
pub use game::world::{GameWorld, WorldStats};
pub use network::{GameServer, GameServerError, WorldHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
