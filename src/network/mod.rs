//! Network Layer
//!
//! WebSocket server for real-time multiplayer communication.
//! Connection tasks only decode and forward; all game logic runs in the
//! world task through `game/`.

pub mod hub;
pub mod protocol;
pub mod server;
pub mod session;

pub use hub::{WorldCommand, WorldHandle, WorldHub};
pub use protocol::{ClientMessage, ProtocolError, ServerMessage};
pub use server::{GameServer, GameServerError};
pub use session::{DeliveryReport, SessionRegistry};
