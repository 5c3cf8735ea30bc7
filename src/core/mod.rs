//! Core primitives shared by the game layer.

pub mod bounds;
pub mod rng;

pub use bounds::{clamp_coordinate, in_world, WORLD_MAX, WORLD_MIN};
pub use rng::DeterministicRng;
