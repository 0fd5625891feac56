//! # Utilities Module
//!
//! Collaborators the simulation depends on (random numbers, field of view)
//! plus step math, line of sight and reachability checks.

pub mod fov;
pub mod math;
pub mod pathfinding;
pub mod random;

pub use fov::*;
pub use math::*;
pub use pathfinding::*;
pub use random::*;
