//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable update order (diver, treasures, camera)
//! - No rendering or platform dependencies

pub mod camera;
pub mod diver;
pub mod input;
pub mod state;
pub mod tick;
pub mod treasure;

pub use camera::CameraRig;
pub use diver::{DiverKinematics, view_to_world};
pub use input::{DirectionKey, InputAggregator, TouchJoystick, keys_to_vector};
pub use state::{Changes, DiverPose, Field, GameEvent, GameState, Snapshot, Treasure};
pub use tick::{Session, tick};
pub use treasure::{spawn, spawn_treasures};
