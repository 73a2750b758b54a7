//! Treasure Dive - An underwater treasure hunt
//!
//! Core modules:
//! - `sim`: Deterministic gameplay (diver movement, treasure pickup, camera follow)
//! - `hud`: Score and progress text derived from game state
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Presentation preferences

pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use hud::HudView;
pub use settings::{QualityPreset, Settings};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Largest frame delta fed to the simulation (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World bounds: diver x/z stay within [-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT]
    pub const WORLD_HALF_EXTENT: f32 = 45.0;

    /// Diver defaults
    pub const DIVER_START: Vec3 = Vec3::new(0.0, 3.0, 0.0);
    pub const DIVER_BASE_HEIGHT: f32 = 3.0;
    pub const DIVER_SPEED: f32 = 8.0;
    pub const DIVER_ROTATION_SPEED: f32 = 5.0;
    /// Per-frame velocity multiplier
    pub const DIVER_DRAG: f32 = 0.95;
    /// Input magnitude below which the stick is treated as centered
    pub const INPUT_DEAD_ZONE: f32 = 0.1;
    pub const IDLE_BOB_RATE: f32 = 2.0;
    pub const IDLE_BOB_AMPLITUDE: f32 = 0.1;
    pub const SWIM_BOB_RATE: f32 = 6.0;
    pub const SWIM_BOB_AMPLITUDE: f32 = 0.15;
    /// Forward lean while swimming (radians)
    pub const SWIM_TILT: f32 = 0.2;
    pub const TILT_EASE: f32 = 5.0;

    /// Treasure defaults
    pub const TREASURE_COUNT: usize = 10;
    /// Spawn square is [-TREASURE_SPAWN_HALF_EXTENT, TREASURE_SPAWN_HALF_EXTENT] on x/z
    pub const TREASURE_SPAWN_HALF_EXTENT: f32 = 20.0;
    pub const TREASURE_MIN_HEIGHT: f32 = 1.0;
    pub const TREASURE_MAX_HEIGHT: f32 = 3.0;
    pub const PICKUP_RADIUS: f32 = 2.0;
    pub const TREASURE_SCORE: u64 = 100;
    pub const TREASURE_BOB_RATE: f32 = 2.0;
    pub const TREASURE_BOB_AMPLITUDE: f32 = 0.2;
    /// Chest spin (radians/sec)
    pub const TREASURE_SPIN_RATE: f32 = 0.5;

    /// Chase camera
    pub const CAMERA_START: Vec3 = Vec3::new(0.0, 5.0, 10.0);
    pub const CAMERA_DISTANCE: f32 = 8.0;
    pub const CAMERA_HEIGHT: f32 = 5.0;
    pub const CAMERA_LOOK_HEIGHT: f32 = 1.0;
    pub const CAMERA_EASE: f32 = 3.0;
    /// Vertical field of view (radians, 60 degrees)
    pub const CAMERA_FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.sin().atan2(angle.cos())
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Horizontal (x/z) distance between two points, ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}
