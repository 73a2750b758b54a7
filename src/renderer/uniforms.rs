//! GPU data structures (must match `sdf_shader.wgsl`)
//!
//! Built from the session on the CPU each frame; kept free of wgpu types so
//! the packing can be tested without a device.

use bytemuck::{Pod, Zeroable};

use super::MAX_TREASURES;
use crate::consts::CAMERA_FOV_Y;
use crate::settings::Settings;
use crate::sim::Session;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2], // offset 0
    pub time: f32,            // offset 8
    pub fov_y: f32,           // offset 12
    pub camera_pos: [f32; 4], // offset 16 (w unused)
    pub camera_target: [f32; 4],
    /// xyz = diver position, w = facing
    pub diver: [f32; 4],
    /// x = body tilt, y = 1 while swimming, z = diver animation clock
    pub diver_anim: [f32; 4],
    /// x = treasure count, y = march steps, z = water effects on, w = animate effects
    pub counts: [u32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TreasureData {
    /// xyz = bobbing position, w = animation clock
    pub pos_time: [f32; 4],
    /// x = spin angle
    pub spin: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct TreasureBlock {
    pub items: [TreasureData; MAX_TREASURES],
}

impl Globals {
    pub fn from_session(
        session: &Session,
        settings: &Settings,
        resolution: (u32, u32),
        elapsed: f32,
    ) -> Self {
        let camera = &session.camera;
        let pose = session.state.diver();
        let swimming = session.state.input().length() > crate::consts::INPUT_DEAD_ZONE;
        let treasure_count = session
            .state
            .treasures()
            .iter()
            .filter(|t| !t.collected)
            .take(MAX_TREASURES)
            .count() as u32;

        Self {
            resolution: [resolution.0 as f32, resolution.1 as f32],
            time: if settings.animate_effects() { elapsed } else { 0.0 },
            fov_y: CAMERA_FOV_Y,
            camera_pos: camera.position.extend(1.0).to_array(),
            camera_target: camera.look_at.extend(1.0).to_array(),
            diver: pose.position.extend(pose.rotation).to_array(),
            diver_anim: [
                session.diver.tilt(),
                if swimming { 1.0 } else { 0.0 },
                session.diver.anim_time(),
                0.0,
            ],
            counts: [
                treasure_count,
                settings.quality.march_steps(),
                settings.quality.water_effects_enabled() as u32,
                settings.animate_effects() as u32,
            ],
        }
    }
}

impl TreasureBlock {
    /// Pack uncollected treasures; collected chests are not drawn
    pub fn from_session(session: &Session) -> Self {
        let mut block = Self::zeroed();
        let visible = session.state.treasures().iter().filter(|t| !t.collected);
        for (slot, treasure) in block.items.iter_mut().zip(visible) {
            *slot = TreasureData {
                pos_time: treasure
                    .animated_position()
                    .extend(treasure.anim_time)
                    .to_array(),
                spin: [treasure.spin, 0.0, 0.0, 0.0],
            };
        }
        block
    }
}
