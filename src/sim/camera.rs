//! Chase camera
//!
//! Trails the diver at a fixed offset rotated by the diver's facing. Position
//! is smoothed; orientation snaps to the look-at point every frame.

use glam::{Mat4, Vec3};

use super::state::DiverPose;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: CAMERA_START,
            look_at: DIVER_START + Vec3::Y * CAMERA_LOOK_HEIGHT,
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Desired eye position for a diver pose
    pub fn desired_position(pose: &DiverPose) -> Vec3 {
        let (sin, cos) = pose.rotation.sin_cos();
        pose.position + Vec3::new(sin * CAMERA_DISTANCE, CAMERA_HEIGHT, cos * CAMERA_DISTANCE)
    }

    /// Point the camera looks at for a diver pose
    pub fn desired_look_at(pose: &DiverPose) -> Vec3 {
        pose.position + Vec3::Y * CAMERA_LOOK_HEIGHT
    }

    /// Ease toward the diver and re-aim
    pub fn follow(&mut self, pose: &DiverPose, dt: f32) {
        let target = Self::desired_position(pose);
        self.position = self.position.lerp(target, CAMERA_EASE * dt);
        self.look_at = Self::desired_look_at(pose);
    }

    /// Heading around the vertical axis, 0 when looking down -z
    pub fn yaw(&self) -> f32 {
        let forward = self.look_at - self.position;
        if forward.x == 0.0 && forward.z == 0.0 {
            return 0.0;
        }
        (-forward.x).atan2(-forward.z)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(CAMERA_FOV_Y, aspect.max(0.01), 0.1, 200.0);
        projection * self.view()
    }
}
