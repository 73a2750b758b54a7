//! Diver kinematics
//!
//! Integrates the movement vector into velocity and position with drag,
//! eases facing toward the swim direction, animates the bob and body tilt,
//! and clamps the diver to the world bounds.

use glam::{Vec2, Vec3};

use super::state::{DiverPose, GameState};
use crate::consts::*;
use crate::{lerp, wrap_angle};

/// Transient motion state owned by the diver update
#[derive(Debug, Clone)]
pub struct DiverKinematics {
    velocity: Vec3,
    target_rotation: f32,
    /// Accumulated animation time (seconds)
    anim_time: f32,
    /// Forward lean of the body (radians)
    tilt: f32,
}

impl Default for DiverKinematics {
    fn default() -> Self {
        Self::new()
    }
}

impl DiverKinematics {
    pub fn new() -> Self {
        Self {
            velocity: Vec3::ZERO,
            target_rotation: 0.0,
            anim_time: 0.0,
            tilt: 0.0,
        }
    }

    #[cfg(test)]
    pub(crate) fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[cfg(test)]
    pub(crate) fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn anim_time(&self) -> f32 {
        self.anim_time
    }

    /// Advance one frame and publish the new pose.
    ///
    /// `camera_yaw` is the render camera's heading; input is view-relative.
    pub fn step(&mut self, state: &mut GameState, camera_yaw: f32, dt: f32) {
        self.anim_time += dt;

        let input = state.input();
        let magnitude = input.length();
        let swimming = magnitude > INPUT_DEAD_ZONE;

        if swimming {
            let world = view_to_world(input, camera_yaw);
            self.target_rotation = world.x.atan2(world.y);
            self.velocity.x += world.x * DIVER_SPEED * dt;
            self.velocity.z += world.y * DIVER_SPEED * dt;
        }

        // Drag is applied per frame, not per second
        self.velocity *= DIVER_DRAG;

        let pose = state.diver();
        let diff = wrap_angle(self.target_rotation - pose.rotation);
        let rotation = pose.rotation + diff * DIVER_ROTATION_SPEED * dt;

        let mut position = pose.position + self.velocity * dt;
        // Hard clamp; velocity is left alone at the wall
        position.x = position.x.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT);
        position.z = position.z.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT);

        let idle_bob = (self.anim_time * IDLE_BOB_RATE).sin() * IDLE_BOB_AMPLITUDE;
        let swim_bob = if swimming {
            (self.anim_time * SWIM_BOB_RATE).sin() * SWIM_BOB_AMPLITUDE
        } else {
            0.0
        };
        position.y = DIVER_BASE_HEIGHT + idle_bob + swim_bob;

        let tilt_target = if swimming { SWIM_TILT } else { 0.0 };
        self.tilt = lerp(self.tilt, tilt_target, dt * TILT_EASE);

        state.set_diver_pose(DiverPose { position, rotation });
    }
}

/// Rotate a view-space stick vector (x right, y forward) into world x/z
pub fn view_to_world(input: Vec2, camera_yaw: f32) -> Vec2 {
    let (sin, cos) = camera_yaw.sin_cos();
    Vec2::new(input.x * cos - input.y * sin, input.x * sin + input.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const EPS: f32 = 1e-5;

    #[test]
    fn test_idle_diver_stays_put() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        for _ in 0..120 {
            diver.step(&mut state, 0.0, DT);
        }
        let pose = state.diver();
        assert_eq!(pose.position.x, 0.0);
        assert_eq!(pose.position.z, 0.0);
        assert_eq!(pose.rotation, 0.0);
        assert_eq!(diver.tilt(), 0.0);
        // Idle bob only
        assert!((pose.position.y - DIVER_BASE_HEIGHT).abs() <= IDLE_BOB_AMPLITUDE + EPS);
    }

    #[test]
    fn test_forward_input_accelerates() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        state.set_input(Vec2::new(0.0, 1.0));
        diver.step(&mut state, 0.0, DT);

        // One frame: v = input * speed * dt, then drag
        let expected = DIVER_SPEED * DT * DIVER_DRAG;
        assert!((diver.velocity().z - expected).abs() < EPS);
        assert_eq!(diver.velocity().x, 0.0);
        assert!((state.diver().position.z - expected * DT).abs() < EPS);
    }

    #[test]
    fn test_diagonal_input_acceleration() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        let s = std::f32::consts::FRAC_1_SQRT_2;
        state.set_input(Vec2::new(s, s));
        diver.step(&mut state, 0.0, DT);

        let expected = s * DIVER_SPEED * DT * DIVER_DRAG;
        assert!((diver.velocity().x - expected).abs() < EPS);
        assert!((diver.velocity().z - expected).abs() < EPS);
    }

    #[test]
    fn test_dead_zone_ignores_small_input() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        state.set_input(Vec2::new(0.05, 0.05));
        diver.step(&mut state, 0.0, DT);
        assert_eq!(diver.velocity(), Vec3::ZERO);
        assert_eq!(diver.tilt(), 0.0);
    }

    #[test]
    fn test_drag_decays_velocity_without_input() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        diver.set_velocity(Vec3::new(4.0, 0.0, -2.0));
        diver.step(&mut state, 0.0, DT);
        assert!((diver.velocity() - Vec3::new(3.8, 0.0, -1.9)).length() < EPS);
        assert!((state.diver().position.x - 3.8 * DT).abs() < EPS);
        assert!((state.diver().position.z + 1.9 * DT).abs() < EPS);
    }

    #[test]
    fn test_rotation_eases_toward_swim_direction() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        // Stick right with camera yaw 0 -> world +x -> facing atan2(1, 0) = π/2
        state.set_input(Vec2::new(1.0, 0.0));
        diver.step(&mut state, 0.0, DT);
        let first = state.diver().rotation;
        let expected = std::f32::consts::FRAC_PI_2 * DIVER_ROTATION_SPEED * DT;
        assert!((first - expected).abs() < EPS);

        for _ in 0..600 {
            diver.step(&mut state, 0.0, DT);
        }
        assert!((state.diver().rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_takes_short_way_around() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        state.set_diver_pose(DiverPose {
            position: DIVER_START,
            rotation: 3.0,
        });
        diver.target_rotation = -3.0;
        diver.step(&mut state, 0.0, DT);
        // Shortest path from 3.0 to -3.0 goes up through π
        assert!(state.diver().rotation > 3.0);
    }

    #[test]
    fn test_camera_yaw_rotates_input() {
        let world = view_to_world(Vec2::new(0.0, 1.0), std::f32::consts::FRAC_PI_2);
        assert!((world - Vec2::new(-1.0, 0.0)).length() < EPS);

        let world = view_to_world(Vec2::new(1.0, 0.0), 0.0);
        assert!((world - Vec2::new(1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_boundary_clamp_keeps_velocity() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        state.set_input(Vec2::new(1.0, 0.0));
        for _ in 0..5000 {
            diver.step(&mut state, 0.0, DT);
        }
        assert_eq!(state.diver().position.x, WORLD_HALF_EXTENT);
        assert!(diver.velocity().x > 0.0);
    }

    #[test]
    fn test_swimming_tilts_body() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        state.set_input(Vec2::new(0.0, 1.0));
        diver.step(&mut state, 0.0, DT);
        assert!((diver.tilt() - SWIM_TILT * DT * TILT_EASE).abs() < EPS);
        for _ in 0..600 {
            diver.step(&mut state, 0.0, DT);
        }
        assert!((diver.tilt() - SWIM_TILT).abs() < 1e-3);
    }

    #[test]
    fn test_zero_dt_does_not_move() {
        let mut state = GameState::new();
        let mut diver = DiverKinematics::new();
        state.set_input(Vec2::new(1.0, 1.0).normalize());
        diver.step(&mut state, 0.0, 0.0);
        assert_eq!(state.diver().position.x, 0.0);
        assert_eq!(state.diver().position.z, 0.0);
        assert_eq!(diver.velocity(), Vec3::ZERO);
    }
}
