//! Per-frame update
//!
//! Runs the gameplay components in a fixed order once per rendered frame:
//! diver kinematics, then treasure pickup, then camera follow.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::CameraRig;
use super::diver::DiverKinematics;
use super::input::InputAggregator;
use super::state::{GameEvent, GameState};
use super::treasure;
use crate::consts::TREASURE_COUNT;

/// One play session: the store plus the components that write to it
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the treasure layout was generated from
    pub seed: u64,
    pub state: GameState,
    pub input: InputAggregator,
    pub diver: DiverKinematics,
    pub camera: CameraRig,
    /// Frames advanced so far
    pub frame: u64,
}

impl Session {
    /// New session with the default treasure count
    pub fn new(seed: u64) -> Self {
        Self::with_treasures(seed, TREASURE_COUNT)
    }

    pub fn with_treasures(seed: u64, count: usize) -> Self {
        let mut state = GameState::new();
        let mut rng = Pcg32::seed_from_u64(seed);
        treasure::spawn(&mut state, count, &mut rng);
        Self {
            seed,
            state,
            input: InputAggregator::new(),
            diver: DiverKinematics::new(),
            camera: CameraRig::new(),
            frame: 0,
        }
    }

    /// Start over with a new layout. Keys and the stick that are still
    /// held keep driving the diver in the new session.
    pub fn restart(&mut self, seed: u64, count: usize) {
        let input = std::mem::take(&mut self.input);
        let vector = self.state.input();
        *self = Self::with_treasures(seed, count);
        self.input = input;
        self.state.set_input(vector);
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.input.key_down(code, &mut self.state)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.input.key_up(code, &mut self.state)
    }

    pub fn touch_move(&mut self, vector: Vec2) {
        self.input.touch_move(vector, &mut self.state);
    }

    pub fn touch_end(&mut self) {
        self.input.touch_end(&mut self.state);
    }

    pub fn release_all(&mut self) {
        self.input.release_all(&mut self.state);
    }
}

/// Advance the session by one rendered frame of `dt` seconds.
///
/// Returns the gameplay events raised during the frame.
pub fn tick(session: &mut Session, dt: f32) -> Vec<GameEvent> {
    let dt = dt.max(0.0);
    session.frame += 1;

    let yaw = session.camera.yaw();
    session.diver.step(&mut session.state, yaw, dt);
    treasure::update(&mut session.state, dt);
    let pose = session.state.diver();
    session.camera.follow(&pose, dt);

    let events = session.state.drain_events();
    for event in &events {
        if let GameEvent::AllTreasuresFound { score } = event {
            log::info!("All treasures found! Final score: {}", score);
        }
    }
    events
}
