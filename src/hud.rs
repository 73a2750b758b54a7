//! HUD text derived from game state
//!
//! The DOM layer in `main.rs` only copies these strings into elements.

use crate::sim::GameState;

pub const INSTRUCTIONS: [&str; 2] = ["WASD or Arrow Keys to move", "Touch joystick on mobile"];

/// Class list for a HUD counter. `popped` attaches the pickup animation;
/// it has to be cleared before it can play again.
pub fn hud_item_class(popped: bool) -> &'static str {
    if popped { "hud-item pop" } else { "hud-item" }
}

/// Everything the overlay displays for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: String,
    pub treasures: String,
    /// "All treasures found" banner text, when the hunt is complete
    pub win_message: Option<String>,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let win_message = state
            .all_collected()
            .then(|| format!("Final Score: {}", state.score()));
        Self {
            score: state.score().to_string(),
            treasures: format!("{} / {}", state.collected_count(), state.total_count()),
            win_message,
        }
    }
}

/// Rolling frames-per-second estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Record a frame timestamp (milliseconds) and return the current estimate
    pub fn record(&mut self, time_ms: f64) -> u32 {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample sits where the next write goes
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (59.0 * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
