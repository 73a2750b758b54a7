//! Input aggregation
//!
//! Merges held direction keys and the touch joystick into the single
//! movement vector stored in `GameState`. Whichever source fired last wins;
//! the two are never blended.

use glam::Vec2;

use super::state::GameState;

/// Movement directions reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionKey {
    Up,
    Down,
    Left,
    Right,
}

impl DirectionKey {
    /// Map a DOM `KeyboardEvent.code` (arrows and WASD) to a direction
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(DirectionKey::Up),
            "ArrowDown" | "KeyS" => Some(DirectionKey::Down),
            "ArrowLeft" | "KeyA" => Some(DirectionKey::Left),
            "ArrowRight" | "KeyD" => Some(DirectionKey::Right),
            _ => None,
        }
    }
}

/// Tracks held keys and writes the combined vector into the store
#[derive(Debug, Clone, Default)]
pub struct InputAggregator {
    /// Codes currently held, so releasing one alias keeps the other active
    held_codes: Vec<String>,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns true if the code is a movement key.
    pub fn key_down(&mut self, code: &str, state: &mut GameState) -> bool {
        if DirectionKey::from_code(code).is_none() {
            return false;
        }
        if !self.held_codes.iter().any(|c| c == code) {
            self.held_codes.push(code.to_string());
        }
        self.refresh_keys(state);
        true
    }

    /// Handle a key release. Returns true if the code is a movement key.
    pub fn key_up(&mut self, code: &str, state: &mut GameState) -> bool {
        if DirectionKey::from_code(code).is_none() {
            return false;
        }
        self.held_codes.retain(|c| c != code);
        self.refresh_keys(state);
        true
    }

    /// Joystick moved: replaces the keyboard vector until released
    pub fn touch_move(&self, vector: Vec2, state: &mut GameState) {
        state.set_input(clamp_to_unit(vector));
    }

    /// Joystick released
    pub fn touch_end(&self, state: &mut GameState) {
        state.set_input(Vec2::ZERO);
    }

    /// Focus lost: forget held keys so the diver doesn't keep swimming
    pub fn release_all(&mut self, state: &mut GameState) {
        self.held_codes.clear();
        state.set_input(Vec2::ZERO);
    }

    pub fn is_held(&self, key: DirectionKey) -> bool {
        self.held_codes
            .iter()
            .any(|c| DirectionKey::from_code(c) == Some(key))
    }

    /// Vector for the keys currently held
    pub fn key_vector(&self) -> Vec2 {
        keys_to_vector(
            self.is_held(DirectionKey::Up),
            self.is_held(DirectionKey::Down),
            self.is_held(DirectionKey::Left),
            self.is_held(DirectionKey::Right),
        )
    }

    // A key event takes over from the joystick
    fn refresh_keys(&self, state: &mut GameState) {
        state.set_input(self.key_vector());
    }
}

/// Combine held directions into a movement vector.
///
/// Opposing keys resolve by fixed precedence: down beats up, right beats
/// left. Diagonals are normalized to unit length.
pub fn keys_to_vector(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let y = if down {
        -1.0
    } else if up {
        1.0
    } else {
        0.0
    };
    let x = if right {
        1.0
    } else if left {
        -1.0
    } else {
        0.0
    };
    let v = Vec2::new(x, y);
    if x != 0.0 && y != 0.0 { v.normalize() } else { v }
}

fn clamp_to_unit(v: Vec2) -> Vec2 {
    let v = v.clamp(Vec2::NEG_ONE, Vec2::ONE);
    if v.length_squared() > 1.0 {
        v.normalize()
    } else {
        v
    }
}

/// Static on-screen joystick geometry (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchJoystick {
    /// Stick center, measured from the left and bottom viewport edges
    pub inset: Vec2,
    pub radius: f32,
    /// Fraction of the viewport width (from the left) that accepts touches
    pub zone_width: f32,
    /// Fraction of the viewport height (from the bottom) that accepts touches
    pub zone_height: f32,
}

impl Default for TouchJoystick {
    fn default() -> Self {
        Self {
            inset: Vec2::new(80.0, 80.0),
            radius: 60.0,
            zone_width: 0.5,
            zone_height: 0.4,
        }
    }
}

impl TouchJoystick {
    /// Stick center in client coordinates (y down)
    pub fn center(&self, viewport: Vec2) -> Vec2 {
        Vec2::new(self.inset.x, viewport.y - self.inset.y)
    }

    /// Whether a touch starting at `point` belongs to the joystick
    pub fn in_zone(&self, point: Vec2, viewport: Vec2) -> bool {
        point.x <= viewport.x * self.zone_width && point.y >= viewport.y * (1.0 - self.zone_height)
    }

    /// Movement vector for a touch at `point`: offset from center over
    /// radius, y pointing up, clamped to the unit disc
    pub fn vector(&self, point: Vec2, viewport: Vec2) -> Vec2 {
        let offset = point - self.center(viewport);
        clamp_to_unit(Vec2::new(offset.x, -offset.y) / self.radius)
    }
}
