//! Game state store
//!
//! Single source of truth for score, diver pose, input vector and treasures.
//! Each field group has its own setter with whole-value replacement; setters
//! record which groups changed so readers can redraw only what moved.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Diver position and facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiverPose {
    /// World position (x/z stay within the world bounds)
    pub position: Vec3,
    /// Facing angle around the vertical axis (radians)
    pub rotation: f32,
}

impl Default for DiverPose {
    fn default() -> Self {
        Self {
            position: DIVER_START,
            rotation: 0.0,
        }
    }
}

/// A collectible treasure chest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treasure {
    pub id: String,
    /// Spawn position, fixed for the session
    pub position: Vec3,
    pub collected: bool,
    /// Bob animation clock (seconds, starts at a random phase)
    pub anim_time: f32,
    /// Spin around the vertical axis (radians, presentation only)
    #[serde(default)]
    pub spin: f32,
}

impl Treasure {
    pub fn new(index: usize, position: Vec3, phase: f32) -> Self {
        Self {
            id: format!("treasure-{index}"),
            position,
            collected: false,
            anim_time: phase,
            spin: 0.0,
        }
    }

    /// Bobbing position used both for drawing and for the pickup test
    pub fn animated_position(&self) -> Vec3 {
        let bob = (self.anim_time * TREASURE_BOB_RATE).sin() * TREASURE_BOB_AMPLITUDE;
        self.position + Vec3::Y * bob
    }
}

/// Field groups tracked for change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Score,
    Pose,
    Input,
    Treasures,
}

/// Field groups written since the last `take_changes`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub score: bool,
    pub pose: bool,
    pub input: bool,
    pub treasures: bool,
}

impl Changes {
    fn mark(&mut self, field: Field) {
        match field {
            Field::Score => self.score = true,
            Field::Pose => self.pose = true,
            Field::Input => self.input = true,
            Field::Treasures => self.treasures = true,
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Score => self.score,
            Field::Pose => self.pose,
            Field::Input => self.input,
            Field::Treasures => self.treasures,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Gameplay events queued for the frame driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TreasureCollected { id: String, score: u64 },
    AllTreasuresFound { score: u64 },
}

/// Read-only projection handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub diver: DiverPose,
    pub treasures: Vec<TreasureView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreasureView {
    pub id: String,
    pub position: Vec3,
    pub collected: bool,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Complete game state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    score: u64,
    diver: DiverPose,
    /// Movement vector, each component in [-1, 1], magnitude <= 1
    input: Vec2,
    treasures: Vec<Treasure>,
    #[serde(skip)]
    changes: Changes,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn diver(&self) -> DiverPose {
        self.diver
    }

    pub fn input(&self) -> Vec2 {
        self.input
    }

    pub fn treasures(&self) -> &[Treasure] {
        &self.treasures
    }

    /// Mutable access for per-frame animation; collection goes through `collect_treasure`
    pub(crate) fn treasures_mut(&mut self) -> &mut [Treasure] {
        &mut self.treasures
    }

    pub fn set_diver_pose(&mut self, pose: DiverPose) {
        self.diver = pose;
        self.changes.mark(Field::Pose);
    }

    pub fn set_input(&mut self, input: Vec2) {
        self.input = input;
        self.changes.mark(Field::Input);
    }

    /// Replace the whole treasure batch
    pub fn set_treasures(&mut self, treasures: Vec<Treasure>) {
        self.treasures = treasures;
        self.changes.mark(Field::Treasures);
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.changes.mark(Field::Score);
    }

    /// Flag a treasure collected and award its points.
    ///
    /// Returns false (and changes nothing) if the id is unknown or the
    /// treasure was already collected.
    pub fn collect_treasure(&mut self, id: &str) -> bool {
        let Some(treasure) = self
            .treasures
            .iter_mut()
            .find(|t| t.id == id && !t.collected)
        else {
            return false;
        };
        treasure.collected = true;
        self.changes.mark(Field::Treasures);
        self.add_score(TREASURE_SCORE);
        self.events.push(GameEvent::TreasureCollected {
            id: id.to_string(),
            score: self.score,
        });
        if self.all_collected() {
            self.events
                .push(GameEvent::AllTreasuresFound { score: self.score });
        }
        true
    }

    pub fn collected_count(&self) -> usize {
        self.treasures.iter().filter(|t| t.collected).count()
    }

    pub fn total_count(&self) -> usize {
        self.treasures.len()
    }

    /// Win condition: at least one treasure and every treasure collected
    pub fn all_collected(&self) -> bool {
        !self.treasures.is_empty() && self.treasures.iter().all(|t| t.collected)
    }

    /// Drain the set of field groups written since the last call
    pub fn take_changes(&mut self) -> Changes {
        std::mem::take(&mut self.changes)
    }

    /// Drain queued gameplay events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            diver: self.diver,
            treasures: self
                .treasures
                .iter()
                .map(|t| TreasureView {
                    id: t.id.clone(),
                    position: t.position,
                    collected: t.collected,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_treasures(n: usize) -> GameState {
        let mut state = GameState::new();
        let treasures = (0..n)
            .map(|i| Treasure::new(i, Vec3::new(i as f32, 2.0, 0.0), 0.0))
            .collect();
        state.set_treasures(treasures);
        state.take_changes();
        state
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new();
        assert_eq!(state.score(), 0);
        assert_eq!(state.diver().position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(state.diver().rotation, 0.0);
        assert_eq!(state.input(), Vec2::ZERO);
        assert!(state.treasures().is_empty());
        assert!(!state.all_collected());
    }

    #[test]
    fn test_collect_awards_once() {
        let mut state = state_with_treasures(2);
        assert!(state.collect_treasure("treasure-1"));
        assert_eq!(state.score(), 100);
        assert!(state.treasures()[1].collected);

        // Second collection is a silent no-op
        assert!(!state.collect_treasure("treasure-1"));
        assert_eq!(state.score(), 100);
        assert_eq!(state.collected_count(), 1);
    }

    #[test]
    fn test_collect_unknown_id_is_noop() {
        let mut state = state_with_treasures(1);
        assert!(!state.collect_treasure("treasure-99"));
        assert_eq!(state.score(), 0);
        assert!(state.take_changes().is_empty());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_changes_track_field_groups() {
        let mut state = GameState::new();
        state.set_input(Vec2::new(1.0, 0.0));
        let changes = state.take_changes();
        assert!(changes.contains(Field::Input));
        assert!(!changes.contains(Field::Score));
        assert!(!changes.contains(Field::Pose));

        // Drained
        assert!(state.take_changes().is_empty());
    }

    #[test]
    fn test_events_and_win_condition() {
        let mut state = state_with_treasures(2);
        state.collect_treasure("treasure-0");
        state.collect_treasure("treasure-1");
        assert!(state.all_collected());
        assert_eq!(state.collected_count(), state.total_count());

        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::TreasureCollected {
                    id: "treasure-0".into(),
                    score: 100
                },
                GameEvent::TreasureCollected {
                    id: "treasure-1".into(),
                    score: 200
                },
                GameEvent::AllTreasuresFound { score: 200 },
            ]
        );
    }

    #[test]
    fn test_animated_position_bobs_vertically() {
        let mut treasure = Treasure::new(0, Vec3::new(1.0, 2.0, 3.0), 0.0);
        assert_eq!(treasure.animated_position(), Vec3::new(1.0, 2.0, 3.0));

        // Quarter period of sin(t * 2) puts the chest at the top of its bob
        treasure.anim_time = std::f32::consts::FRAC_PI_4;
        let pos = treasure.animated_position();
        assert_eq!(pos.x, 1.0);
        assert_eq!(pos.z, 3.0);
        assert!((pos.y - 2.2).abs() < 1e-5);
    }

    #[test]
    fn test_snapshot_json() {
        let mut state = state_with_treasures(1);
        state.collect_treasure("treasure-0");
        let json = state.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 100);
        assert_eq!(value["treasures"][0]["id"], "treasure-0");
        assert_eq!(value["treasures"][0]["collected"], true);
        assert!(value["diver"]["position"].is_array());
    }
}
