//! Treasure field
//!
//! Spawns the chest batch from a seeded RNG and runs the per-frame
//! proximity pickup against the diver.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use super::state::{GameState, Treasure};
use crate::consts::*;

/// Create `count` treasures at uniform random positions in the spawn square
pub fn spawn_treasures<R: Rng>(count: usize, rng: &mut R) -> Vec<Treasure> {
    (0..count)
        .map(|i| {
            let position = Vec3::new(
                rng.random_range(-TREASURE_SPAWN_HALF_EXTENT..=TREASURE_SPAWN_HALF_EXTENT),
                rng.random_range(TREASURE_MIN_HEIGHT..=TREASURE_MAX_HEIGHT),
                rng.random_range(-TREASURE_SPAWN_HALF_EXTENT..=TREASURE_SPAWN_HALF_EXTENT),
            );
            let phase = rng.random_range(0.0..TAU);
            Treasure::new(i, position, phase)
        })
        .collect()
}

/// Replace the store's treasures with a fresh batch
pub fn spawn<R: Rng>(state: &mut GameState, count: usize, rng: &mut R) {
    let treasures = spawn_treasures(count, rng);
    log::info!("Spawned {} treasures", treasures.len());
    state.set_treasures(treasures);
}

/// Advance chest animation and collect every chest within pickup range.
///
/// Returns the number of treasures collected this frame.
pub fn update(state: &mut GameState, dt: f32) -> usize {
    let diver = state.diver().position;
    let mut in_range = Vec::new();

    for treasure in state.treasures_mut() {
        if treasure.collected {
            continue;
        }
        treasure.anim_time += dt;
        treasure.spin += dt * TREASURE_SPIN_RATE;
        if treasure.animated_position().distance(diver) < PICKUP_RADIUS {
            in_range.push(treasure.id.clone());
        }
    }

    let mut collected = 0;
    for id in &in_range {
        if state.collect_treasure(id) {
            log::info!("Collected {} (score {})", id, state.score());
            collected += 1;
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use crate::sim::state::DiverPose;

    fn place_diver(state: &mut GameState, position: Vec3) {
        state.set_diver_pose(DiverPose {
            position,
            rotation: 0.0,
        });
    }

    /// Treasure with zero bob phase so its animated position starts at spawn
    fn still_treasure(index: usize, position: Vec3) -> Treasure {
        Treasure::new(index, position, 0.0)
    }

    #[test]
    fn test_spawn_ten() {
        let mut rng = Pcg32::seed_from_u64(42);
        let treasures = spawn_treasures(10, &mut rng);
        assert_eq!(treasures.len(), 10);

        let mut ids: Vec<_> = treasures.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);

        for t in &treasures {
            assert!((-20.0..=20.0).contains(&t.position.x));
            assert!((-20.0..=20.0).contains(&t.position.z));
            assert!((1.0..=3.0).contains(&t.position.y));
            assert!((0.0..TAU).contains(&t.anim_time));
            assert!(!t.collected);
        }
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let a = spawn_treasures(10, &mut Pcg32::seed_from_u64(7));
        let b = spawn_treasures(10, &mut Pcg32::seed_from_u64(7));
        for (ta, tb) in a.iter().zip(&b) {
            assert_eq!(ta.id, tb.id);
            assert_eq!(ta.position, tb.position);
            assert_eq!(ta.anim_time, tb.anim_time);
        }
    }

    #[test]
    fn test_spawn_replaces_batch() {
        let mut state = GameState::new();
        let mut rng = Pcg32::seed_from_u64(1);
        spawn(&mut state, 10, &mut rng);
        spawn(&mut state, 3, &mut rng);
        assert_eq!(state.total_count(), 3);
    }

    #[test]
    fn test_pickup_at_zero_distance() {
        let mut state = GameState::new();
        state.set_treasures(vec![still_treasure(0, Vec3::new(0.0, 3.0, 0.0))]);
        place_diver(&mut state, Vec3::new(0.0, 3.0, 0.0));

        assert_eq!(update(&mut state, 0.0), 1);
        assert!(state.treasures()[0].collected);
        assert_eq!(state.score(), 100);
    }

    #[test]
    fn test_no_pickup_outside_radius() {
        let mut state = GameState::new();
        state.set_treasures(vec![still_treasure(0, Vec3::new(3.0, 3.0, 0.0))]);
        place_diver(&mut state, Vec3::new(0.0, 3.0, 0.0));

        assert_eq!(update(&mut state, 0.0), 0);
        assert!(!state.treasures()[0].collected);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_collected_treasure_not_reawarded() {
        let mut state = GameState::new();
        state.set_treasures(vec![still_treasure(0, Vec3::new(0.0, 3.0, 0.0))]);
        place_diver(&mut state, Vec3::new(0.0, 3.0, 0.0));

        update(&mut state, 1.0 / 60.0);
        for _ in 0..10 {
            assert_eq!(update(&mut state, 1.0 / 60.0), 0);
        }
        assert_eq!(state.score(), 100);
    }

    #[test]
    fn test_pickup_uses_animated_position() {
        // Spawn 2.1 above the diver: out of reach statically, but the bob
        // brings it down by up to 0.2
        let mut state = GameState::new();
        let mut treasure = still_treasure(0, Vec3::new(0.0, 5.1, 0.0));
        // sin(anim * 2) = -1 after this frame
        treasure.anim_time = 3.0 * std::f32::consts::FRAC_PI_4;
        state.set_treasures(vec![treasure]);
        place_diver(&mut state, Vec3::new(0.0, 3.0, 0.0));

        assert_eq!(update(&mut state, 0.0), 1);
    }

    #[test]
    fn test_collect_all_reaches_win() {
        let mut state = GameState::new();
        let mut rng = Pcg32::seed_from_u64(3);
        spawn(&mut state, 10, &mut rng);
        let spots: Vec<_> = state.treasures().iter().map(|t| t.animated_position()).collect();
        for spot in spots {
            place_diver(&mut state, spot);
            update(&mut state, 0.0);
        }
        assert_eq!(state.collected_count(), 10);
        assert!(state.all_collected());
        assert_eq!(state.score(), 1000);
    }
}
