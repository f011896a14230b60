//! Cell spawner
//!
//! Picks a random EMPTY cell and a weighted kind. Seeded, so a session
//! replays exactly from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{CellKind, Grid};
use crate::settings::Tuning;

/// Weighted kind draw from uniform [0, 1) samples.
///
/// `r1 > hazard_threshold` is a hazard; otherwise a second sample `r2` is
/// drawn and `r2 > bonus_threshold` is a bonus; everything else is a plain hit.
pub fn draw_kind(r1: f64, r2: impl FnOnce() -> f64, tuning: &Tuning) -> CellKind {
    if r1 > tuning.hazard_threshold {
        CellKind::Hazard
    } else if r2() > tuning.bonus_threshold {
        CellKind::Bonus
    } else {
        CellKind::Hit
    }
}

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reseed for a fresh session
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Activate one EMPTY cell chosen uniformly. Returns the cell id, kind and
    /// activation generation, or `None` when the grid is full.
    pub fn spawn(&mut self, grid: &mut Grid, tuning: &Tuning) -> Option<(usize, CellKind, u64)> {
        let empty = grid.empty_ids();
        if empty.is_empty() {
            return None;
        }

        let id = empty[self.rng.random_range(0..empty.len())];
        let r1: f64 = self.rng.random();
        let kind = draw_kind(r1, || self.rng.random(), tuning);

        let generation = grid.activate(id, kind)?;
        Some((id, kind, generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRID_SIZE;

    #[test]
    fn test_draw_kind_thresholds() {
        let tuning = Tuning::default();
        assert_eq!(draw_kind(0.81, || 0.0, &tuning), CellKind::Hazard);
        assert_eq!(draw_kind(0.8, || 0.95, &tuning), CellKind::Bonus);
        assert_eq!(draw_kind(0.5, || 0.9, &tuning), CellKind::Hit);
        assert_eq!(draw_kind(0.0, || 0.0, &tuning), CellKind::Hit);
    }

    #[test]
    fn test_hazard_skips_second_draw() {
        let tuning = Tuning::default();
        let mut second_draws = 0;
        let kind = draw_kind(0.9, || {
            second_draws += 1;
            0.99
        }, &tuning);
        assert_eq!(kind, CellKind::Hazard);
        assert_eq!(second_draws, 0);

        draw_kind(0.1, || {
            second_draws += 1;
            0.0
        }, &tuning);
        assert_eq!(second_draws, 1);
    }

    #[test]
    fn test_spawn_fills_grid_then_stops() {
        let tuning = Tuning::default();
        let mut grid = Grid::new();
        let mut spawner = Spawner::new(7);

        for i in 0..GRID_SIZE {
            let (id, kind, _) = spawner.spawn(&mut grid, &tuning).unwrap();
            assert_ne!(kind, CellKind::Empty);
            assert_eq!(grid.get(id).unwrap().kind, kind);
            assert_eq!(grid.active_count(), i + 1);
        }
        assert!(spawner.spawn(&mut grid, &tuning).is_none());
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let tuning = Tuning::default();
        let mut a = Spawner::new(99999);
        let mut b = Spawner::new(99999);
        let mut grid_a = Grid::new();
        let mut grid_b = Grid::new();

        for _ in 0..GRID_SIZE {
            assert_eq!(
                a.spawn(&mut grid_a, &tuning),
                b.spawn(&mut grid_b, &tuning)
            );
        }
    }

    #[test]
    fn test_kind_distribution_roughly_matches_weights() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(12345);
        let (mut hits, mut bonuses, mut hazards) = (0u32, 0u32, 0u32);

        for _ in 0..10_000 {
            let mut grid = Grid::new();
            match spawner.spawn(&mut grid, &tuning).unwrap().1 {
                CellKind::Hit => hits += 1,
                CellKind::Bonus => bonuses += 1,
                CellKind::Hazard => hazards += 1,
                CellKind::Empty => unreachable!(),
            }
        }

        // Expected: 72% / 8% / 20%
        assert!((6_800..7_600).contains(&hits), "hits = {hits}");
        assert!((600..1_000).contains(&bonuses), "bonuses = {bonuses}");
        assert!((1_700..2_300).contains(&hazards), "hazards = {hazards}");
    }
}
