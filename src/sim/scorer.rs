//! Hit/miss/hazard scoring rules
//!
//! Pure: applies one click to the session counters and grid. Win checks,
//! bonus time and phase changes belong to the engine.

use super::state::{CellKind, Grid, Session};
use crate::settings::Tuning;

/// Outcome of resolving one click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Not playing, or no such cell
    Ignored,
    Hit { points: u64 },
    /// Bonus hit; the engine should extend the timer by `extend_secs`
    Bonus { points: u64, extend_secs: u32 },
    /// Hazard touched; `penalty` is what was actually deducted
    Hazard { penalty: u64 },
    /// Clicked an EMPTY cell
    Miss,
}

impl Resolution {
    /// True if this resolution awarded points (and so needs a win check)
    pub fn awarded(&self) -> bool {
        matches!(self, Resolution::Hit { .. } | Resolution::Bonus { .. })
    }
}

/// Apply a click on `cell_id`
pub fn resolve(session: &mut Session, grid: &mut Grid, cell_id: usize, tuning: &Tuning) -> Resolution {
    let Some(cell) = grid.get(cell_id) else {
        return Resolution::Ignored;
    };

    match cell.kind {
        CellKind::Hit => {
            let points = tuning.hit_award(session.combo);
            session.score = session.score.saturating_add(points);
            session.combo = session.combo.saturating_add(1);
            grid.clear(cell_id);
            Resolution::Hit { points }
        }
        CellKind::Bonus => {
            let points = tuning.bonus_award(session.combo);
            session.score = session.score.saturating_add(points);
            session.combo = session.combo.saturating_add(1);
            grid.clear(cell_id);
            Resolution::Bonus {
                points,
                extend_secs: tuning.bonus_time_secs,
            }
        }
        CellKind::Hazard => {
            let penalty = tuning.hazard_penalty.min(session.score);
            session.score -= penalty;
            session.combo = 0;
            grid.clear(cell_id);
            Resolution::Hazard { penalty }
        }
        CellKind::Empty => {
            session.combo = 0;
            Resolution::Miss
        }
    }
}
