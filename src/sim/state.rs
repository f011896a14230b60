//! Grid state and core session types

use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// What a cell currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    /// Regular target
    Hit,
    /// Golden target: more points and bonus time
    Bonus,
    /// Must not be touched
    Hazard,
}

impl CellKind {
    /// True for kinds the player should hit (expiring them breaks the combo)
    pub fn is_target(self) -> bool {
        matches!(self, CellKind::Hit | CellKind::Bonus)
    }
}

/// One grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: usize,
    pub kind: CellKind,
    /// Bumped on every activation and every revert, so a scheduled expiry
    /// can tell whether the activation it was armed for is still current
    #[serde(skip)]
    pub generation: u64,
}

/// The fixed 3x3 grid. Identity is positional and never reassigned.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: [Cell; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|id| Cell {
                id,
                kind: CellKind::Empty,
                generation: 0,
            }),
        }
    }

    pub fn cells(&self) -> &[Cell; GRID_SIZE] {
        &self.cells
    }

    pub fn get(&self, id: usize) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Ids of all currently EMPTY cells, in positional order
    pub fn empty_ids(&self) -> Vec<usize> {
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::Empty)
            .map(|c| c.id)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.kind != CellKind::Empty).count()
    }

    /// Turn an EMPTY cell into `kind`. Returns the activation's generation,
    /// or `None` if the cell is out of range or already active.
    pub fn activate(&mut self, id: usize, kind: CellKind) -> Option<u64> {
        let cell = self.cells.get_mut(id)?;
        if cell.kind != CellKind::Empty || kind == CellKind::Empty {
            return None;
        }
        cell.kind = kind;
        cell.generation += 1;
        Some(cell.generation)
    }

    /// Revert a cell to EMPTY, returning what it was
    pub fn clear(&mut self, id: usize) -> Option<CellKind> {
        let cell = self.cells.get_mut(id)?;
        let previous = cell.kind;
        if previous != CellKind::Empty {
            cell.kind = CellKind::Empty;
            cell.generation += 1;
        }
        Some(previous)
    }

    /// Revert a cell only if it still holds the activation `generation`
    pub fn expire(&mut self, id: usize, generation: u64) -> Option<CellKind> {
        let cell = self.cells.get(id)?;
        if cell.generation != generation || cell.kind == CellKind::Empty {
            return None;
        }
        self.clear(id)
    }

    /// Reset every cell to EMPTY. Generations keep counting so nothing armed
    /// against the old grid can match.
    pub fn reset(&mut self) {
        for id in 0..GRID_SIZE {
            self.clear(id);
        }
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start command
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Timer ran out
    EndedLoss,
    /// Win score reached
    EndedWin,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::EndedLoss | GamePhase::EndedWin)
    }
}

/// Per-session counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    pub score: u64,
    pub time_remaining_secs: u32,
    pub combo: u32,
    pub spawn_interval_ms: u64,
    /// Virtual time until which the hazard shake is shown
    #[serde(skip)]
    pub shake_until_ms: u64,
}

impl Session {
    pub fn new(time_remaining_secs: u32, spawn_interval_ms: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            time_remaining_secs,
            combo: 0,
            spawn_interval_ms,
            shake_until_ms: 0,
        }
    }
}

/// Discrete things that happened, drained by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { session: u64 },
    CellSpawned { cell: usize, kind: CellKind },
    CellExpired { cell: usize, kind: CellKind, combo_broken: bool },
    Hit { cell: usize, points: u64, combo: u32 },
    BonusHit { cell: usize, points: u64, combo: u32 },
    /// Hazard touched: the shake signal
    HazardHit { cell: usize, penalty: u64 },
    Miss { cell: usize },
    TimeExtended { secs: u32, remaining: u32 },
    TimerTick { remaining: u32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub combo: u32,
    pub time_remaining_secs: u32,
    pub spawn_interval_ms: u64,
    pub shaking: bool,
    pub cells: [Cell; GRID_SIZE],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_starts_empty_with_positional_ids() {
        let grid = Grid::new();
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(cell.id, i);
            assert_eq!(cell.kind, CellKind::Empty);
        }
        assert_eq!(grid.empty_ids().len(), GRID_SIZE);
    }

    #[test]
    fn test_activate_only_from_empty() {
        let mut grid = Grid::new();
        assert!(grid.activate(4, CellKind::Hit).is_some());
        assert_eq!(grid.activate(4, CellKind::Hazard), None);
        assert_eq!(grid.get(4).unwrap().kind, CellKind::Hit);
        assert_eq!(grid.activate(9, CellKind::Hit), None);
        assert_eq!(grid.activate(0, CellKind::Empty), None);
        assert_eq!(grid.active_count(), 1);
    }

    #[test]
    fn test_stale_expiry_is_inert() {
        let mut grid = Grid::new();
        let first = grid.activate(2, CellKind::Hit).unwrap();
        assert_eq!(grid.clear(2), Some(CellKind::Hit));

        // Re-activated before the first expiry fires
        let second = grid.activate(2, CellKind::Bonus).unwrap();
        assert_eq!(grid.expire(2, first), None);
        assert_eq!(grid.get(2).unwrap().kind, CellKind::Bonus);

        assert_eq!(grid.expire(2, second), Some(CellKind::Bonus));
        assert_eq!(grid.get(2).unwrap().kind, CellKind::Empty);
    }

    #[test]
    fn test_reset_invalidates_generations() {
        let mut grid = Grid::new();
        let generation = grid.activate(0, CellKind::Hazard).unwrap();
        grid.reset();
        assert_eq!(grid.active_count(), 0);
        grid.activate(0, CellKind::Hit);
        assert_eq!(grid.expire(0, generation), None);
    }
}
