//! Demo player
//!
//! Clicks targets after a fixed reaction delay and never touches hazards.
//! Drives the headless native runner and attract mode on the web.

use super::engine::Engine;
use super::scorer::Resolution;
use super::state::GamePhase;
use crate::consts::GRID_SIZE;

/// Reaction delay used by the demo runner
pub const DEFAULT_REACTION_MS: u64 = 450;

#[derive(Debug, Clone)]
pub struct Autopilot {
    reaction_ms: u64,
    /// Per cell: (activation generation, virtual time it was first seen)
    seen: [Option<(u64, u64)>; GRID_SIZE],
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEFAULT_REACTION_MS)
    }
}

impl Autopilot {
    pub fn new(reaction_ms: u64) -> Self {
        Self {
            reaction_ms,
            seen: [None; GRID_SIZE],
        }
    }

    /// Look at the grid and click whatever has been up long enough
    pub fn step(&mut self, engine: &mut Engine) -> Vec<Resolution> {
        let mut clicks = Vec::new();
        if engine.phase() != GamePhase::Playing {
            self.seen = [None; GRID_SIZE];
            return clicks;
        }

        let now = engine.now_ms();
        let cells = *engine.grid().cells();
        for cell in cells {
            if !cell.kind.is_target() {
                self.seen[cell.id] = None;
                continue;
            }

            let first_seen = match self.seen[cell.id] {
                Some((generation, at)) if generation == cell.generation => at,
                _ => {
                    self.seen[cell.id] = Some((cell.generation, now));
                    now
                }
            };

            if now.saturating_sub(first_seen) >= self.reaction_ms {
                self.seen[cell.id] = None;
                clicks.push(engine.resolve(cell.id));
                if engine.phase() != GamePhase::Playing {
                    break;
                }
            }
        }
        clicks
    }
}
