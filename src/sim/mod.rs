//! Deterministic game engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (advanced explicitly by the caller)
//! - Seeded RNG only
//! - Stable iteration order (by cell ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod engine;
pub mod schedule;
pub mod scorer;
pub mod spawner;
pub mod state;
pub mod timer;

pub use autopilot::{Autopilot, DEFAULT_REACTION_MS};
pub use engine::Engine;
pub use schedule::{Scheduler, SessionHandle, Task};
pub use scorer::{Resolution, resolve};
pub use spawner::{Spawner, draw_kind};
pub use state::{Cell, CellKind, GameEvent, GamePhase, Grid, Session, Snapshot};
pub use timer::{Timer, TimerTick};
