//! NEURO//LINK - a reaction-time arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic game engine (grid, spawner, timer, scorer, phases)
//! - `settings`: Data-driven game tuning
//! - `chat`: Widget state around the hosted language-model chat
//! - `platform`: Browser/native platform abstraction

pub mod chat;
pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{SettingsError, Tuning};
pub use sim::{Engine, GamePhase, Snapshot};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// 3x3 grid
    pub const GRID_SIZE: usize = 9;

    /// Session length in seconds
    pub const SESSION_SECS: u32 = 30;
    /// Timer resolution
    pub const TIMER_TICK_MS: u64 = 1000;
    /// Score that ends the session in victory
    pub const WIN_SCORE: u64 = 2500;

    /// Spawn interval at score 0
    pub const BASE_SPAWN_MS: u64 = 1000;
    /// Spawn interval never drops below this
    pub const FLOOR_SPAWN_MS: u64 = 400;
    /// Every N points shave one millisecond off the spawn interval
    pub const SPAWN_SCORE_DIVISOR: u64 = 5;
    /// How long an activated cell stays up before expiring
    pub const CELL_LIFETIME_MS: u64 = 1500;

    /// r1 above this spawns a hazard (20%)
    pub const HAZARD_THRESHOLD: f64 = 0.8;
    /// r2 above this spawns a bonus (10% of non-hazards)
    pub const BONUS_THRESHOLD: f64 = 0.9;

    /// Scoring
    pub const HIT_POINTS: u64 = 100;
    pub const HIT_COMBO_STEP: u64 = 10;
    pub const BONUS_POINTS: u64 = 300;
    pub const BONUS_COMBO_STEP: u64 = 20;
    pub const BONUS_TIME_SECS: u32 = 2;
    pub const HAZARD_PENALTY: u64 = 200;

    /// Screen shake duration after a hazard hit
    pub const SHAKE_MS: u64 = 300;
}
