//! Game tuning
//!
//! Every pacing and scoring constant is data, not law. Read as JSON from
//! LocalStorage on the web, from a file natively.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating tuning
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Session length (also the cap for bonus time)
    pub session_secs: u32,
    /// Score that wins the session
    pub win_score: u64,

    // === Pacing ===
    /// Spawn interval at score 0 (ms)
    pub base_spawn_ms: u64,
    /// Minimum spawn interval (ms)
    pub floor_spawn_ms: u64,
    /// Points per millisecond of interval reduction
    pub spawn_score_divisor: u64,
    /// Activated cell lifetime (ms)
    pub cell_lifetime_ms: u64,

    // === Spawn weights ===
    pub hazard_threshold: f64,
    pub bonus_threshold: f64,

    // === Scoring ===
    pub hit_points: u64,
    pub hit_combo_step: u64,
    pub bonus_points: u64,
    pub bonus_combo_step: u64,
    pub bonus_time_secs: u32,
    pub hazard_penalty: u64,

    // === Feedback ===
    /// Shake duration after a hazard hit (ms)
    pub shake_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            session_secs: SESSION_SECS,
            win_score: WIN_SCORE,

            base_spawn_ms: BASE_SPAWN_MS,
            floor_spawn_ms: FLOOR_SPAWN_MS,
            spawn_score_divisor: SPAWN_SCORE_DIVISOR,
            cell_lifetime_ms: CELL_LIFETIME_MS,

            hazard_threshold: HAZARD_THRESHOLD,
            bonus_threshold: BONUS_THRESHOLD,

            hit_points: HIT_POINTS,
            hit_combo_step: HIT_COMBO_STEP,
            bonus_points: BONUS_POINTS,
            bonus_combo_step: BONUS_COMBO_STEP,
            bonus_time_secs: BONUS_TIME_SECS,
            hazard_penalty: HAZARD_PENALTY,

            shake_ms: SHAKE_MS,
        }
    }
}

impl Tuning {
    /// Spawn delay for the given score. Difficulty follows score, not elapsed time.
    pub fn spawn_interval_ms(&self, score: u64) -> u64 {
        let reduction = score / self.spawn_score_divisor.max(1);
        self.base_spawn_ms
            .saturating_sub(reduction)
            .max(self.floor_spawn_ms)
    }

    /// Points for a HIT at the given combo
    pub fn hit_award(&self, combo: u32) -> u64 {
        self.hit_points
            .saturating_add(u64::from(combo).saturating_mul(self.hit_combo_step))
    }

    /// Points for a BONUS at the given combo
    pub fn bonus_award(&self, combo: u32) -> u64 {
        self.bonus_points
            .saturating_add(u64::from(combo).saturating_mul(self.bonus_combo_step))
    }

    /// Reject tunings the engine cannot run
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if self.session_secs == 0 {
            return invalid("session_secs must be positive");
        }
        if self.win_score == 0 {
            return invalid("win_score must be positive");
        }
        if self.floor_spawn_ms == 0 {
            return invalid("floor_spawn_ms must be positive");
        }
        if self.base_spawn_ms < self.floor_spawn_ms {
            return invalid("base_spawn_ms must not be below floor_spawn_ms");
        }
        if self.spawn_score_divisor == 0 {
            return invalid("spawn_score_divisor must be positive");
        }
        if self.cell_lifetime_ms == 0 {
            return invalid("cell_lifetime_ms must be positive");
        }
        for (name, value) in [
            ("hazard_threshold", self.hazard_threshold),
            ("bonus_threshold", self.bonus_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Invalid(format!("{name} must be within [0, 1]")));
            }
        }
        Ok(())
    }

    /// Parse and validate tuning from JSON (missing keys take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neuro_link_tuning";

    /// Environment variable naming a tuning file (native only)
    pub const ENV_VAR: &'static str = "NEURO_LINK_TUNING";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {e}"),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning from the file named by `NEURO_LINK_TUNING`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Failed to load tuning from {path}: {e}; using defaults");
                Self::default()
            }
        }
    }
}
