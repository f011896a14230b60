//! Browser binding
//!
//! The page calls `frame(timestamp_ms)` from requestAnimationFrame,
//! forwards clicks to `resolve`, and re-renders from `snapshot_json`.

use wasm_bindgen::prelude::*;

use super::FrameClock;
use crate::settings::Tuning;
use crate::sim::{Engine, GamePhase};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("NEURO//LINK (web) starting...");
}

#[wasm_bindgen]
pub struct WebGrid {
    engine: Engine,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WebGrid {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: Engine::new(super::clock_seed(), Tuning::load()),
            clock: FrameClock::new(),
        }
    }

    /// Start (or restart) a session. False while already playing.
    pub fn start(&mut self) -> bool {
        self.engine.start()
    }

    /// Forward a click. True if the engine consumed it.
    pub fn resolve(&mut self, cell: usize) -> bool {
        !matches!(self.engine.resolve(cell), crate::sim::Resolution::Ignored)
    }

    /// Advance virtual time by the wall-clock delta since the last frame
    pub fn frame(&mut self, now_ms: f64) {
        let elapsed = self.clock.step(now_ms);
        self.engine.advance(elapsed);
    }

    pub fn playing(&self) -> bool {
        self.engine.phase() == GamePhase::Playing
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.engine.snapshot()).unwrap_or_else(|e| {
            log::error!("snapshot serialization failed: {e}");
            String::new()
        })
    }

    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.engine.drain_events()).unwrap_or_else(|e| {
            log::error!("event serialization failed: {e}");
            String::new()
        })
    }
}

impl Default for WebGrid {
    fn default() -> Self {
        Self::new()
    }
}
