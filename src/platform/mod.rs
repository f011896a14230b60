//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Frame timestamps to engine milliseconds
//! - The wasm-bindgen presentation binding

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed derived from the clock, for sessions that don't need replay
pub fn clock_seed() -> u64 {
    now_ms() as u64
}

/// Longest gap a single frame may advance (tab was hidden, debugger paused)
pub const MAX_FRAME_MS: f64 = 250.0;

/// Turns fractional frame timestamps (requestAnimationFrame) into whole
/// engine milliseconds. The sub-millisecond remainder carries over to the
/// next frame so the engine clock keeps pace with the wall clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_frame_ms: Option<f64>,
    accumulator: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole milliseconds to advance for a frame stamped `now_ms`
    pub fn step(&mut self, now_ms: f64) -> u64 {
        let delta = match self.last_frame_ms {
            Some(last) if now_ms.is_finite() => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_frame_ms = Some(now_ms);
        }

        self.accumulator += delta;
        let whole = self.accumulator.floor();
        self.accumulator -= whole;
        whole as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frames(clock: &mut FrameClock, frames: u32, frame_ms: f64) -> u64 {
        (0..=frames).map(|i| clock.step(f64::from(i) * frame_ms)).sum()
    }

    #[test]
    fn test_frame_clock_keeps_fractional_time() {
        let mut clock = FrameClock::new();
        let advanced = run_frames(&mut clock, 60, 16.666);
        assert!((999..=1000).contains(&advanced), "advanced = {advanced}");
    }

    #[test]
    fn test_frame_clock_tracks_a_full_session() {
        let mut clock = FrameClock::new();
        let advanced = run_frames(&mut clock, 1800, 1000.0 / 60.0);
        assert!((29_999..=30_000).contains(&advanced), "advanced = {advanced}");
    }

    #[test]
    fn test_frame_clock_clamps_and_ignores_bad_stamps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.step(1000.0), 0);
        assert_eq!(clock.step(60_000.0), 250);
        assert_eq!(clock.step(50_000.0), 0);
        assert_eq!(clock.step(f64::NAN), 0);
        assert_eq!(clock.step(50_010.0), 10);
    }

    #[test]
    fn test_clock_is_past_2020() {
        assert!(now_ms() > 1_577_836_800_000.0);
    }
}
