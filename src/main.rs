//! NEURO//LINK entry point
//!
//! Native: plays one demo session headless in virtual time and prints the
//! final snapshot as JSON. The web build is driven from `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
use neuro_link::sim::{Autopilot, DEFAULT_REACTION_MS, Engine, GameEvent, GamePhase};
#[cfg(not(target_arch = "wasm32"))]
use neuro_link::{Tuning, platform};

/// Simulated frame length (~60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: u64 = 16;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("NEURO//LINK (native) starting...");

    // Usage: neuro-link [seed] [reaction_ms]
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => platform::clock_seed(),
    };
    let reaction_ms = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => DEFAULT_REACTION_MS,
    };

    let mut engine = Engine::new(seed, Tuning::load());
    let mut pilot = Autopilot::new(reaction_ms);
    engine.start();

    while engine.phase() == GamePhase::Playing {
        engine.advance(FRAME_MS);
        pilot.step(&mut engine);

        for event in engine.drain_events() {
            match event {
                GameEvent::TimerTick { .. } => log::trace!("{event:?}"),
                GameEvent::PhaseChanged { .. } => log::info!("{event:?}"),
                _ => log::debug!("{event:?}"),
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
