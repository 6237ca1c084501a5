//! Asteroid Drift headless runner
//!
//! Drives the simulation with a scripted pilot at 60 Hz until the player
//! dies and the death slow-motion runs out, or a tick cap is reached.
//!
//! Usage: `asteroid-drift [config.json] [max_ticks]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use asteroid_drift::DeathSlowdown;
    use asteroid_drift::SimConfig;
    use asteroid_drift::sim::{SimEvent, Simulation};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_MAX_TICKS: u64 = 60 * 120;

    env_logger::init();
    log::info!("Asteroid Drift (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load_or_default(path),
        None => SimConfig::default(),
    };
    let max_ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid config: {e}");
            std::process::exit(1);
        }
    };

    let mut slowdown = DeathSlowdown::default();
    let mut shots = 0usize;
    let mut destroyed = 0usize;

    while sim.time_ticks() < max_ticks && !slowdown.is_finished() {
        let intent = scripted_intent(sim.time_ticks());
        let result = sim.step(slowdown.scaled_dt(FRAME_DT), &intent);

        shots += result.fired.is_some() as usize;
        destroyed += result
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Despawned { .. }))
            .count();

        if sim.time_ticks() % 60 == 0 {
            log::info!(
                "t={:.0}s health={} asteroids={} projectiles={}",
                sim.elapsed(),
                result.state.player_health,
                sim.store().asteroids().len(),
                sim.store().projectiles().len()
            );
        }

        slowdown.update(FRAME_DT, result.state.is_dead);
    }

    let state = sim.game_state();
    println!(
        "Finished after {} ticks: health {}, {} shots fired, {} bodies removed, {} asteroids left",
        sim.time_ticks(),
        state.player_health,
        shots,
        destroyed,
        sim.store().asteroids().len()
    );
}

/// Circle slowly while thrusting in bursts and holding the trigger
#[cfg(not(target_arch = "wasm32"))]
fn scripted_intent(tick: u64) -> asteroid_drift::sim::InputIntent {
    let phase = tick % 240;
    asteroid_drift::sim::InputIntent {
        thrust_forward: phase < 40,
        thrust_backward: (120..140).contains(&phase),
        yaw_left: phase % 60 < 20,
        yaw_right: false,
        fire: true,
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
