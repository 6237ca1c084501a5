//! Per-frame simulation step
//!
//! Order within one tick:
//! 1. player intents and integration, then wrap
//! 2. weapon cooldown and firing
//! 3. projectile and asteroid integration, then wrap
//! 4. projectile hits, then one body-body sweep
//! 5. destruction sweep (fragments are inserted last)

use serde::{Deserialize, Serialize};

use super::body::BodyHandle;
use super::collision::{Impact, ProjectileHit, body_collisions, projectile_hits};
use super::destruction::{SweepReport, sweep};
use super::movement::{integrate_body, integrate_player};
use super::state::{GameState, Simulation};
use super::store::SimEvent;
use super::weapon::{age_projectiles, fire};

/// Device-independent player intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub thrust_forward: bool,
    pub thrust_backward: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub fire: bool,
}

impl InputIntent {
    /// Map held key names (`w`, `a`, `s`, `d`, space) to intents
    ///
    /// Unknown keys are ignored. Hosts clear the set on focus loss.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut intent = Self::default();
        for key in keys {
            match key.to_lowercase().as_str() {
                "w" => intent.thrust_forward = true,
                "s" => intent.thrust_backward = true,
                "a" => intent.yaw_left = true,
                "d" => intent.yaw_right = true,
                " " | "space" => intent.fire = true,
                _ => {}
            }
        }
        intent
    }

    /// +1 forward, -1 backward, 0 for neither or both
    pub fn thrust_axis(&self) -> f32 {
        (self.thrust_forward as i8 - self.thrust_backward as i8) as f32
    }

    /// +1 turns left (counter-clockwise seen from above)
    pub fn yaw_axis(&self) -> f32 {
        (self.yaw_left as i8 - self.yaw_right as i8) as f32
    }
}

/// Everything one tick produced
#[derive(Debug, Clone, Default)]
pub struct StepResult {
    pub state: GameState,
    /// Create/destroy notifications, in order
    pub events: Vec<SimEvent>,
    pub fired: Option<BodyHandle>,
    pub hits: Vec<ProjectileHit>,
    pub impacts: Vec<Impact>,
    pub sweep: SweepReport,
}

/// Advance the simulation by `dt` seconds
pub fn step(sim: &mut Simulation, dt: f32, intent: &InputIntent) -> StepResult {
    debug_assert!(dt >= 0.0 && dt.is_finite(), "dt must be finite and non-negative");

    let controls = sim.controls();
    let bounds = sim.bounds;

    let player = sim.store.player_mut();
    integrate_player(player, intent, controls, dt);
    bounds.wrap(player);

    let fired = fire(&mut sim.store, intent.fire, &sim.config, dt);

    let (_, asteroids, projectiles) = sim.store.split_mut();
    for body in projectiles.iter_mut().chain(asteroids.iter_mut()) {
        integrate_body(body, dt);
        bounds.wrap(body);
    }
    age_projectiles(&mut sim.store, sim.config.projectile_lifetime, dt);

    let hits = projectile_hits(&mut sim.store);
    let impacts = body_collisions(&mut sim.store, sim.config.restitution);

    let rules = sim.fragment_rules();
    let report = sweep(&mut sim.store, &rules, &mut sim.rng);

    if cfg!(debug_assertions) {
        if let Err(violation) = sim.check_invariants() {
            panic!("simulation invariant violated: {violation}");
        }
    }

    sim.time_ticks += 1;
    sim.elapsed += dt as f64;

    let state = sim.game_state();
    if state.is_dead && !sim.death_reported {
        sim.death_reported = true;
        log::info!(
            "Player destroyed at tick {} (health {})",
            sim.time_ticks,
            state.player_health
        );
    }
    log::trace!(
        "Tick {}: {} asteroids, {} projectiles, {} impacts",
        sim.time_ticks,
        sim.store.asteroids().len(),
        sim.store.projectiles().len(),
        impacts.len()
    );

    StepResult {
        state,
        events: sim.store.drain_events(),
        fired,
        hits,
        impacts,
        sweep: report,
    }
}

impl Simulation {
    /// Advance by `dt` seconds; see [`step`]
    pub fn step(&mut self, dt: f32, intent: &InputIntent) -> StepResult {
        step(self, dt, intent)
    }
}
