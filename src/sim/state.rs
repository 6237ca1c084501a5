//! Simulation state and snapshots
//!
//! [`Simulation`] owns everything a tick touches: the entity store, the play
//! bounds, the tuning and the seeded RNG. Hosts only ever see
//! [`GameState`] snapshots, lifecycle events and [`InstanceTransform`]s.

use bytemuck::{Pod, Zeroable};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::{Body, BodyHandle, BodyKind, KindTag, Weapon};
use super::bounds::WorldBounds;
use super::destruction::FragmentRules;
use super::movement::Controls;
use super::spawn::spawn_asteroid_field;
use super::store::EntityStore;
use crate::config::{ConfigError, SimConfig};

/// Per-tick result for the presentation layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub player_health: i32,
    /// `player_health <= 0`; the player stays in the store regardless
    pub is_dead: bool,
}

/// Broken simulation invariants; always a programming error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("body {0:?} has non-positive mass")]
    NonPositiveMass(BodyHandle),
    #[error("dead body {0:?} survived the sweep")]
    DeadBodyPresent(BodyHandle),
    #[error("body {0:?} is stored in the wrong collection")]
    HandleInWrongCollection(BodyHandle),
    #[error("handle {0:?} is duplicated or out of order")]
    UnorderedHandle(BodyHandle),
    #[error("lifecycle notifications unpaired: {spawned} spawned, {despawned} despawned, {live} live")]
    UnpairedLifecycle { spawned: u64, despawned: u64, live: usize },
}

/// Pose of one body, laid out for an instance buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub handle: u32,
    /// `KindTag` as u32
    pub kind: u32,
    pub position: [f32; 3],
    /// Euler rotation (x, y, z)
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl InstanceTransform {
    pub fn from_body(body: &Body) -> Self {
        Self {
            handle: body.handle.0,
            kind: body.tag() as u32,
            position: body.position.to_array(),
            rotation: body.rotation.to_array(),
            scale: body.scale.to_array(),
        }
    }
}

/// The whole simulated world
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) bounds: WorldBounds,
    pub(crate) store: EntityStore,
    pub(crate) rng: Pcg32,
    /// Ticks stepped so far
    pub(crate) time_ticks: u64,
    /// Simulated seconds so far
    pub(crate) elapsed: f64,
    pub(crate) death_reported: bool,
}

impl Simulation {
    /// Validate `config`, create the player and spawn the asteroid field
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = WorldBounds::new(config.camera_range, config.aspect);
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let mut store = EntityStore::new(build_player(&config));
        spawn_asteroid_field(&mut store, &config, &bounds, &mut rng);

        log::info!(
            "Simulation started (seed {}, {} asteroids, bounds {:.1}x{:.1})",
            config.seed,
            store.asteroids().len(),
            bounds.width(),
            bounds.height()
        );

        Ok(Self {
            config,
            bounds,
            store,
            rng,
            time_ticks: 0,
            elapsed: 0.0,
            death_reported: false,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Viewport aspect changed; the play area widens or narrows with it
    pub fn set_aspect(&mut self, aspect: f32) {
        self.bounds.set_aspect(aspect);
        self.config.aspect = aspect;
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn player(&self) -> &Body {
        self.store.player()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Add an asteroid built by the host (e.g. a scripted scenario)
    pub fn insert_asteroid(&mut self, body: Body) -> BodyHandle {
        assert!(
            matches!(body.kind, BodyKind::Asteroid),
            "insert_asteroid expects an asteroid body"
        );
        self.store.insert(body)
    }

    /// Current snapshot
    pub fn game_state(&self) -> GameState {
        let health = self.store.player().health;
        GameState {
            player_health: health,
            is_dead: health <= 0,
        }
    }

    pub(crate) fn controls(&self) -> Controls {
        Controls {
            thrust_per_tick: self.config.thrust_per_tick,
            yaw_per_tick: self.config.yaw_per_tick,
        }
    }

    pub(crate) fn fragment_rules(&self) -> FragmentRules {
        FragmentRules {
            minimum_atomic_scale: self.config.minimum_atomic_scale(),
            spread: self.config.fragment_spread,
            health: self.config.asteroid_health,
        }
    }

    /// Poses of every live body, player first
    pub fn transforms(&self) -> Vec<InstanceTransform> {
        self.store.bodies().map(InstanceTransform::from_body).collect()
    }

    /// Verify the store after a sweep
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for body in self.store.bodies() {
            if body.mass <= 0.0 {
                return Err(InvariantViolation::NonPositiveMass(body.handle));
            }
        }

        let collections = [
            (self.store.asteroids(), KindTag::Asteroid),
            (self.store.projectiles(), KindTag::Projectile),
        ];
        for (bodies, tag) in collections {
            for body in bodies {
                if body.tag() != tag {
                    return Err(InvariantViolation::HandleInWrongCollection(body.handle));
                }
                if !body.is_alive() {
                    return Err(InvariantViolation::DeadBodyPresent(body.handle));
                }
            }
            for pair in bodies.windows(2) {
                if pair[0].handle >= pair[1].handle {
                    return Err(InvariantViolation::UnorderedHandle(pair[1].handle));
                }
            }
        }

        let (spawned, despawned) = self.store.lifecycle_totals();
        let live = self.store.len();
        if spawned.checked_sub(despawned) != Some(live as u64) {
            return Err(InvariantViolation::UnpairedLifecycle {
                spawned,
                despawned,
                live,
            });
        }
        Ok(())
    }
}

/// The player at the origin, facing -z, weapon ready
pub fn build_player(config: &SimConfig) -> Body {
    let mut player = Body::new(
        BodyHandle(0),
        BodyKind::Player {
            weapon: Weapon::ready(config.fire_delay),
        },
    );
    player.mass = config.player_mass;
    player.health = config.player_health;
    player.bounding_radius = config.player_bounding_radius;
    player.scale = glam::Vec3::splat(config.player_scale);
    player.linear_damping = config.player_damping;
    player.angular_damping = config.player_damping;
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn empty_config() -> SimConfig {
        SimConfig {
            asteroid_count: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_spawns_field() {
        let sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.store().asteroids().len(), 25);
        assert_eq!(sim.player().health, 100);
        assert_eq!(sim.store().pending_events().len(), 26);
        assert!(sim.check_invariants().is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimConfig {
            camera_range: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::Invalid { field: "camera_range", .. })
        ));
    }

    #[test]
    fn test_game_state_snapshot() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        assert_eq!(
            sim.game_state(),
            GameState {
                player_health: 100,
                is_dead: false
            }
        );
        sim.store_mut().player_mut().health = 0;
        assert!(sim.game_state().is_dead);
    }

    #[test]
    fn test_transforms_layout() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        sim.store_mut().player_mut().position = Vec3::new(1.0, 0.0, 2.0);
        let transforms = sim.transforms();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].kind, KindTag::Player as u32);
        assert_eq!(transforms[0].position, [1.0, 0.0, 2.0]);

        let bytes: &[u8] = bytemuck::cast_slice(&transforms);
        assert_eq!(bytes.len(), std::mem::size_of::<InstanceTransform>());
        assert_eq!(std::mem::size_of::<InstanceTransform>(), 44);
    }

    #[test]
    fn test_dead_asteroid_is_a_violation() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let handle = sim.store().asteroids()[3].handle;
        sim.store_mut().get_mut(handle).unwrap().health = 0;
        assert_eq!(
            sim.check_invariants(),
            Err(InvariantViolation::DeadBodyPresent(handle))
        );
    }

    #[test]
    fn test_non_positive_mass_is_a_violation() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        sim.store_mut().player_mut().mass = 0.0;
        let handle = sim.player().handle;
        assert_eq!(
            sim.check_invariants(),
            Err(InvariantViolation::NonPositiveMass(handle))
        );
    }

    #[test]
    fn test_set_aspect_updates_bounds() {
        let mut sim = Simulation::new(empty_config()).unwrap();
        sim.set_aspect(16.0 / 9.0);
        assert!((sim.bounds().half_width() - 12.0 * 16.0 / 9.0).abs() < 1e-4);
        assert_eq!(sim.bounds().half_height(), 12.0);
    }
}
