//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body handle)
//! - No rendering, audio or platform dependencies
//!
//! The world is a torus: bodies leaving one edge of the visible rectangle
//! re-enter from the opposite edge.

pub mod body;
pub mod bounds;
pub mod collision;
pub mod destruction;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;
pub mod weapon;

pub use body::{Body, BodyHandle, BodyKind, KindTag, Weapon};
pub use bounds::{GHOST_OFFSETS, WorldBounds};
pub use collision::{Impact, ProjectileHit, body_collisions, projectile_hits, resolve_pair};
pub use destruction::{FragmentRules, SweepReport, fragments, sweep};
pub use movement::{Controls, integrate_body, integrate_player};
pub use spawn::{asteroid_from_variant, random_asteroid, spawn_asteroid_field};
pub use state::{GameState, InstanceTransform, InvariantViolation, Simulation, build_player};
pub use store::{EntityStore, SimEvent};
pub use tick::{InputIntent, StepResult, step};
pub use weapon::{age_projectiles, build_projectile, fire};
