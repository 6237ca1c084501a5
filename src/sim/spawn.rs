//! Asteroid field generation
//!
//! Asteroids are built from asset metadata only: a bounding radius and a
//! base scale per visual variant.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use super::body::{Body, BodyHandle, BodyKind};
use super::bounds::WorldBounds;
use super::store::EntityStore;
use crate::config::{AssetVariant, SimConfig};

/// Build an asteroid from a variant and a size factor
///
/// Scale is the variant's base scale times `factor`; mass is the volume of a
/// sphere of radius `factor`.
pub fn asteroid_from_variant(variant: &AssetVariant, factor: f32, config: &SimConfig) -> Body {
    let mut body = Body::new(BodyHandle(0), BodyKind::Asteroid);
    body.scale = Vec3::splat(variant.base_scale * factor);
    body.bounding_radius = variant.bounding_radius;
    body.mass = (4.0 / 3.0) * PI * factor.powi(3);
    body.health = config.asteroid_health;
    body.linear_damping = config.asteroid_damping;
    body.angular_damping = config.asteroid_damping;
    body
}

/// Random asteroid somewhere inside the bounds
///
/// # Panics
///
/// If `config.asteroid_variants` is empty. [`SimConfig::validate`] rejects
/// such configs.
pub fn random_asteroid<R: Rng>(config: &SimConfig, bounds: &WorldBounds, rng: &mut R) -> Body {
    let variant = &config.asteroid_variants[rng.random_range(0..config.asteroid_variants.len())];
    let factor = 0.5 + rng.random::<f32>();
    let mut body = asteroid_from_variant(variant, factor, config);

    body.position = Vec3::new(
        rng.random_range(-1.0f32..=1.0) * bounds.half_width(),
        0.0,
        rng.random_range(-1.0f32..=1.0) * bounds.half_height(),
    );
    body.rotation = Vec3::new(
        rng.random::<f32>() * TAU,
        rng.random::<f32>() * TAU,
        rng.random::<f32>() * TAU,
    );
    // Tumble about x and z only; y spin would read as steering
    body.rotation_rate = Vec3::new(rng.random::<f32>() - 1.0, 0.0, rng.random::<f32>() - 1.0);

    let heading = rng.random::<f32>() * TAU;
    let speed = rng.random::<f32>() * config.asteroid_max_speed;
    body.velocity = Vec3::new(heading.cos(), 0.0, heading.sin()) * speed;
    body
}

/// Spawn the configured number of asteroids across the bounds
///
/// Spawns nothing when the config has no asteroid variants.
pub fn spawn_asteroid_field<R: Rng>(
    store: &mut EntityStore,
    config: &SimConfig,
    bounds: &WorldBounds,
    rng: &mut R,
) -> Vec<BodyHandle> {
    if config.asteroid_variants.is_empty() {
        log::warn!("No asteroid variants configured, field left empty");
        return Vec::new();
    }
    let handles: Vec<BodyHandle> = (0..config.asteroid_count)
        .map(|_| {
            let rock = random_asteroid(config, bounds, rng);
            store.insert(rock)
        })
        .collect();
    log::info!("Spawned {} asteroids", handles.len());
    handles
}
