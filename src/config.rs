//! Simulation tuning
//!
//! Every gameplay constant the core reads comes from a [`SimConfig`], so a
//! host can ship balance changes as JSON without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Geometric metadata for one asteroid visual variant
///
/// Supplied by the asset collaborator; the core never sees meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetVariant {
    /// Bounding sphere radius of the source mesh
    pub bounding_radius: f32,
    /// Uniform scale the mesh is authored at
    pub base_scale: f32,
}

impl AssetVariant {
    pub const fn new(bounding_radius: f32, base_scale: f32) -> Self {
        Self {
            bounding_radius,
            base_scale,
        }
    }
}

/// Default asteroid meshes are authored in centimetres
pub const DEFAULT_VARIANTS: [AssetVariant; 2] = [
    AssetVariant::new(100.0, 0.01),
    AssetVariant::new(60.0, 0.01),
];

/// All simulation tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the spawn RNG
    pub seed: u64,

    // === World ===
    /// Half-height of the play rectangle
    pub camera_range: f32,
    /// Viewport width / height
    pub aspect: f32,

    // === Player ===
    pub player_health: i32,
    pub player_mass: f32,
    pub player_bounding_radius: f32,
    pub player_scale: f32,
    pub thrust_per_tick: f32,
    pub yaw_per_tick: f32,
    pub player_damping: f32,

    // === Weapon ===
    /// Seconds between shots
    pub fire_delay: f32,
    pub projectile_speed: f32,
    /// Distance ahead of the player where projectiles appear
    pub projectile_spawn_offset: f32,
    pub projectile_damage: i32,
    pub projectile_mass: f32,
    pub projectile_health: i32,
    pub projectile_bounding_radius: f32,
    pub projectile_scale: f32,
    /// Lifetime in seconds; `None` keeps projectiles until they hit
    pub projectile_lifetime: Option<f32>,

    // === Asteroids ===
    pub asteroid_count: usize,
    pub asteroid_health: i32,
    /// Damping rate assigned to asteroids at spawn
    pub asteroid_damping: f32,
    pub asteroid_max_speed: f32,
    pub asteroid_variants: Vec<AssetVariant>,
    /// Fragment velocity rotation (radians)
    pub fragment_spread: f32,

    // === Collisions ===
    /// Fraction of the elastic impulse kept
    pub restitution: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,

            camera_range: CAMERA_RANGE,
            aspect: 1.0,

            player_health: PLAYER_HEALTH,
            player_mass: PLAYER_MASS,
            player_bounding_radius: PLAYER_BOUNDING_RADIUS,
            player_scale: 1.0,
            thrust_per_tick: THRUST_PER_TICK,
            yaw_per_tick: YAW_PER_TICK,
            player_damping: PLAYER_DAMPING,

            fire_delay: FIRE_DELAY,
            projectile_speed: PROJECTILE_SPEED,
            projectile_spawn_offset: PROJECTILE_SPAWN_OFFSET,
            projectile_damage: PROJECTILE_DAMAGE,
            projectile_mass: PROJECTILE_MASS,
            projectile_health: PROJECTILE_HEALTH,
            projectile_bounding_radius: PROJECTILE_BOUNDING_RADIUS,
            projectile_scale: PROJECTILE_SCALE,
            projectile_lifetime: Some(PROJECTILE_LIFETIME),

            asteroid_count: ASTEROID_COUNT,
            asteroid_health: ASTEROID_HEALTH,
            asteroid_damping: 0.0,
            asteroid_max_speed: ASTEROID_MAX_SPEED,
            asteroid_variants: DEFAULT_VARIANTS.to_vec(),
            fragment_spread: FRAGMENT_SPREAD,

            restitution: RESTITUTION,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config ({e})");
                Self::default()
            }
        }
    }

    /// Smallest authored asteroid scale; fragments below √2 times this are not split
    ///
    /// Infinite when there are no variants, so nothing ever splits.
    pub fn minimum_atomic_scale(&self) -> f32 {
        self.asteroid_variants
            .iter()
            .map(|v| v.base_scale)
            .fold(f32::INFINITY, f32::min)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive and finite",
                })
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be non-negative and finite",
                })
            }
        }
        fn health(field: &'static str, value: i32) -> Result<(), ConfigError> {
            if value > 0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1",
                })
            }
        }

        positive("camera_range", self.camera_range)?;
        positive("aspect", self.aspect)?;

        health("player_health", self.player_health)?;
        positive("player_mass", self.player_mass)?;
        positive("player_bounding_radius", self.player_bounding_radius)?;
        positive("player_scale", self.player_scale)?;
        non_negative("player_damping", self.player_damping)?;

        non_negative("fire_delay", self.fire_delay)?;
        non_negative("projectile_speed", self.projectile_speed)?;
        if self.projectile_damage < 1 {
            return Err(ConfigError::Invalid {
                field: "projectile_damage",
                reason: "must be at least 1",
            });
        }
        health("projectile_health", self.projectile_health)?;
        positive("projectile_mass", self.projectile_mass)?;
        positive("projectile_bounding_radius", self.projectile_bounding_radius)?;
        positive("projectile_scale", self.projectile_scale)?;
        if let Some(lifetime) = self.projectile_lifetime {
            positive("projectile_lifetime", lifetime)?;
        }

        health("asteroid_health", self.asteroid_health)?;
        non_negative("asteroid_damping", self.asteroid_damping)?;
        non_negative("asteroid_max_speed", self.asteroid_max_speed)?;
        if self.asteroid_variants.is_empty() {
            return Err(ConfigError::Invalid {
                field: "asteroid_variants",
                reason: "at least one variant is required",
            });
        }
        for variant in &self.asteroid_variants {
            positive("asteroid_variants.bounding_radius", variant.bounding_radius)?;
            positive("asteroid_variants.base_scale", variant.base_scale)?;
        }

        non_negative("restitution", self.restitution)?;
        Ok(())
    }
}
