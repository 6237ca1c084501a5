//! Asteroid Drift - simulation core for a toroidal-space asteroid shooter
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (movement, wrap, collisions, destruction)
//! - `config`: Data-driven tuning, loaded from JSON
//! - `presentation`: Host-side helpers that react to simulation snapshots

pub mod config;
pub mod presentation;
pub mod sim;

pub use config::{AssetVariant, ConfigError, SimConfig};
pub use presentation::DeathSlowdown;

use glam::{Quat, Vec3};

/// Default tuning constants
pub mod consts {
    /// Half-height of the visible play rectangle (world units)
    pub const CAMERA_RANGE: f32 = 12.0;

    /// Player defaults
    pub const PLAYER_HEALTH: i32 = 100;
    pub const PLAYER_MASS: f32 = 1.0;
    /// Bounding sphere radius of a unit box
    pub const PLAYER_BOUNDING_RADIUS: f32 = 0.866_025_4;
    /// Thrust added to velocity per tick (not scaled by dt)
    pub const THRUST_PER_TICK: f32 = 0.1;
    /// Yaw rate added per tick while a yaw key is held
    pub const YAW_PER_TICK: f32 = 0.04;
    /// Linear and angular damping rate for the player
    pub const PLAYER_DAMPING: f32 = 0.995;

    /// Weapon defaults
    pub const FIRE_DELAY: f32 = 0.25;
    pub const PROJECTILE_SPEED: f32 = 15.0;
    pub const PROJECTILE_SPAWN_OFFSET: f32 = 1.0;
    pub const PROJECTILE_DAMAGE: i32 = 5;
    pub const PROJECTILE_MASS: f32 = 0.25;
    pub const PROJECTILE_HEALTH: i32 = 1;
    pub const PROJECTILE_BOUNDING_RADIUS: f32 = 1.0;
    pub const PROJECTILE_SCALE: f32 = 0.25;
    /// Seconds a projectile lives; 15 units of travel stays short of a lap
    /// of the default square field, so a shot never wraps into its shooter
    pub const PROJECTILE_LIFETIME: f32 = 1.0;

    /// Asteroid field defaults
    pub const ASTEROID_COUNT: usize = 25;
    pub const ASTEROID_HEALTH: i32 = 10;
    pub const ASTEROID_MAX_SPEED: f32 = 5.0;

    /// Fraction of the elastic impulse kept on collision
    pub const RESTITUTION: f32 = 0.8;
    /// Fragment velocities are rotated by ± this angle (22.5 degrees)
    pub const FRAGMENT_SPREAD: f32 = std::f32::consts::PI / 8.0;
}

/// World vertical axis; the simulation plane is x/z
pub const UP: Vec3 = Vec3::Y;

/// Rotate a vector about the vertical axis
#[inline]
pub fn rotate_about_y(v: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * v
}

/// Unit forward vector for a heading (heading 0 faces -z)
#[inline]
pub fn heading_forward(heading: f32) -> Vec3 {
    rotate_about_y(Vec3::NEG_Z, heading)
}

/// Clamp a damping factor `1 - k*dt` into [0, 1]
#[inline]
pub fn damping_factor(rate: f32, dt: f32) -> f32 {
    (1.0 - rate * dt).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_forward() {
        let f = heading_forward(0.0);
        assert!((f - Vec3::NEG_Z).length() < 1e-6);

        // Positive heading turns left (counter-clockwise seen from above)
        let f = heading_forward(FRAC_PI_2);
        assert!((f - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn test_damping_factor_clamped() {
        assert!((damping_factor(0.995, 1.0 / 60.0) - (1.0 - 0.995 / 60.0)).abs() < 1e-6);
        assert_eq!(damping_factor(0.995, 5.0), 0.0);
        assert_eq!(damping_factor(-1.0, 1.0), 1.0);
        assert_eq!(damping_factor(0.0, 1.0), 1.0);
    }
}
