//! Cooldown-gated firing

use glam::Vec3;

use super::body::{Body, BodyHandle, BodyKind};
use super::store::EntityStore;
use crate::config::SimConfig;
use crate::heading_forward;

/// Advance the player's cooldown and fire if allowed
///
/// Returns the new projectile's handle, or `None` when the trigger is up or
/// the cooldown has not elapsed. Neither case is an error.
pub fn fire(
    store: &mut EntityStore,
    wants_fire: bool,
    config: &SimConfig,
    dt: f32,
) -> Option<BodyHandle> {
    let player = store.player_mut();
    let weapon = player
        .weapon_mut()
        .expect("player body always carries a weapon");

    weapon.time_since_last_shot += dt;
    if !wants_fire || weapon.time_since_last_shot < weapon.fire_delay {
        return None;
    }
    weapon.time_since_last_shot = 0.0;

    let shot = build_projectile(store.player(), config);
    let handle = store.insert(shot);
    log::debug!("Fired projectile {:?}", handle);
    Some(handle)
}

/// A projectile leaving the player's nose along its heading
pub fn build_projectile(player: &Body, config: &SimConfig) -> Body {
    let forward = heading_forward(player.orientation_y());

    let mut shot = Body::new(
        BodyHandle(0),
        BodyKind::Projectile {
            damage: config.projectile_damage,
            age: 0.0,
        },
    );
    shot.position = player.position + forward * config.projectile_spawn_offset;
    shot.velocity = forward * config.projectile_speed;
    shot.rotation = Vec3::new(0.0, player.orientation_y(), 0.0);
    shot.scale = Vec3::splat(config.projectile_scale);
    shot.bounding_radius = config.projectile_bounding_radius;
    shot.mass = config.projectile_mass;
    shot.health = config.projectile_health;
    shot
}

/// Age projectiles and expire those past the configured lifetime
///
/// Expired projectiles are marked dead and removed by the destruction sweep.
pub fn age_projectiles(store: &mut EntityStore, lifetime: Option<f32>, dt: f32) {
    for shot in store.projectiles_mut() {
        if let BodyKind::Projectile { ref mut age, .. } = shot.kind {
            *age += dt;
            if lifetime.is_some_and(|limit| *age >= limit) {
                shot.health = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Weapon;

    const DT: f32 = 1.0 / 60.0;

    fn store(fire_delay: f32) -> EntityStore {
        let mut player = Body::new(
            BodyHandle(0),
            BodyKind::Player {
                weapon: Weapon::ready(fire_delay),
            },
        );
        player.position = Vec3::new(1.0, 0.0, 2.0);
        EntityStore::new(player)
    }

    #[test]
    fn test_cooldown_gating() {
        let config = SimConfig::default();
        let mut store = store(0.25);

        assert!(fire(&mut store, true, &config, DT).is_some());
        // Second shot well inside the delay is swallowed
        assert!(fire(&mut store, true, &config, 0.1).is_none());
        assert_eq!(store.projectiles().len(), 1);

        // Cooldown keeps running while the trigger is up
        assert!(fire(&mut store, false, &config, 0.1).is_none());
        assert!(fire(&mut store, true, &config, 0.06).is_some());
        assert_eq!(store.projectiles().len(), 2);
    }

    #[test]
    fn test_timer_runs_without_trigger() {
        let config = SimConfig::default();
        let mut store = store(0.25);
        fire(&mut store, false, &config, 0.2);
        let weapon = store.player().weapon().copied().unwrap();
        assert!((weapon.time_since_last_shot - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_projectile_pose() {
        let config = SimConfig::default();
        let mut store = store(0.25);
        store.player_mut().rotation.y = std::f32::consts::PI;
        let handle = fire(&mut store, true, &config, DT).unwrap();
        let shot = *store.get(handle).unwrap();

        // Heading pi faces +z
        assert!((shot.position - Vec3::new(1.0, 0.0, 3.0)).length() < 1e-5);
        assert!((shot.velocity - Vec3::new(0.0, 0.0, config.projectile_speed)).length() < 1e-4);
        assert_eq!(shot.rotation.y, std::f32::consts::PI);
        assert_eq!(shot.damage(), Some(config.projectile_damage));
        assert_eq!(shot.linear_damping, 0.0);
    }

    #[test]
    fn test_lifetime_expiry() {
        let config = SimConfig::default();
        let mut store = store(0.25);
        fire(&mut store, true, &config, DT);

        age_projectiles(&mut store, None, 100.0);
        assert!(store.projectiles()[0].is_alive());

        age_projectiles(&mut store, Some(101.0), 1.0);
        assert!(!store.projectiles()[0].is_alive());
    }
}
