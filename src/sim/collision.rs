//! Collision detection and response
//!
//! Every body is a sphere of radius `bounding_radius * |scale| / 2`. Two
//! passes run each tick:
//! - body vs body (player and asteroids): impulse exchange, damage and
//!   positional separation
//! - projectile vs body: one-shot damage, the projectile dies on first hit
//!
//! Both are O(n²); entity counts stay small. Contacts across the wrap seam
//! are not detected.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyHandle};
use super::store::EntityStore;

/// Outcome of one resolved body-body contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Unit vector from b towards a
    pub direction: Vec3,
    /// Signed gap before separation (negative)
    pub gap: f32,
    /// Scalar impulse per unit mass
    pub impulse: f32,
    pub damage_a: i32,
    pub damage_b: i32,
}

/// A projectile striking a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileHit {
    pub projectile: BodyHandle,
    pub target: BodyHandle,
    pub damage: i32,
}

/// Signed gap if the two spheres overlap
#[inline]
pub fn overlap(a: &Body, b: &Body) -> Option<f32> {
    let gap = a.gap_to(b);
    (gap < 0.0).then_some(gap)
}

/// Resolve a contact between two bodies if they overlap
///
/// Impulse `j = restitution * 2 * ((va - vb) · n) / (ma + mb)` along the
/// contact normal `n` (from b to a). Each body takes `ceil(|j * m_other|)`
/// damage and is pushed out by half the penetration.
pub fn resolve_pair(a: &mut Body, b: &mut Body, restitution: f32) -> Option<Impact> {
    let gap = overlap(a, b)?;
    debug_assert!(a.mass > 0.0 && b.mass > 0.0, "colliding bodies need positive mass");

    let direction = (a.position - b.position).try_normalize().unwrap_or(Vec3::X);
    let impact_speed = (a.velocity - b.velocity).dot(direction);
    let impulse = restitution * 2.0 * impact_speed / (a.mass + b.mass);

    a.velocity += direction * (-impulse * b.mass);
    b.velocity += direction * (impulse * a.mass);

    let damage_a = (impulse * b.mass).abs().ceil() as i32;
    let damage_b = (impulse * a.mass).abs().ceil() as i32;
    a.health -= damage_a;
    b.health -= damage_b;

    let push = direction * (-gap * 0.5);
    a.position += push;
    b.position -= push;

    Some(Impact {
        a: a.handle,
        b: b.handle,
        direction,
        gap,
        impulse,
        damage_a,
        damage_b,
    })
}

/// One full pairwise sweep over the player and every asteroid
///
/// Pairs are visited asteroid-asteroid in handle order with the player
/// last; bodies already at or below zero health are skipped.
pub fn body_collisions(store: &mut EntityStore, restitution: f32) -> Vec<Impact> {
    let mut impacts = Vec::new();
    let (player, asteroids, _) = store.split_mut();

    for i in 0..asteroids.len() {
        for j in (i + 1)..asteroids.len() {
            let (left, right) = asteroids.split_at_mut(j);
            let (a, b) = (&mut left[i], &mut right[0]);
            if !a.is_alive() || !b.is_alive() {
                continue;
            }
            if let Some(impact) = resolve_pair(a, b, restitution) {
                impacts.push(impact);
            }
        }

        let a = &mut asteroids[i];
        if !a.is_alive() || !player.is_alive() {
            continue;
        }
        if let Some(impact) = resolve_pair(a, player, restitution) {
            impacts.push(impact);
        }
    }

    for impact in &impacts {
        log::debug!(
            "Collision {:?} <-> {:?}: impulse {:.3}, damage {}/{}",
            impact.a,
            impact.b,
            impact.impulse,
            impact.damage_a,
            impact.damage_b
        );
    }
    impacts
}

/// Test every live projectile against the asteroids, then the player
///
/// A projectile damages at most one body and is marked dead on its first
/// hit; removal happens in the destruction sweep.
pub fn projectile_hits(store: &mut EntityStore) -> Vec<ProjectileHit> {
    let mut hits = Vec::new();
    let (player, asteroids, projectiles) = store.split_mut();

    for shot in projectiles.iter_mut() {
        if !shot.is_alive() {
            continue;
        }
        let Some(damage) = shot.damage() else {
            continue;
        };

        let targets = asteroids.iter_mut().chain(std::iter::once(&mut *player));
        for target in targets {
            if !target.is_alive() || overlap(shot, target).is_none() {
                continue;
            }
            target.health -= damage;
            shot.health = 0;
            hits.push(ProjectileHit {
                projectile: shot.handle,
                target: target.handle,
                damage,
            });
            log::debug!("Projectile {:?} hit {:?} for {}", shot.handle, target.handle, damage);
            break;
        }
    }
    hits
}
