//! Removal of dead bodies and asteroid fragmentation
//!
//! Dead handles are collected first, removed second, and fragments are
//! inserted only after every removal is done.

use std::f32::consts::{SQRT_2, TAU};

use glam::Vec3;
use rand::Rng;

use super::body::{Body, BodyHandle};
use super::store::EntityStore;
use crate::{UP, rotate_about_y};

/// How destroyed asteroids break apart
#[derive(Debug, Clone, Copy)]
pub struct FragmentRules {
    /// Smallest authored asteroid scale
    pub minimum_atomic_scale: f32,
    /// Fragment velocity rotation (radians)
    pub spread: f32,
    /// Health each fragment starts with
    pub health: i32,
}

impl FragmentRules {
    /// Asteroids at least this large (by `|scale|`) split in two
    pub fn split_threshold(&self) -> f32 {
        SQRT_2 * self.minimum_atomic_scale
    }
}

/// What one sweep removed and created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub destroyed_asteroids: Vec<BodyHandle>,
    pub fragments: Vec<BodyHandle>,
    pub destroyed_projectiles: Vec<BodyHandle>,
}

/// Two half-scale children of a destroyed asteroid, or `None` if it is too small
pub fn fragments<R: Rng>(
    parent: &Body,
    rules: &FragmentRules,
    rng: &mut R,
) -> Option<[Body; 2]> {
    if parent.scale.length() < rules.split_threshold() {
        return None;
    }

    let half_scale = parent.scale * 0.5;
    // Offset sideways to the direction of travel
    let side = parent.velocity.cross(UP).normalize_or_zero() * half_scale;

    let make = |offset: Vec3, turn: f32, rng: &mut R| {
        let mut child = *parent;
        child.position = parent.position + offset;
        child.velocity = rotate_about_y(parent.velocity, turn);
        child.mass = parent.mass * 0.25;
        child.scale = half_scale;
        child.health = rules.health;
        child.rotation = Vec3::new(
            rng.random::<f32>() * TAU,
            rng.random::<f32>() * TAU,
            rng.random::<f32>() * TAU,
        );
        child.rotation_rate = Vec3::ZERO;
        child
    };

    let a = make(side, -rules.spread, &mut *rng);
    let b = make(-side, rules.spread, &mut *rng);
    Some([a, b])
}

/// Remove dead asteroids (spawning fragments) and dead projectiles
pub fn sweep<R: Rng>(
    store: &mut EntityStore,
    rules: &FragmentRules,
    rng: &mut R,
) -> SweepReport {
    let mut report = SweepReport::default();

    let dead: Vec<BodyHandle> = store
        .asteroids()
        .iter()
        .filter(|b| !b.is_alive())
        .map(|b| b.handle)
        .collect();
    let removed = store.remove_many(&dead);
    report.destroyed_asteroids = dead;

    let mut pending = Vec::new();
    for parent in &removed {
        match fragments(parent, rules, rng) {
            Some(children) => {
                log::debug!(
                    "Asteroid {:?} split (scale {:.4})",
                    parent.handle,
                    parent.scale.length()
                );
                pending.extend(children);
            }
            None => log::debug!("Asteroid {:?} destroyed", parent.handle),
        }
    }
    for child in pending {
        report.fragments.push(store.insert(child));
    }

    let spent: Vec<BodyHandle> = store
        .projectiles()
        .iter()
        .filter(|b| !b.is_alive())
        .map(|b| b.handle)
        .collect();
    store.remove_many(&spent);
    report.destroyed_projectiles = spent;

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyKind, Weapon};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const MIN_SCALE: f32 = 0.01;

    fn rules() -> FragmentRules {
        FragmentRules {
            minimum_atomic_scale: MIN_SCALE,
            spread: std::f32::consts::PI / 8.0,
            health: 10,
        }
    }

    fn store() -> EntityStore {
        EntityStore::new(Body::new(
            BodyHandle(0),
            BodyKind::Player {
                weapon: Weapon::ready(0.25),
            },
        ))
    }

    /// An asteroid whose scale vector has exactly the given length
    fn rock_with_size(size: f32) -> Body {
        let mut body = Body::new(BodyHandle(0), BodyKind::Asteroid);
        body.scale = Vec3::new(size, 0.0, 0.0);
        body.bounding_radius = 100.0;
        body.mass = 4.0;
        body.health = 10;
        body.position = Vec3::new(2.0, 0.0, -1.0);
        body.velocity = Vec3::new(0.0, 0.0, -2.0);
        body.linear_damping = 0.1;
        body
    }

    #[test]
    fn test_threshold_below_gives_nothing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let size = SQRT_2 * MIN_SCALE - 1e-5;
        assert!(fragments(&rock_with_size(size), &rules(), &mut rng).is_none());
    }

    #[test]
    fn test_threshold_above_gives_two_children() {
        let mut rng = Pcg32::seed_from_u64(1);
        let size = SQRT_2 * MIN_SCALE + 1e-5;
        let parent = rock_with_size(size);
        let [a, b] = fragments(&parent, &rules(), &mut rng).unwrap();

        for child in [&a, &b] {
            assert!((child.scale.length() - size * 0.5).abs() < 1e-7);
            assert!((child.mass - 1.0).abs() < 1e-6);
            assert_eq!(child.health, 10);
            assert_eq!(child.linear_damping, 0.1);
            assert!((child.velocity.length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_children_spread_and_offset() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut parent = rock_with_size(1.0);
        parent.scale = Vec3::splat(1.0);
        let [a, b] = fragments(&parent, &rules(), &mut rng).unwrap();

        // v = -z, v x up = +x, so `a` sits on the +x side
        assert!((a.position - Vec3::new(2.5, 0.0, -1.0)).length() < 1e-5);
        assert!((b.position - Vec3::new(1.5, 0.0, -1.0)).length() < 1e-5);

        // Rotations of ±22.5 degrees about up
        let angle = a.velocity.angle_between(b.velocity);
        assert!((angle - std::f32::consts::PI / 4.0).abs() < 1e-4);
        assert!((a.velocity.angle_between(parent.velocity) - std::f32::consts::PI / 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_stationary_parent_splits_in_place() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut parent = rock_with_size(1.0);
        parent.velocity = Vec3::ZERO;
        let [a, b] = fragments(&parent, &rules(), &mut rng).unwrap();
        assert_eq!(a.position, parent.position);
        assert_eq!(b.position, parent.position);
        assert!(a.velocity.is_finite());
    }

    #[test]
    fn test_sweep_replaces_dead_asteroid() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut store = store();
        let big = store.insert(rock_with_size(1.0));
        let small = store.insert(rock_with_size(0.001));
        let alive = store.insert(rock_with_size(1.0));
        store.get_mut(big).unwrap().health = 0;
        store.get_mut(small).unwrap().health = -3;
        store.drain_events();

        let report = sweep(&mut store, &rules(), &mut rng);
        assert_eq!(report.destroyed_asteroids, vec![big, small]);
        assert_eq!(report.fragments.len(), 2);
        assert!(report.fragments.iter().all(|h| *h > alive));
        assert_eq!(store.asteroids().len(), 3);
        assert!(store.asteroids().iter().all(|b| b.is_alive()));

        let events = store.drain_events();
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_sweep_removes_spent_projectiles() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut store = store();
        let shot = store.insert(Body::new(BodyHandle(0), BodyKind::Projectile { damage: 5, age: 0.0 }));
        let live = store.insert(Body::new(BodyHandle(0), BodyKind::Projectile { damage: 5, age: 0.0 }));
        store.get_mut(shot).unwrap().health = 0;

        let report = sweep(&mut store, &rules(), &mut rng);
        assert_eq!(report.destroyed_projectiles, vec![shot]);
        assert!(!store.contains(shot));
        assert!(store.contains(live));
    }

    #[test]
    fn test_sweep_never_removes_dead_player() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut store = store();
        store.player_mut().health = -10;
        sweep(&mut store, &rules(), &mut rng);
        assert_eq!(store.player().health, -10);
        assert!(store.contains(store.player().handle));
    }
}
