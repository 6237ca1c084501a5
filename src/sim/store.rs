//! Entity ownership and lifecycle notifications
//!
//! The store owns the player plus two collections (asteroids, projectiles).
//! Each collection is kept sorted by handle for stable iteration order.
//! Systems never remove from a collection while iterating it: they collect
//! handles first and call [`EntityStore::remove_many`] afterwards.

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyHandle, BodyKind, KindTag};

/// Lifecycle notification for the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A body was created; allocate its visual resources
    Spawned { handle: BodyHandle, kind: KindTag },
    /// A body was removed; release its visual resources
    Despawned { handle: BodyHandle, kind: KindTag },
}

impl SimEvent {
    pub fn handle(&self) -> BodyHandle {
        match *self {
            SimEvent::Spawned { handle, .. } | SimEvent::Despawned { handle, .. } => handle,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    player: Body,
    asteroids: Vec<Body>,
    projectiles: Vec<Body>,
    next_id: u32,
    /// Notifications not yet drained by the host
    #[serde(skip)]
    events: Vec<SimEvent>,
    spawned_total: u64,
    despawned_total: u64,
}

impl EntityStore {
    /// Create a store owning `player`; the player gets the first handle
    pub fn new(mut player: Body) -> Self {
        assert!(
            matches!(player.kind, BodyKind::Player { .. }),
            "store must be created with a player body"
        );
        debug_assert!(player.mass > 0.0, "player mass must be positive");
        player.handle = BodyHandle(1);
        let mut store = Self {
            player,
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            next_id: 2,
            events: Vec::new(),
            spawned_total: 0,
            despawned_total: 0,
        };
        store.notify_spawned(store.player.handle, KindTag::Player);
        store
    }

    fn allocate_handle(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    fn notify_spawned(&mut self, handle: BodyHandle, kind: KindTag) {
        self.spawned_total += 1;
        self.events.push(SimEvent::Spawned { handle, kind });
    }

    fn notify_despawned(&mut self, handle: BodyHandle, kind: KindTag) {
        self.despawned_total += 1;
        self.events.push(SimEvent::Despawned { handle, kind });
    }

    /// Insert an asteroid or projectile, assigning it a fresh handle
    pub fn insert(&mut self, mut body: Body) -> BodyHandle {
        debug_assert!(body.mass > 0.0, "inserted body must have positive mass");
        debug_assert!(body.health > 0, "inserted body must be alive");

        let handle = self.allocate_handle();
        body.handle = handle;
        let kind = body.tag();
        match kind {
            KindTag::Asteroid => self.asteroids.push(body),
            KindTag::Projectile => self.projectiles.push(body),
            KindTag::Player => panic!("the store owns exactly one player"),
        }
        self.notify_spawned(handle, kind);
        handle
    }

    /// Remove a body by handle; the player cannot be removed
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let removed = if let Ok(idx) = self.asteroids.binary_search_by_key(&handle, |b| b.handle) {
            self.asteroids.remove(idx)
        } else if let Ok(idx) = self.projectiles.binary_search_by_key(&handle, |b| b.handle) {
            self.projectiles.remove(idx)
        } else {
            return None;
        };
        self.notify_despawned(handle, removed.tag());
        Some(removed)
    }

    /// Remove a batch of bodies collected during a sweep
    pub fn remove_many(&mut self, handles: &[BodyHandle]) -> Vec<Body> {
        let mut removed = Vec::with_capacity(handles.len());
        for &handle in handles {
            match self.remove(handle) {
                Some(body) => removed.push(body),
                None => panic!("sweep referenced unknown handle {:?}", handle),
            }
        }
        removed
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        if handle == self.player.handle {
            return Some(&self.player);
        }
        Self::find(&self.asteroids, handle).or_else(|| Self::find(&self.projectiles, handle))
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        if handle == self.player.handle {
            return Some(&mut self.player);
        }
        if let Ok(idx) = self.asteroids.binary_search_by_key(&handle, |b| b.handle) {
            return Some(&mut self.asteroids[idx]);
        }
        match self.projectiles.binary_search_by_key(&handle, |b| b.handle) {
            Ok(idx) => Some(&mut self.projectiles[idx]),
            Err(_) => None,
        }
    }

    fn find(bodies: &[Body], handle: BodyHandle) -> Option<&Body> {
        bodies
            .binary_search_by_key(&handle, |b| b.handle)
            .ok()
            .map(|idx| &bodies[idx])
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn player(&self) -> &Body {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Body {
        &mut self.player
    }

    pub fn asteroids(&self) -> &[Body] {
        &self.asteroids
    }

    pub fn projectiles(&self) -> &[Body] {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut [Body] {
        &mut self.projectiles
    }

    /// Disjoint mutable access to every collection at once
    pub fn split_mut(&mut self) -> (&mut Body, &mut [Body], &mut [Body]) {
        (&mut self.player, &mut self.asteroids, &mut self.projectiles)
    }

    /// Every live body, player first
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        std::iter::once(&self.player)
            .chain(self.asteroids.iter())
            .chain(self.projectiles.iter())
    }

    /// Number of live bodies including the player
    pub fn len(&self) -> usize {
        1 + self.asteroids.len() + self.projectiles.len()
    }

    /// Always false: the player is never removed
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Take all pending lifecycle notifications
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[SimEvent] {
        &self.events
    }

    /// (spawn notifications, despawn notifications) issued so far
    pub fn lifecycle_totals(&self) -> (u64, u64) {
        (self.spawned_total, self.despawned_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Weapon;

    fn store() -> EntityStore {
        EntityStore::new(Body::new(
            BodyHandle(0),
            BodyKind::Player {
                weapon: Weapon::ready(0.25),
            },
        ))
    }

    fn asteroid() -> Body {
        Body::new(BodyHandle(0), BodyKind::Asteroid)
    }

    #[test]
    fn test_player_spawn_notification() {
        let mut store = store();
        assert_eq!(store.player().handle, BodyHandle(1));
        let events = store.drain_events();
        assert_eq!(
            events,
            vec![SimEvent::Spawned {
                handle: BodyHandle(1),
                kind: KindTag::Player
            }]
        );
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_insert_assigns_unique_handles() {
        let mut store = store();
        let a = store.insert(asteroid());
        let b = store.insert(asteroid());
        let p = store.insert(Body::new(BodyHandle(0), BodyKind::Projectile { damage: 5, age: 0.0 }));
        assert!(a < b && b < p);
        assert_eq!(store.asteroids().len(), 2);
        assert_eq!(store.projectiles().len(), 1);
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(p).map(|b| b.tag()), Some(KindTag::Projectile));
    }

    #[test]
    fn test_remove_emits_despawn_and_keeps_order() {
        let mut store = store();
        let handles: Vec<_> = (0..4).map(|_| store.insert(asteroid())).collect();
        store.drain_events();

        let removed = store.remove_many(&[handles[1], handles[2]]);
        assert_eq!(removed.len(), 2);
        let left: Vec<_> = store.asteroids().iter().map(|b| b.handle).collect();
        assert_eq!(left, vec![handles[0], handles[3]]);

        let events = store.drain_events();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| matches!(e, SimEvent::Despawned { kind: KindTag::Asteroid, .. })));
        assert_eq!(store.lifecycle_totals(), (5, 2));
    }

    #[test]
    fn test_player_cannot_be_removed() {
        let mut store = store();
        let player = store.player().handle;
        assert!(store.remove(player).is_none());
        assert!(store.contains(player));
    }

    #[test]
    #[should_panic(expected = "unknown handle")]
    fn test_remove_many_unknown_handle_panics() {
        let mut store = store();
        store.remove_many(&[BodyHandle(99)]);
    }

    #[test]
    #[should_panic(expected = "exactly one player")]
    fn test_second_player_rejected() {
        let mut store = store();
        store.insert(Body::new(
            BodyHandle(0),
            BodyKind::Player {
                weapon: Weapon::ready(0.25),
            },
        ));
    }
}
