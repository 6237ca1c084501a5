//! Simulated bodies
//!
//! Player, asteroids and projectiles share one [`Body`] shape; the
//! [`BodyKind`] tag carries the kind-specific data.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::damping_factor;

/// Stable handle to a body in the [`EntityStore`](super::EntityStore)
///
/// Handles are never reused within one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Player weapon state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Seconds between shots
    pub fire_delay: f32,
    /// Seconds since the last shot (or since spawn)
    pub time_since_last_shot: f32,
}

impl Weapon {
    /// A weapon that can fire on its first tick
    pub fn ready(fire_delay: f32) -> Self {
        Self {
            fire_delay,
            time_since_last_shot: fire_delay,
        }
    }
}

/// Kind tag with kind-specific fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyKind {
    Player { weapon: Weapon },
    Asteroid,
    Projectile {
        damage: i32,
        /// Seconds since the projectile was fired
        age: f32,
    },
}

/// Coarse kind without payload, for notifications and render tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum KindTag {
    Player = 0,
    Asteroid = 1,
    Projectile = 2,
}

impl BodyKind {
    pub fn tag(&self) -> KindTag {
        match self {
            BodyKind::Player { .. } => KindTag::Player,
            BodyKind::Asteroid => KindTag::Asteroid,
            BodyKind::Projectile { .. } => KindTag::Projectile,
        }
    }
}

/// A simulated physical entity
///
/// Positions live on the x/z plane; y stays 0 and is reserved for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub handle: BodyHandle,
    pub kind: BodyKind,
    pub position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// Euler rotation; `rotation.y` is the heading
    pub rotation: Vec3,
    /// Angular velocity per axis (radians per second)
    pub rotation_rate: Vec3,
    pub scale: Vec3,
    /// Collision radius of the source asset before scaling
    pub bounding_radius: f32,
    pub mass: f32,
    pub health: i32,
    /// Linear damping rate k in `1 - k*dt`
    pub linear_damping: f32,
    /// Angular damping rate k in `1 - k*dt`
    pub angular_damping: f32,
}

impl Body {
    pub fn new(handle: BodyHandle, kind: BodyKind) -> Self {
        Self {
            handle,
            kind,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            rotation_rate: Vec3::ZERO,
            scale: Vec3::ONE,
            bounding_radius: 0.5,
            mass: 1.0,
            health: 1,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Heading about the vertical axis
    #[inline]
    pub fn orientation_y(&self) -> f32 {
        self.rotation.y
    }

    /// Collision radius used by both collision passes
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        self.bounding_radius * self.scale.length() * 0.5
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[inline]
    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, BodyKind::Projectile { .. })
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            BodyKind::Player { weapon } => Some(weapon),
            _ => None,
        }
    }

    pub fn weapon_mut(&mut self) -> Option<&mut Weapon> {
        match &mut self.kind {
            BodyKind::Player { weapon } => Some(weapon),
            _ => None,
        }
    }

    /// Damage dealt on hit (projectiles only)
    pub fn damage(&self) -> Option<i32> {
        match self.kind {
            BodyKind::Projectile { damage, .. } => Some(damage),
            _ => None,
        }
    }

    /// Apply linear and angular damping for one tick
    pub fn apply_damping(&mut self, dt: f32) {
        if self.linear_damping != 0.0 {
            self.velocity *= damping_factor(self.linear_damping, dt);
        }
        if self.angular_damping != 0.0 {
            self.rotation_rate *= damping_factor(self.angular_damping, dt);
        }
    }

    /// Signed gap between two bodies' collision spheres (negative = overlap)
    #[inline]
    pub fn gap_to(&self, other: &Body) -> f32 {
        self.position.distance(other.position) - self.effective_radius() - other.effective_radius()
    }
}
