//! Movement integration
//!
//! Explicit Euler: position from velocity, rotation from rotation rate, then
//! damping. Thrust and yaw are per-tick impulses, not scaled by dt.

use glam::Vec3;

use super::body::Body;
use super::tick::InputIntent;
use crate::rotate_about_y;

/// Player control response
#[derive(Debug, Clone, Copy)]
pub struct Controls {
    pub thrust_per_tick: f32,
    pub yaw_per_tick: f32,
}

/// Apply intents to the player and advance it by `dt`
pub fn integrate_player(player: &mut Body, intent: &InputIntent, controls: Controls, dt: f32) {
    // Thrust along local z, turned into the current heading
    let local = Vec3::new(0.0, 0.0, -intent.thrust_axis()).normalize_or_zero();
    let thrust = rotate_about_y(local * controls.thrust_per_tick, player.orientation_y());
    player.velocity += thrust;

    player.rotation_rate.y += intent.yaw_axis() * controls.yaw_per_tick;
    player.rotation.y += player.rotation_rate.y * dt;

    player.position += player.velocity * dt;
    player.apply_damping(dt);
}

/// Advance an asteroid or projectile by `dt`
pub fn integrate_body(body: &mut Body, dt: f32) {
    body.position += body.velocity * dt;
    body.rotation += body.rotation_rate * dt;
    body.apply_damping(dt);
}
