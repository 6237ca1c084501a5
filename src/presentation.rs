//! Host-side presentation helpers
//!
//! Nothing here feeds back into the simulation except the `dt` a host
//! chooses to pass to [`Simulation::step`](crate::sim::Simulation::step).

/// Seconds the death slow-motion takes to come to a stop
pub const DEATH_SLOWDOWN_DURATION: f32 = 2.0;

/// Time scale at or below which the host stops stepping
pub const SLOWDOWN_STOP_FACTOR: f32 = 0.01;

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Cubic ease-out: fast start, gentle finish
#[inline]
pub fn ease_out_cubic(x: f32) -> f32 {
    1.0 - (1.0 - x).powi(3)
}

/// Slow-motion time scale applied after the player dies
///
/// The host multiplies its frame `dt` by [`factor`](Self::factor) before
/// stepping, then reports the snapshot back through [`update`](Self::update).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathSlowdown {
    /// Real seconds since death was first observed
    elapsed: f32,
    duration: f32,
    factor: f32,
}

impl Default for DeathSlowdown {
    fn default() -> Self {
        Self::new(DEATH_SLOWDOWN_DURATION)
    }
}

impl DeathSlowdown {
    pub fn new(duration: f32) -> Self {
        debug_assert!(duration > 0.0, "slowdown duration must be positive");
        Self {
            elapsed: 0.0,
            duration,
            factor: 1.0,
        }
    }

    /// Current time scale in [0, 1]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// `real_dt` scaled for the next simulation step
    pub fn scaled_dt(&self, real_dt: f32) -> f32 {
        real_dt * self.factor
    }

    /// Advance with the real frame time; only counts while the player is dead
    pub fn update(&mut self, real_dt: f32, is_dead: bool) -> f32 {
        if is_dead {
            self.elapsed += real_dt;
            let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
            self.factor = lerp(1.0, 0.0, ease_out_cubic(t));
        }
        self.factor
    }

    /// The host should stop stepping once this is true
    pub fn is_finished(&self) -> bool {
        self.factor <= SLOWDOWN_STOP_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_and_ease() {
        assert_eq!(lerp(1.0, 0.0, 0.25), 0.75);
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_alive_keeps_full_speed() {
        let mut slowdown = DeathSlowdown::default();
        for _ in 0..300 {
            assert_eq!(slowdown.update(1.0 / 60.0, false), 1.0);
        }
        assert_eq!(slowdown.scaled_dt(0.5), 0.5);
        assert!(!slowdown.is_finished());
    }

    #[test]
    fn test_death_eases_to_stop() {
        let mut slowdown = DeathSlowdown::default();
        let mut previous = slowdown.factor();
        let mut frames = 0;
        while !slowdown.is_finished() {
            let factor = slowdown.update(1.0 / 60.0, true);
            assert!(factor <= previous);
            previous = factor;
            frames += 1;
            assert!(frames <= 120, "slowdown should finish within its duration");
        }
        // easeOutCubic reaches 0.99 at t ≈ 0.785, so well before 2 s
        assert!(frames > 60);
    }

    #[test]
    fn test_factor_never_negative() {
        let mut slowdown = DeathSlowdown::new(0.5);
        slowdown.update(10.0, true);
        assert_eq!(slowdown.factor(), 0.0);
        assert!(slowdown.is_finished());
    }
}
