//! Fling arithmetic.
//!
//! The deceleration model is a single configured exponent: a release velocity
//! `v` px/ms comes to rest after `1000 / (2 * deceleration)` milliseconds and
//! covers `|v| * 1000 / (2 * deceleration)` pixels. When the rest time exceeds
//! the configured cap the run is truncated and the distance shrinks
//! proportionally.

/// Computes fling distance and duration from an initial velocity.
#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    deceleration: f32,
    max_duration: i64,
}

/// Distance and duration of one fling run.
#[derive(Debug, Clone, Copy)]
pub struct FlingRun {
    /// Signed travel in pixels.
    pub distance: f32,
    /// Run length in milliseconds.
    pub duration: i64,
}

impl FlingCalculator {
    pub fn new(deceleration: f32, max_duration: i64) -> Self {
        Self {
            deceleration: deceleration.max(1e-4),
            max_duration: max_duration.max(1),
        }
    }

    /// Milliseconds until a fling comes to rest, capped at the configured
    /// maximum. Under the linear-decay model this is independent of the
    /// release speed.
    pub fn duration(&self) -> i64 {
        let natural = (1000.0 / (2.0 * self.deceleration)) as i64;
        natural.min(self.max_duration)
    }

    /// Full run for a release velocity in px/s along one axis.
    pub fn run(&self, velocity: f32) -> FlingRun {
        let duration = self.duration();
        let distance = velocity / 1000.0 * duration as f32;
        FlingRun { distance, duration }
    }
}
