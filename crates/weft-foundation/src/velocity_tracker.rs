//! Velocity tracking for fling support.
//!
//! Keeps a sliding window of absolute position samples and fits a straight
//! line through them (least squares per axis). The window is bounded both by
//! sample count and by inactivity: a gap longer than the configured pointer
//! inactivity timeout means the pointer stopped, and everything before the
//! gap is irrelevant.

use weft_core::{InteractionConfig, Timestamp};
use weft_graphics::Point;

/// Ring buffer size for velocity samples.
const HISTORY_SIZE: usize = 20;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time: Timestamp,
    position: Point,
}

/// 2D velocity tracker over viewport-space positions.
///
/// Velocity is always reported in global coordinate units per second, even
/// when the tracked component is transformed; callers convert to local axes
/// where they need them.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: Vec<Sample>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, time: Timestamp, position: Point) {
        if let Some(last) = self.samples.last() {
            if last.time == time && last.position == position {
                return;
            }
        }
        if self.samples.len() == HISTORY_SIZE {
            self.samples.remove(0);
        }
        self.samples.push(Sample { time, position });
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Raw fitted velocity in px/s, without the fling clamps.
    pub fn raw_velocity(&self, config: &InteractionConfig) -> Point {
        let window = self.active_window(config.pointer_inactivity_timeout);
        if window.len() < 2 {
            return Point::ZERO;
        }

        // Least-squares slope of position against time, per axis.
        let n = window.len() as f32;
        let t0 = window[0].time;
        let mut sum_t = 0.0f32;
        let mut sum_tt = 0.0f32;
        let mut sum_x = 0.0f32;
        let mut sum_y = 0.0f32;
        let mut sum_tx = 0.0f32;
        let mut sum_ty = 0.0f32;
        for sample in window {
            let t = (sample.time - t0) as f32;
            sum_t += t;
            sum_tt += t * t;
            sum_x += sample.position.x;
            sum_y += sample.position.y;
            sum_tx += t * sample.position.x;
            sum_ty += t * sample.position.y;
        }
        let denom = n * sum_tt - sum_t * sum_t;
        if denom.abs() < f32::EPSILON {
            return Point::ZERO;
        }
        // Slope is px/ms; scale to px/s.
        let vx = (n * sum_tx - sum_t * sum_x) / denom * 1000.0;
        let vy = (n * sum_ty - sum_t * sum_y) / denom * 1000.0;
        Point::new(vx, vy)
    }

    /// Fling velocity: magnitude clamped to `maximum_fling_velocity`, zeroed
    /// below `minimum_fling_velocity`.
    pub fn velocity(&self, config: &InteractionConfig) -> Point {
        let raw = self.raw_velocity(config);
        let magnitude = raw.magnitude();
        if magnitude < config.minimum_fling_velocity {
            return Point::ZERO;
        }
        if magnitude > config.maximum_fling_velocity {
            return raw.scaled(config.maximum_fling_velocity / magnitude);
        }
        raw
    }

    /// The newest run of samples with no inactivity gap between neighbors.
    fn active_window(&self, inactivity_timeout: Timestamp) -> &[Sample] {
        if self.samples.is_empty() {
            return &[];
        }
        let mut start = self.samples.len() - 1;
        while start > 0 {
            let gap = self.samples[start].time - self.samples[start - 1].time;
            if gap > inactivity_timeout {
                break;
            }
            start -= 1;
        }
        &self.samples[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> InteractionConfig {
        InteractionConfig::default()
    }

    #[test]
    fn empty_tracker_returns_zero() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(&config()), Point::ZERO);
    }

    #[test]
    fn single_sample_returns_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, Point::new(0.0, 100.0));
        assert_eq!(tracker.velocity(&config()), Point::ZERO);
    }

    #[test]
    fn constant_motion_fits_exactly() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, Point::new(0.0, 100.0));
        tracker.add_sample(200, Point::new(0.0, 50.0));
        tracker.add_sample(400, Point::new(0.0, 0.0));
        let velocity = tracker.velocity(&config());
        assert!((velocity.y + 250.0).abs() < 1.0, "vy = {}", velocity.y);
        assert!(velocity.x.abs() < 1.0);
    }

    #[test]
    fn magnitude_clamps_to_maximum() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, Point::new(400.0, 10.0));
        tracker.add_sample(100, Point::new(100.0, 10.0));
        let velocity = tracker.velocity(&config());
        assert!((velocity.magnitude() - 1200.0).abs() < 1.0);
        assert!(velocity.x < 0.0);
    }

    #[test]
    fn slow_release_returns_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, Point::new(0.0, 0.0));
        tracker.add_sample(1000, Point::new(0.0, 20.0));
        assert_eq!(tracker.velocity(&config()), Point::ZERO);
    }

    #[test]
    fn inactivity_gap_discards_history() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, Point::new(0.0, 0.0));
        tracker.add_sample(100, Point::new(0.0, 300.0));
        // Pointer holds still for longer than the inactivity timeout.
        tracker.add_sample(600, Point::new(0.0, 300.0));
        assert_eq!(tracker.velocity(&config()), Point::ZERO);
    }

    #[test]
    fn reset_clears_samples() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, Point::new(0.0, 0.0));
        tracker.add_sample(50, Point::new(100.0, 0.0));
        tracker.reset();
        assert_eq!(tracker.velocity(&config()), Point::ZERO);
    }
}
