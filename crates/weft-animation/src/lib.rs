//! Animation primitives for the Weft interaction core.
//!
//! Animations here are value-producing functions of time: the host advances a
//! monotonic millisecond clock and the owning driver samples each active plan,
//! committing and discarding the ones that finished. There are no timers and
//! no callbacks.

mod easing;
mod fling;
mod plan;

pub use easing::Easing;
pub use fling::FlingCalculator;
pub use plan::AnimationPlan;

/// Milliseconds on the host's monotonic clock.
pub type Timestamp = i64;
