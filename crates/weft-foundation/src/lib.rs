//! Gesture recognition building blocks for the Weft interaction core.
//!
//! This crate holds the velocity tracker and the per-touchable author gesture
//! state machines. The pointer pipeline (in `weft-ui`) feeds events in and
//! interprets the effects the machines emit; nothing here touches the
//! component tree directly.

pub mod gestures;
mod velocity_tracker;

pub use gestures::{Gesture, GestureContext, GestureEffect, GestureSet};
pub use velocity_tracker::VelocityTracker;
