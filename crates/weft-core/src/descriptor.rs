//! Gesture descriptor grammar.
//!
//! Authors attach gestures to touchables as typed entries. Parsing from a
//! document is tolerant: an unrecognized type is logged and skipped while the
//! rest of the list still installs.

use crate::command::CommandBatch;
use crate::events::SwipeDirection;
use crate::Timestamp;

/// One entry of a touchable's gesture list.
#[derive(Clone, Debug)]
pub enum GestureDescriptor {
    Tap(TapParams),
    LongPress(LongPressParams),
    DoublePress(DoublePressParams),
    SwipeAway(SwipeAwayParams),
}

impl GestureDescriptor {
    /// Resolve an author-supplied type name. Unknown names return `None`
    /// after logging a console diagnostic; the caller omits the entry.
    pub fn kind_from_name(name: &str) -> Option<&'static str> {
        match name {
            "Tap" => Some("Tap"),
            "LongPress" => Some("LongPress"),
            "DoublePress" => Some("DoublePress"),
            "SwipeAway" => Some("SwipeAway"),
            other => {
                log::warn!("unrecognized gesture type {other:?}; entry ignored");
                None
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GestureDescriptor::Tap(_) => "Tap",
            GestureDescriptor::LongPress(_) => "LongPress",
            GestureDescriptor::DoublePress(_) => "DoublePress",
            GestureDescriptor::SwipeAway(_) => "SwipeAway",
        }
    }
}

/// Parameters for a Tap entry. Unset bounds fall back to the config values.
#[derive(Clone, Debug, Default)]
pub struct TapParams {
    pub on_tap: CommandBatch,
    pub max_travel: Option<f32>,
    pub max_velocity: Option<f32>,
}

#[derive(Clone, Debug, Default)]
pub struct LongPressParams {
    pub on_long_press_start: CommandBatch,
    pub on_long_press_end: CommandBatch,
    pub timeout: Option<Timestamp>,
}

#[derive(Clone, Debug, Default)]
pub struct DoublePressParams {
    pub on_double_press: CommandBatch,
    pub on_single_press: CommandBatch,
    pub timeout: Option<Timestamp>,
}

/// Visual treatment of the content during a swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SwipeAction {
    /// The reveal item is uncovered beneath the sliding content.
    #[default]
    Reveal,
    /// Content and reveal item slide together.
    Slide,
    /// The reveal item slides in over static content.
    Cover,
}

#[derive(Clone, Debug)]
pub struct SwipeAwayParams {
    pub direction: SwipeDirection,
    pub action: SwipeAction,
    pub on_swipe_move: CommandBatch,
    pub on_swipe_done: CommandBatch,
}

impl SwipeAwayParams {
    pub fn new(direction: SwipeDirection) -> Self {
        Self {
            direction,
            action: SwipeAction::default(),
            on_swipe_move: CommandBatch::new(),
            on_swipe_done: CommandBatch::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_resolve() {
        for kind in ["Tap", "LongPress", "DoublePress", "SwipeAway"] {
            assert_eq!(GestureDescriptor::kind_from_name(kind), Some(kind));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(GestureDescriptor::kind_from_name("Spin"), None);
    }
}
