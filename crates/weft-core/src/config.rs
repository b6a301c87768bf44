//! The configuration surface.
//!
//! Every threshold the engines consult lives here so hosts and tests can
//! override any of them. Defaults match the shipped experience; distances are
//! display-independent pixels and rates are px/s unless noted.

use weft_animation::Easing;

use crate::Timestamp;

#[derive(Clone, Debug)]
pub struct InteractionConfig {
    /// How long a Down may sit before movement is classified as scrolling.
    pub tap_or_scroll_timeout: Timestamp,
    /// Gap between samples after which the pointer counts as stopped.
    pub pointer_inactivity_timeout: Timestamp,
    /// Movement below this never starts a scroll (global px).
    pub pointer_slop_threshold: f32,
    /// Release speeds below this do not fling.
    pub minimum_fling_velocity: f32,
    /// Release speeds are clamped to this.
    pub maximum_fling_velocity: f32,

    /// Duration of a commanded scroll.
    pub scroll_command_duration: Timestamp,
    pub scroll_command_easing: Easing,
    /// Duration of the post-fling snap phase.
    pub scroll_snap_duration: Timestamp,
    /// Fraction of velocity shed per second in the fling model.
    pub scroller_deceleration: f32,
    /// Hard cap on one fling run.
    pub scroller_max_duration: Timestamp,
    /// Displacement curve of a fling run.
    pub scroller_duration_easing: Easing,

    /// Half-angle of the cone around vertical that still counts as a
    /// vertical scroll (radians).
    pub scroll_angle_slope_vertical: f32,
    /// Same for horizontal scrolling.
    pub scroll_angle_slope_horizontal: f32,

    /// Allowed deviation between swipe motion and its declared axis
    /// (radians).
    pub swipe_angle_tolerance: f32,
    pub swipe_velocity_threshold: f32,
    pub swipe_max_velocity: f32,
    /// Progress at which a released swipe completes instead of reverting.
    pub swipe_fulfill_threshold: f32,
    pub default_swipe_animation_duration: Timestamp,
    pub max_swipe_animation_duration: Timestamp,

    pub double_press_timeout: Timestamp,
    pub long_press_timeout: Timestamp,
    /// Maximum travel for a Tap (global px).
    pub maximum_tap_travel: f32,
    /// Maximum average speed for a Tap.
    pub maximum_tap_velocity: f32,

    pub default_pager_animation_duration: Timestamp,
    pub default_pager_animation_easing: Easing,

    /// When set, tapping an edit-text (or a touchable wrapping only an
    /// edit-text) focuses it and asks the host for the keyboard.
    pub focus_edit_text_on_tap: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            tap_or_scroll_timeout: 100,
            pointer_inactivity_timeout: 250,
            pointer_slop_threshold: 10.0,
            minimum_fling_velocity: 50.0,
            maximum_fling_velocity: 1200.0,

            scroll_command_duration: 1000,
            scroll_command_easing: Easing::ease_in_out(),
            scroll_snap_duration: 500,
            scroller_deceleration: 0.2,
            scroller_max_duration: 3000,
            scroller_duration_easing: Easing::ease_in_out(),

            scroll_angle_slope_vertical: 1.48,
            scroll_angle_slope_horizontal: 0.64,

            swipe_angle_tolerance: 0.84,
            swipe_velocity_threshold: 500.0,
            swipe_max_velocity: 2000.0,
            swipe_fulfill_threshold: 0.5,
            default_swipe_animation_duration: 200,
            max_swipe_animation_duration: 400,

            double_press_timeout: 500,
            long_press_timeout: 1000,
            maximum_tap_travel: 10.0,
            maximum_tap_velocity: 50.0,

            default_pager_animation_duration: 600,
            default_pager_animation_easing: Easing::Linear,

            focus_edit_text_on_tap: false,
        }
    }
}

impl InteractionConfig {
    pub fn set_tap_or_scroll_timeout(mut self, value: Timestamp) -> Self {
        self.tap_or_scroll_timeout = value;
        self
    }

    pub fn set_pointer_slop_threshold(mut self, value: f32) -> Self {
        self.pointer_slop_threshold = value;
        self
    }

    pub fn set_minimum_fling_velocity(mut self, value: f32) -> Self {
        self.minimum_fling_velocity = value;
        self
    }

    pub fn set_maximum_fling_velocity(mut self, value: f32) -> Self {
        self.maximum_fling_velocity = value;
        self
    }

    pub fn set_double_press_timeout(mut self, value: Timestamp) -> Self {
        self.double_press_timeout = value;
        self
    }

    pub fn set_long_press_timeout(mut self, value: Timestamp) -> Self {
        self.long_press_timeout = value;
        self
    }

    pub fn set_focus_edit_text_on_tap(mut self, value: bool) -> Self {
        self.focus_edit_text_on_tap = value;
        self
    }
}
