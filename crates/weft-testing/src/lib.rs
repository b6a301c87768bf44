//! Testing utilities for the Weft interaction engine.
//!
//! [`TestHost`] wraps an [`weft_ui::InteractionRuntime`] with an explicit
//! clock and captured host events, so black-box tests can script pointer and
//! key sequences and assert on what the engine published.

mod documents;
mod host;

#[cfg(test)]
mod tests;

pub use documents::{
    grid_3x3, horizontal_pager, marked_touchable, swipe_away_item, vertical_sequence,
};
pub use host::TestHost;
