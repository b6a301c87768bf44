//! Core data model for the Weft interaction engine.
//!
//! This crate owns everything the input and focus engines share: the
//! component tree arena, component state and capability sets, the gesture
//! descriptor grammar, the configuration surface, command batches with their
//! sequencer queue, and the host-facing event types.
//!
//! Nothing here drives behavior on its own. The pointer pipeline, gesture
//! recognizers, animators, and focus manager all live downstream and mutate
//! this model from the single host thread.

mod command;
mod component;
mod config;
mod descriptor;
mod events;
mod tree;

pub use command::{
    Binding, BindingValue, Command, CommandBatch, CommandSequencer, PageTarget, PendingBatch,
    SequencerMode,
};
pub use component::{
    Axis, Capability, CapabilitySet, Component, FocusProps, LayoutDirection, PagerNavigation,
    PagerProps, ScrollableProps, SnapPolicy, State, StateSet, TouchableProps,
};
pub use config::InteractionConfig;
pub use descriptor::{
    DoublePressParams, GestureDescriptor, LongPressParams, SwipeAction, SwipeAwayParams, TapParams,
};
pub use events::{
    ActionRef, ActionState, FocusDirection, HandlerKind, HostEvent, PointerEvent, PointerEventKind,
    PointerId, PointerKind, SwipeDirection,
};
pub use tree::{ComponentId, ComponentTree};

/// Milliseconds on the host's monotonic clock.
pub type Timestamp = weft_animation::Timestamp;
