//! The Weft interaction engine.
//!
//! Everything the host talks to lives here: the [`InteractionRuntime`] facade
//! with its four entry points (`handle_pointer_event`, `handle_key`,
//! `update_time`, `clear_pending`), the pointer pipeline with capture
//! handoff, the scroll and page drivers, and the focus manager.
//!
//! The engine is single-threaded and host-clocked: no internal timers, no
//! callbacks, no background work. Time only advances when the host says so.

mod focus;
mod key_event;
mod pager;
mod pointer;
mod runtime;
mod scroller;

pub use focus::FocusManager;
pub use key_event::{Key, KeyCode, KeyEventType};
pub use pager::PagerEngine;
pub use pointer::{PointerOutcome, PointerPipeline};
pub use runtime::InteractionRuntime;
pub use scroller::ScrollerEngine;
