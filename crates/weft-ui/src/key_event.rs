//! Keyboard input types.
//!
//! Platform-independent key events routed to the focus manager and to the
//! focused component's press handling.

use weft_core::FocusDirection;

/// Type of keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
}

/// Canonical key identifiers the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Enter,
    NumpadEnter,
    MediaPlayPause,
    /// Anything the engine does not handle itself.
    Other,
}

impl KeyCode {
    /// Resolve a canonical key name from the wire contract.
    pub fn from_name(name: &str) -> KeyCode {
        match name {
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "Tab" => KeyCode::Tab,
            "Enter" => KeyCode::Enter,
            "NumpadEnter" => KeyCode::NumpadEnter,
            "MediaPlayPause" => KeyCode::MediaPlayPause,
            _ => KeyCode::Other,
        }
    }
}

/// A key record: canonical code plus the shift modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub shift: bool,
}

impl Key {
    pub fn new(code: KeyCode) -> Self {
        Self { code, shift: false }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// The focus move this key requests, if any.
    pub fn focus_direction(&self) -> Option<FocusDirection> {
        match self.code {
            KeyCode::ArrowUp => Some(FocusDirection::Up),
            KeyCode::ArrowDown => Some(FocusDirection::Down),
            KeyCode::ArrowLeft => Some(FocusDirection::Left),
            KeyCode::ArrowRight => Some(FocusDirection::Right),
            KeyCode::Tab if self.shift => Some(FocusDirection::Backward),
            KeyCode::Tab => Some(FocusDirection::Forward),
            _ => None,
        }
    }

    /// True for keys that activate the focused component.
    pub fn is_press_key(&self) -> bool {
        matches!(self.code, KeyCode::Enter | KeyCode::NumpadEnter)
    }
}
