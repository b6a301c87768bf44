//! Wire-level event types: pointer events from the host, and the events the
//! core publishes back.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use weft_graphics::{Point, Rect};

use crate::tree::ComponentId;

pub type PointerId = u64;

/// What kind of pointer produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
    /// Clock tick routed to the active pointer target; carries the last
    /// known position.
    TimeUpdate,
    /// The pointer moved onto a different component without being released.
    TargetChanged,
}

/// Immutable pointer record delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Position in viewport coordinates.
    pub position: Point,
    pub id: PointerId,
    pub pointer_kind: PointerKind,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            id: 0,
            pointer_kind: PointerKind::Touch,
        }
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_pointer_kind(mut self, pointer_kind: PointerKind) -> Self {
        self.pointer_kind = pointer_kind;
        self
    }
}

/// The five author handler slots on a touchable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Down,
    Move,
    Up,
    Cancel,
    Press,
}

impl HandlerKind {
    pub fn name(&self) -> &'static str {
        match self {
            HandlerKind::Down => "Down",
            HandlerKind::Move => "Move",
            HandlerKind::Up => "Up",
            HandlerKind::Cancel => "Cancel",
            HandlerKind::Press => "Press",
        }
    }

    /// Press resets the sequencer and runs in normal mode; everything else
    /// runs fast, parallel to ongoing normal-mode work.
    pub fn executes_fast(&self) -> bool {
        !matches!(self, HandlerKind::Press)
    }
}

/// Direction of a focus move or a swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Backward,
}

/// Principal direction of a swipe or page gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, SwipeDirection::Left | SwipeDirection::Right)
    }

    pub fn opposite(&self) -> SwipeDirection {
        match self {
            SwipeDirection::Left => SwipeDirection::Right,
            SwipeDirection::Right => SwipeDirection::Left,
            SwipeDirection::Up => SwipeDirection::Down,
            SwipeDirection::Down => SwipeDirection::Up,
        }
    }

    /// Unit vector in viewport coordinates.
    pub fn unit(&self) -> Point {
        match self {
            SwipeDirection::Left => Point::new(-1.0, 0.0),
            SwipeDirection::Right => Point::new(1.0, 0.0),
            SwipeDirection::Up => Point::new(0.0, -1.0),
            SwipeDirection::Down => Point::new(0.0, 1.0),
        }
    }
}

/// State of a focus-release action slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionState {
    Pending,
    Resolved(bool),
    Terminated,
}

/// A oneshot slot the host writes into to answer a focus-release question.
///
/// The focus manager polls the slot on later pumps; competing input flips it
/// to `Terminated`, which the host observes on its next resolve attempt.
#[derive(Clone)]
pub struct ActionRef {
    state: Rc<Cell<ActionState>>,
}

impl ActionRef {
    pub fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(ActionState::Pending)),
        }
    }

    pub fn state(&self) -> ActionState {
        self.state.get()
    }

    /// Host-side answer. Returns false if the action was already terminated
    /// by competing input.
    pub fn resolve(&self, release: bool) -> bool {
        match self.state.get() {
            ActionState::Pending => {
                self.state.set(ActionState::Resolved(release));
                true
            }
            _ => false,
        }
    }

    pub fn terminate(&self) {
        if self.state.get() == ActionState::Pending {
            self.state.set(ActionState::Terminated);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.get() == ActionState::Pending
    }
}

impl Default for ActionRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionRef").field(&self.state.get()).finish()
    }
}

/// Events the core publishes for the host to act on.
#[derive(Clone, Debug)]
pub enum HostEvent {
    /// Focus moved, cleared, or wants to leave the document. A `None`
    /// component with an action ref is a release question; a `None`
    /// component without one reports focus lost to a tree mutation.
    Focus {
        component: Option<ComponentId>,
        bounds: Option<Rect>,
        direction: Option<FocusDirection>,
        action: Option<ActionRef>,
    },
    /// An edit-text gained focus through a tap and wants the soft keyboard.
    OpenKeyboard { component: ComponentId },
    /// A commanded scroll the host may want to mirror (e.g. scrollbars).
    ScrollTo {
        component: ComponentId,
        position: Point,
    },
    /// Author-defined payload from a `SendEvent` command.
    SendEvent {
        source: ComponentId,
        arguments: Vec<String>,
    },
    /// A pager committed a new page.
    PageChanged {
        component: ComponentId,
        page: usize,
    },
}
