//! Component records and their state/capability sets.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use smallvec::SmallVec;
use weft_graphics::{Point, Rect, Transform2D};

use crate::command::CommandBatch;
use crate::descriptor::GestureDescriptor;
use crate::events::{FocusDirection, HandlerKind};

/// Per-component state bits.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Focused = 0,
    Pressed = 1,
    Disabled = 2,
    Checked = 3,
    Karaoke = 4,
    Hover = 5,
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSet(u8);

impl StateSet {
    pub const EMPTY: StateSet = StateSet(0);

    pub fn contains(&self, state: State) -> bool {
        (self.0 & (1 << state as u8)) != 0
    }

    pub fn set(&mut self, state: State, value: bool) {
        if value {
            self.0 |= 1 << state as u8;
        } else {
            self.0 &= !(1 << state as u8);
        }
    }

    pub fn with(mut self, state: State) -> Self {
        self.set(state, true);
        self
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for state in [
            State::Focused,
            State::Pressed,
            State::Disabled,
            State::Checked,
            State::Karaoke,
            State::Hover,
        ] {
            if self.contains(state) {
                set.entry(&state);
            }
        }
        set.finish()
    }
}

/// What a component can do.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Focusable = 0,
    Touchable = 1,
    Scrollable = 2,
    Paged = 3,
    EditText = 4,
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub fn of(capability: Capability) -> Self {
        CapabilitySet(1 << capability as u8)
    }

    pub fn contains(&self, capability: Capability) -> bool {
        (self.0 & (1 << capability as u8)) != 0
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= 1 << capability as u8;
    }
}

impl BitOr for CapabilitySet {
    type Output = CapabilitySet;

    fn bitor(self, rhs: CapabilitySet) -> CapabilitySet {
        CapabilitySet(self.0 | rhs.0)
    }
}

impl BitOrAssign for CapabilitySet {
    fn bitor_assign(&mut self, rhs: CapabilitySet) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for capability in [
            Capability::Focusable,
            Capability::Touchable,
            Capability::Scrollable,
            Capability::Paged,
            Capability::EditText,
        ] {
            if self.contains(capability) {
                set.entry(&capability);
            }
        }
        set.finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutDirection {
    Ltr,
    Rtl,
}

/// Post-fling alignment policy for scrollables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapPolicy {
    None,
    Start,
    Center,
    End,
    ForceStart,
    ForceCenter,
    ForceEnd,
}

impl SnapPolicy {
    pub fn is_forced(&self) -> bool {
        matches!(
            self,
            SnapPolicy::ForceStart | SnapPolicy::ForceCenter | SnapPolicy::ForceEnd
        )
    }
}

/// Which page transitions a pager permits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerNavigation {
    /// Clamp at both ends.
    Normal,
    /// Last page advances to the first and vice versa.
    Wrap,
    /// No gesture navigation; programmatic commands still work.
    None,
    /// Gestures may only advance.
    ForwardOnly,
}

/// Scroll state and policy carried by scrollable components.
#[derive(Clone, Debug)]
pub struct ScrollableProps {
    pub axis: Axis,
    /// Current scroll offset; only the axis coordinate is meaningful.
    pub position: Point,
    /// Total content length along the axis.
    pub content_extent: f32,
    pub snap: SnapPolicy,
    pub direction: LayoutDirection,
    /// Author commands run when a commanded scroll finishes.
    pub on_scroll: Option<CommandBatch>,
}

impl ScrollableProps {
    pub fn new(axis: Axis, content_extent: f32) -> Self {
        Self {
            axis,
            position: Point::ZERO,
            content_extent,
            snap: SnapPolicy::None,
            direction: LayoutDirection::Ltr,
            on_scroll: None,
        }
    }

    pub fn offset(&self) -> f32 {
        match self.axis {
            Axis::Horizontal => self.position.x,
            Axis::Vertical => self.position.y,
        }
    }

    pub fn set_offset(&mut self, offset: f32) {
        match self.axis {
            Axis::Horizontal => self.position.x = offset,
            Axis::Vertical => self.position.y = offset,
        }
    }

    /// Largest legal offset for the given viewport extent.
    pub fn max_offset(&self, viewport_extent: f32) -> f32 {
        (self.content_extent - viewport_extent).max(0.0)
    }
}

/// Page state and policy carried by paged components.
#[derive(Clone, Debug)]
pub struct PagerProps {
    pub axis: Axis,
    pub current_page: usize,
    pub navigation: PagerNavigation,
    pub direction: LayoutDirection,
    /// Author hook run on every transition tick with the bound page-move
    /// variables; absent means the default translate behavior.
    pub page_move: Option<CommandBatch>,
}

impl PagerProps {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            current_page: 0,
            navigation: PagerNavigation::Normal,
            direction: LayoutDirection::Ltr,
            page_move: None,
        }
    }
}

/// Handler batches and gesture descriptors carried by touchables.
#[derive(Clone, Debug, Default)]
pub struct TouchableProps {
    handlers: [Option<CommandBatch>; 5],
    pub gestures: SmallVec<[GestureDescriptor; 2]>,
    /// Visual swipe progress in `[0, 1]`, written by an active SwipeAway;
    /// the view host reads it to place the content and reveal item.
    pub swipe_position: f32,
}

impl TouchableProps {
    pub fn handler(&self, kind: HandlerKind) -> Option<&CommandBatch> {
        self.handlers[Self::slot(kind)].as_ref()
    }

    pub fn set_handler(&mut self, kind: HandlerKind, batch: CommandBatch) {
        self.handlers[Self::slot(kind)] = Some(batch);
    }

    fn slot(kind: HandlerKind) -> usize {
        match kind {
            HandlerKind::Down => 0,
            HandlerKind::Move => 1,
            HandlerKind::Up => 2,
            HandlerKind::Cancel => 3,
            HandlerKind::Press => 4,
        }
    }
}

/// Static focus overrides; an entry short-circuits the geometric algorithm
/// for that direction.
#[derive(Clone, Debug, Default)]
pub struct FocusProps {
    overrides: SmallVec<[(FocusDirection, String); 2]>,
}

impl FocusProps {
    pub fn set_override(&mut self, direction: FocusDirection, target: impl Into<String>) {
        let target = target.into();
        if let Some(entry) = self.overrides.iter_mut().find(|(d, _)| *d == direction) {
            entry.1 = target;
        } else {
            self.overrides.push((direction, target));
        }
    }

    pub fn override_for(&self, direction: FocusDirection) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, name)| name.as_str())
    }
}

/// A node in the document tree.
///
/// The tree is abstract as far as this workspace is concerned: layout has
/// already assigned bounds, and rendering is someone else's job. The
/// interaction engines only read geometry and flip state bits.
#[derive(Clone, Debug)]
pub struct Component {
    /// Author-assigned identifier, if any.
    pub name: Option<String>,
    /// Bounds in the parent's coordinate space.
    pub bounds: Rect,
    /// Transform relative to the parent, applied about the component center.
    pub transform: Transform2D,
    /// False models `display: none`.
    pub display: bool,
    pub opacity: f32,
    pub states: StateSet,
    pub capabilities: CapabilitySet,
    pub touchable: Option<TouchableProps>,
    pub scrollable: Option<ScrollableProps>,
    pub pager: Option<PagerProps>,
    pub focus: FocusProps,
}

impl Component {
    pub fn new(bounds: Rect) -> Self {
        Self {
            name: None,
            bounds,
            transform: Transform2D::IDENTITY,
            display: true,
            opacity: 1.0,
            states: StateSet::EMPTY,
            capabilities: CapabilitySet::EMPTY,
            touchable: None,
            scrollable: None,
            pager: None,
            focus: FocusProps::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn focusable(mut self) -> Self {
        self.capabilities.insert(Capability::Focusable);
        self
    }

    pub fn touchable(mut self, props: TouchableProps) -> Self {
        self.capabilities.insert(Capability::Touchable);
        self.touchable = Some(props);
        self
    }

    pub fn scrollable(mut self, props: ScrollableProps) -> Self {
        self.capabilities.insert(Capability::Scrollable);
        self.scrollable = Some(props);
        self
    }

    pub fn paged(mut self, props: PagerProps) -> Self {
        self.capabilities.insert(Capability::Paged);
        self.pager = Some(props);
        self
    }

    pub fn edit_text(mut self) -> Self {
        self.capabilities.insert(Capability::EditText);
        self
    }

    pub fn is(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is_disabled(&self) -> bool {
        self.states.contains(State::Disabled)
    }

    /// The component's transform applied about its center, as it composes
    /// into the parent's coordinate space.
    pub fn local_transform(&self) -> Transform2D {
        if self.transform.is_identity() {
            return Transform2D::translate(self.bounds.x, self.bounds.y);
        }
        let cx = self.bounds.width / 2.0;
        let cy = self.bounds.height / 2.0;
        Transform2D::translate(self.bounds.x, self.bounds.y)
            .then(&Transform2D::translate(cx, cy))
            .then(&self.transform)
            .then(&Transform2D::translate(-cx, -cy))
    }

    /// Viewport extent along the scroll or page axis.
    pub fn axis_extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.bounds.width,
            Axis::Vertical => self.bounds.height,
        }
    }
}
