//! Per-touchable gesture state machines.
//!
//! Each touchable owns an ordered list of gestures built from its author
//! descriptors. Pointer events are offered to the list in declaration order;
//! the first gesture that reaches `Triggered` becomes the component's active
//! gesture and the rest are reset. Gestures never touch the tree or the
//! sequencer themselves: they emit [`GestureEffect`]s that the pointer
//! pipeline interprets.

mod double_press;
mod long_press;
mod swipe_away;
mod tap;

pub use double_press::DoublePressGesture;
pub use long_press::LongPressGesture;
pub use swipe_away::SwipeAwayGesture;
pub use tap::TapGesture;

use smallvec::SmallVec;
use weft_core::{
    Binding, CommandBatch, GestureDescriptor, HandlerKind, InteractionConfig, PointerEvent,
    PointerEventKind, SequencerMode, Timestamp,
};
use weft_graphics::{Point, Transform2D};

/// Side effects a gesture asks the pipeline to perform.
#[derive(Clone, Debug)]
pub enum GestureEffect {
    /// Submit a gesture callback batch to the sequencer.
    Fire {
        handler: &'static str,
        commands: CommandBatch,
        mode: SequencerMode,
        bindings: SmallVec<[Binding; 4]>,
    },
    /// Deliver the current pointer event to the owning component's ordinary
    /// handlers, optionally remapped to a different handler slot.
    PassThrough { as_kind: Option<HandlerKind> },
    /// Deliver a synthetic Cancel to the owning component's handlers.
    SyntheticCancel,
    /// The owning component's swipe offset changed; the view host reads the
    /// new progress through the touchable's visual state.
    SwipeOffset { progress: f32 },
}

pub type Effects = Vec<GestureEffect>;

/// Read-only context the pipeline supplies with each event.
pub struct GestureContext<'a> {
    pub config: &'a InteractionConfig,
    /// Viewport-to-local transform of the owning component, translation
    /// removed; used to project motion vectors onto local axes.
    pub global_to_local: Transform2D,
    /// Local extents of the owning component.
    pub width: f32,
    pub height: f32,
    /// Tracked pointer velocity in global px/s.
    pub velocity: Point,
}

impl GestureContext<'_> {
    /// Motion vector mapped into the component's local frame.
    pub fn to_local_vector(&self, vector: Point) -> Point {
        self.global_to_local.apply_vector(vector)
    }
}

/// Shared started/triggered pair every machine carries.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GestureFlags {
    pub started: bool,
    pub triggered: bool,
}

impl GestureFlags {
    pub fn reset(&mut self) {
        self.started = false;
        self.triggered = false;
    }
}

/// A gesture recognizer attached to one touchable.
#[derive(Debug)]
pub enum Gesture {
    Tap(TapGesture),
    LongPress(LongPressGesture),
    DoublePress(DoublePressGesture),
    SwipeAway(SwipeAwayGesture),
}

impl Gesture {
    pub fn from_descriptor(descriptor: &GestureDescriptor) -> Gesture {
        match descriptor {
            GestureDescriptor::Tap(params) => Gesture::Tap(TapGesture::new(params.clone())),
            GestureDescriptor::LongPress(params) => {
                Gesture::LongPress(LongPressGesture::new(params.clone()))
            }
            GestureDescriptor::DoublePress(params) => {
                Gesture::DoublePress(DoublePressGesture::new(params.clone()))
            }
            GestureDescriptor::SwipeAway(params) => {
                Gesture::SwipeAway(SwipeAwayGesture::new(params.clone()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Gesture::Tap(_) => "Tap",
            Gesture::LongPress(_) => "LongPress",
            Gesture::DoublePress(_) => "DoublePress",
            Gesture::SwipeAway(_) => "SwipeAway",
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.flags().triggered
    }

    pub fn reset(&mut self) {
        match self {
            Gesture::Tap(g) => g.reset(),
            Gesture::LongPress(g) => g.reset(),
            Gesture::DoublePress(g) => g.reset(),
            Gesture::SwipeAway(g) => g.reset(),
        }
    }

    fn flags(&self) -> GestureFlags {
        match self {
            Gesture::Tap(g) => g.flags,
            Gesture::LongPress(g) => g.flags,
            Gesture::DoublePress(g) => g.flags,
            Gesture::SwipeAway(g) => g.flags,
        }
    }

    /// Advance the machine with one event. Returns true while the gesture is
    /// triggered (owns the pointer stream).
    pub fn consume(
        &mut self,
        event: &PointerEvent,
        t: Timestamp,
        ctx: &GestureContext,
        effects: &mut Effects,
    ) -> bool {
        let started = self.flags().started;
        match event.kind {
            PointerEventKind::Down => {
                self.on_down(event, t, ctx, effects);
            }
            PointerEventKind::Move => {
                if started {
                    self.on_move(event, t, ctx, effects);
                }
            }
            PointerEventKind::TimeUpdate => {
                if started {
                    self.on_time_update(event, t, ctx, effects);
                }
            }
            PointerEventKind::Up => {
                if started {
                    self.on_up(event, t, ctx, effects);
                }
            }
            PointerEventKind::TargetChanged => {
                if self.is_triggered() {
                    self.reset();
                }
            }
            PointerEventKind::Cancel => {
                if self.is_triggered() {
                    self.on_cancel(event, t, ctx, effects);
                }
            }
        }
        self.is_triggered()
    }

    fn on_down(&mut self, event: &PointerEvent, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        match self {
            Gesture::Tap(g) => g.on_down(event, t),
            Gesture::LongPress(g) => g.on_down(event, t),
            Gesture::DoublePress(g) => g.on_down(event, t, effects),
            Gesture::SwipeAway(g) => g.on_down(event, t, ctx),
        }
    }

    fn on_move(&mut self, event: &PointerEvent, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        match self {
            Gesture::Tap(g) => g.on_move(event, ctx),
            Gesture::LongPress(g) => g.on_move(event, ctx),
            Gesture::DoublePress(_) => {}
            Gesture::SwipeAway(g) => g.on_move(event, t, ctx, effects),
        }
    }

    fn on_time_update(&mut self, event: &PointerEvent, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        match self {
            Gesture::Tap(_) => {}
            Gesture::LongPress(g) => g.on_time_update(event, t, ctx, effects),
            Gesture::DoublePress(g) => g.on_time_update(t, ctx, effects),
            Gesture::SwipeAway(g) => g.on_time_update(t, effects),
        }
    }

    fn on_up(&mut self, event: &PointerEvent, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        match self {
            Gesture::Tap(g) => g.on_up(event, t, ctx, effects),
            Gesture::LongPress(g) => g.on_up(effects),
            Gesture::DoublePress(g) => g.on_up(event, t, ctx, effects),
            Gesture::SwipeAway(g) => g.on_up(event, t, ctx, effects),
        }
    }

    fn on_cancel(&mut self, _event: &PointerEvent, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        match self {
            Gesture::Tap(g) => g.reset(),
            Gesture::LongPress(g) => g.on_cancel(effects),
            Gesture::DoublePress(g) => g.reset(),
            Gesture::SwipeAway(g) => g.on_cancel(t, ctx, effects),
        }
    }
}

/// The ordered gesture list of one touchable plus its active slot.
#[derive(Debug, Default)]
pub struct GestureSet {
    gestures: SmallVec<[Gesture; 2]>,
    active: Option<usize>,
}

impl GestureSet {
    pub fn from_descriptors(descriptors: &[GestureDescriptor]) -> Self {
        Self {
            gestures: descriptors.iter().map(Gesture::from_descriptor).collect(),
            active: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn active_kind(&self) -> Option<&'static str> {
        self.active.map(|index| self.gestures[index].kind())
    }

    pub fn has_triggered(&self) -> bool {
        self.active
            .is_some_and(|index| self.gestures[index].is_triggered())
    }

    /// Offer an event to the set. Returns true when a triggered gesture owns
    /// the pointer stream for this event.
    pub fn process(
        &mut self,
        event: &PointerEvent,
        t: Timestamp,
        ctx: &GestureContext,
        effects: &mut Effects,
    ) -> bool {
        if let Some(index) = self.active {
            if self.gestures[index].is_triggered() {
                if !self.gestures[index].consume(event, t, ctx, effects) {
                    // Consumed but reset afterwards.
                    self.active = None;
                }
                return true;
            }
            self.active = None;
            return false;
        }

        for index in 0..self.gestures.len() {
            if self.gestures[index].consume(event, t, ctx, effects) {
                log::debug!("gesture {} triggered", self.gestures[index].kind());
                self.active = Some(index);
                for (other, gesture) in self.gestures.iter_mut().enumerate() {
                    if other != index {
                        gesture.reset();
                    }
                }
                return true;
            }
        }
        false
    }

    /// Reset every machine; used on release and target changes.
    pub fn reset(&mut self) {
        for gesture in &mut self.gestures {
            gesture.reset();
        }
        self.active = None;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn context(config: &InteractionConfig) -> GestureContext<'_> {
        GestureContext {
            config,
            global_to_local: Transform2D::IDENTITY,
            width: 100.0,
            height: 100.0,
            velocity: Point::ZERO,
        }
    }

    pub fn fired<'a>(effects: &'a Effects, handler: &str) -> Option<&'a GestureEffect> {
        effects.iter().find(|effect| {
            matches!(effect, GestureEffect::Fire { handler: name, .. } if *name == handler)
        })
    }
}
