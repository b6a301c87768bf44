//! The pointer pipeline.
//!
//! Hit-tests incoming pointer events, routes them to the touchable target
//! and its gestures, coordinates capture handoff with the intrinsic scroll
//! and paging gestures of ancestor components, and synthesizes the Cancel
//! that tells a component its interaction was stolen.

use std::collections::HashMap;

use smallvec::{smallvec, SmallVec};
use weft_core::{
    Axis, Binding, BindingValue, Capability, CommandSequencer, ComponentId, ComponentTree,
    HandlerKind, InteractionConfig, PointerEvent, PointerEventKind, PointerId, State,
    SwipeDirection, Timestamp,
};
use weft_foundation::{GestureContext, GestureEffect, GestureSet, VelocityTracker};
use weft_graphics::{Point, Rect, Transform2D};

use crate::pager::PagerEngine;
use crate::scroller::ScrollerEngine;

/// What a pointer event did; the runtime builds host-facing answers from it.
#[derive(Debug, Default)]
pub struct PointerOutcome {
    /// True iff a gesture consumed the event; the host must not propagate
    /// it further.
    pub consumed: bool,
    /// A component that completed a clean in-bounds release this event
    /// (press synthesis ran). Drives edit-text tap-to-focus.
    pub released_on: Option<ComponentId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum IntrinsicKind {
    Scroll,
    Page,
}

#[derive(Debug, Clone, Copy)]
struct PageDrag {
    to_page: usize,
    direction: SwipeDirection,
    forward: bool,
    progress: f32,
}

#[derive(Debug, Clone, Copy)]
enum CaptureOwner {
    /// A gesture on the touchable target itself.
    Gesture(ComponentId),
    /// An ancestor scrollable's intrinsic gesture.
    Scroll(ComponentId),
    /// An ancestor pager's intrinsic gesture.
    Page(ComponentId, PageDrag),
}

#[derive(Debug)]
struct ActivePointer {
    id: PointerId,
    /// Nearest self-or-ancestor touchable of the hit component.
    target: Option<ComponentId>,
    down_delivered: bool,
    captured: Option<CaptureOwner>,
    down_time: Timestamp,
    down_position: Point,
    last_position: Point,
    /// Scrollable/paged ancestors, nearest first.
    intrinsic: SmallVec<[(ComponentId, IntrinsicKind); 2]>,
}

/// Routes pointer events through hit-testing, gestures, and capture.
#[derive(Default)]
pub struct PointerPipeline {
    gesture_sets: HashMap<ComponentId, GestureSet>,
    velocity: VelocityTracker,
    pointer: Option<ActivePointer>,
    /// Target of the last pointer stream; TimeUpdates go here when no
    /// pointer is down (settling swipes, double-press windows).
    last_target: Option<ComponentId>,
}

impl PointerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all per-component state; used when the document is released.
    pub fn release(&mut self) {
        self.gesture_sets.clear();
        self.velocity.reset();
        self.pointer = None;
        self.last_target = None;
    }

    /// Forget state for components removed from the tree.
    pub fn forget(&mut self, removed: &[ComponentId]) {
        for id in removed {
            self.gesture_sets.remove(id);
            if self.last_target == Some(*id) {
                self.last_target = None;
            }
        }
        if let Some(pointer) = &self.pointer {
            let gone = pointer.target.is_some_and(|t| removed.contains(&t));
            if gone {
                self.pointer = None;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_event(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        scroller: &mut ScrollerEngine,
        pager: &mut PagerEngine,
        event: &PointerEvent,
        t: Timestamp,
    ) -> PointerOutcome {
        self.handle_pointer_event_with_flings(
            tree, config, sequencer, scroller, pager, event, t, &[],
        )
    }

    /// Full entry point; `flinging` lists scrollables whose animation this
    /// Down interrupted, which re-grab the stream without a slop check.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_event_with_flings(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        scroller: &mut ScrollerEngine,
        pager: &mut PagerEngine,
        event: &PointerEvent,
        t: Timestamp,
        flinging: &[ComponentId],
    ) -> PointerOutcome {
        match event.kind {
            PointerEventKind::Down => {
                self.on_down(tree, config, sequencer, event, t, flinging)
            }
            PointerEventKind::Move => {
                self.on_move(tree, config, sequencer, scroller, pager, event, t)
            }
            PointerEventKind::Up => {
                self.on_up(tree, config, sequencer, scroller, pager, event, t)
            }
            PointerEventKind::Cancel => {
                self.on_cancel(tree, config, sequencer, scroller, pager, event, t)
            }
            PointerEventKind::TimeUpdate => {
                self.on_time_update(tree, config, sequencer, event, t)
            }
            PointerEventKind::TargetChanged => {
                let target = self
                    .pointer
                    .as_ref()
                    .and_then(|p| p.target)
                    .or(self.last_target);
                if let Some(target) = target {
                    self.process_gestures(tree, config, sequencer, target, event, t);
                }
                PointerOutcome::default()
            }
        }
    }

    fn on_down(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        event: &PointerEvent,
        t: Timestamp,
        flinging: &[ComponentId],
    ) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let Some(hit) = self.hit_test(tree, event.position) else {
            self.pointer = None;
            return outcome;
        };

        self.velocity.reset();
        self.velocity.add_sample(t, event.position);

        let target = self.touchable_of(tree, hit);
        let intrinsic = self.intrinsic_chain(tree, hit);

        self.pointer = Some(ActivePointer {
            id: event.id,
            target,
            down_delivered: false,
            captured: None,
            down_time: t,
            down_position: event.position,
            last_position: event.position,
            intrinsic,
        });
        self.last_target = target;

        if let Some(target) = target {
            self.ensure_gestures(tree, target);
            let owned = self.process_gestures(tree, config, sequencer, target, event, t);
            if owned {
                if let Some(pointer) = &mut self.pointer {
                    pointer.captured = Some(CaptureOwner::Gesture(target));
                }
                outcome.consumed = true;
                return outcome;
            }
            self.deliver_handler(tree, sequencer, target, HandlerKind::Down, event.position, &mut outcome);
            if let Some(pointer) = &mut self.pointer {
                pointer.down_delivered = true;
            }
        }

        // Grabbing a settling fling: the scrollable takes the stream right
        // back, no slop or timeout required.
        let takeover = self
            .pointer
            .as_ref()
            .map(|p| p.intrinsic.clone())
            .unwrap_or_default()
            .into_iter()
            .find(|(owner, kind)| *kind == IntrinsicKind::Scroll && flinging.contains(owner));
        if let Some((owner, _)) = takeover {
            if let Some(target) = target {
                let mut ignored = PointerOutcome::default();
                self.deliver_handler(
                    tree,
                    sequencer,
                    target,
                    HandlerKind::Cancel,
                    event.position,
                    &mut ignored,
                );
                if let Some(set) = self.gesture_sets.get_mut(&target) {
                    set.reset();
                }
            }
            if let Some(pointer) = &mut self.pointer {
                pointer.captured = Some(CaptureOwner::Scroll(owner));
                pointer.down_delivered = false;
            }
            outcome.consumed = true;
        }
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn on_move(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        scroller: &mut ScrollerEngine,
        pager: &mut PagerEngine,
        event: &PointerEvent,
        t: Timestamp,
    ) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let Some(pointer) = &self.pointer else {
            return outcome;
        };
        if pointer.id != event.id {
            return outcome;
        }
        self.velocity.add_sample(t, event.position);

        if self.pointer.as_ref().is_some_and(|p| p.captured.is_some()) {
            self.route_captured_move(tree, config, sequencer, scroller, pager, event, t);
            outcome.consumed = true;
            self.set_last_position(event.position);
            return outcome;
        }

        // Local gestures have first claim.
        let target = self.pointer.as_ref().and_then(|p| p.target);
        if let Some(target) = target {
            if self.process_gestures(tree, config, sequencer, target, event, t) {
                self.capture_local(tree, target);
                outcome.consumed = true;
                self.set_last_position(event.position);
                return outcome;
            }
        }

        // Then the nearest scrollable/paged ancestor.
        if self.try_intrinsic_capture(tree, config, sequencer, scroller, pager, event, t) {
            outcome.consumed = true;
            self.set_last_position(event.position);
            return outcome;
        }

        if let Some(target) = target {
            self.deliver_handler(tree, sequencer, target, HandlerKind::Move, event.position, &mut outcome);
        }
        self.set_last_position(event.position);
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn on_up(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        scroller: &mut ScrollerEngine,
        pager: &mut PagerEngine,
        event: &PointerEvent,
        t: Timestamp,
    ) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let Some(pointer) = &self.pointer else {
            return outcome;
        };
        if pointer.id != event.id {
            return outcome;
        }
        self.velocity.add_sample(t, event.position);

        let captured = self.pointer.as_mut().and_then(|p| p.captured.take());
        match captured {
            Some(CaptureOwner::Gesture(owner)) => {
                self.process_gestures(tree, config, sequencer, owner, event, t);
                self.last_target = Some(owner);
                outcome.consumed = true;
            }
            Some(CaptureOwner::Scroll(owner)) => {
                let velocity = self.velocity.velocity(config);
                let along = self.project_on_axis(tree, owner, velocity);
                scroller.start_fling(tree, config, owner, along, t);
                outcome.consumed = true;
            }
            Some(CaptureOwner::Page(owner, drag)) => {
                let velocity = self.velocity.velocity(config);
                let unit = drag.direction.unit();
                let signed = velocity.x * unit.x + velocity.y * unit.y;
                pager.release_drag(
                    tree,
                    config,
                    owner,
                    drag.to_page,
                    drag.progress,
                    signed.max(0.0),
                    drag.direction,
                    drag.forward,
                    t,
                );
                outcome.consumed = true;
            }
            None => {
                let target = self.pointer.as_ref().and_then(|p| p.target);
                if let Some(target) = target {
                    if self.process_gestures(tree, config, sequencer, target, event, t) {
                        // The gesture owns the release; the pressed state
                        // set by the delivered Down must not linger.
                        clear_pressed(tree, target);
                        outcome.consumed = true;
                    } else {
                        self.deliver_handler(
                            tree,
                            sequencer,
                            target,
                            HandlerKind::Up,
                            event.position,
                            &mut outcome,
                        );
                    }
                }
            }
        }
        self.pointer = None;
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn on_cancel(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        scroller: &mut ScrollerEngine,
        pager: &mut PagerEngine,
        event: &PointerEvent,
        t: Timestamp,
    ) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let Some(pointer) = &self.pointer else {
            return outcome;
        };
        if pointer.id != event.id {
            return outcome;
        }

        let captured = self.pointer.as_mut().and_then(|p| p.captured.take());
        let down_delivered = self.pointer.as_ref().is_some_and(|p| p.down_delivered);
        let target = self.pointer.as_ref().and_then(|p| p.target);
        match captured {
            Some(CaptureOwner::Gesture(owner)) => {
                self.process_gestures(tree, config, sequencer, owner, event, t);
                self.last_target = Some(owner);
                outcome.consumed = true;
            }
            Some(CaptureOwner::Scroll(owner)) => {
                scroller.settle_after_cancel(tree, config, owner, t);
                outcome.consumed = true;
            }
            Some(CaptureOwner::Page(owner, drag)) => {
                pager.cancel_drag(
                    tree,
                    config,
                    owner,
                    drag.to_page,
                    drag.progress,
                    drag.direction,
                    drag.forward,
                    t,
                );
                outcome.consumed = true;
            }
            None => {
                if let Some(target) = target {
                    if down_delivered {
                        self.deliver_handler(
                            tree,
                            sequencer,
                            target,
                            HandlerKind::Cancel,
                            event.position,
                            &mut outcome,
                        );
                    }
                    if let Some(set) = self.gesture_sets.get_mut(&target) {
                        set.reset();
                    }
                }
            }
        }
        self.pointer = None;
        outcome
    }

    fn on_time_update(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        event: &PointerEvent,
        t: Timestamp,
    ) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let target = self
            .pointer
            .as_ref()
            .and_then(|p| p.target)
            .or(self.last_target);
        let Some(target) = target else {
            return outcome;
        };
        // Carry the last known position so travel checks stay meaningful.
        let position = self
            .pointer
            .as_ref()
            .map(|p| p.last_position)
            .unwrap_or(event.position);
        let tick = PointerEvent {
            position,
            ..*event
        };
        if self.process_gestures(tree, config, sequencer, target, &tick, t) {
            let uncaptured = self.pointer.as_ref().is_some_and(|p| p.captured.is_none());
            if uncaptured {
                clear_pressed(tree, target);
                if let Some(pointer) = &mut self.pointer {
                    pointer.captured = Some(CaptureOwner::Gesture(target));
                }
            }
            outcome.consumed = true;
        }
        outcome
    }

    /// Move routing while something owns the pointer.
    #[allow(clippy::too_many_arguments)]
    fn route_captured_move(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        scroller: &mut ScrollerEngine,
        pager: &mut PagerEngine,
        event: &PointerEvent,
        t: Timestamp,
    ) {
        let Some((captured, last, down)) = self
            .pointer
            .as_ref()
            .map(|p| (p.captured, p.last_position, p.down_position))
        else {
            return;
        };
        match captured {
            Some(CaptureOwner::Gesture(owner)) => {
                if !self.process_gestures(tree, config, sequencer, owner, event, t) {
                    if let Some(pointer) = &mut self.pointer {
                        pointer.captured = None;
                    }
                }
            }
            Some(CaptureOwner::Scroll(owner)) => {
                let delta = self.axis_delta(tree, owner, event.position - last);
                scroller.follow_pointer(tree, owner, delta);
            }
            Some(CaptureOwner::Page(owner, mut drag)) => {
                let travel = event.position - down;
                let unit = drag.direction.unit();
                let along = travel.x * unit.x + travel.y * unit.y;
                let extent = self.global_axis_extent(tree, owner);
                drag.progress = (along / extent).clamp(0.0, 1.0);
                pager.drag(
                    tree,
                    sequencer,
                    owner,
                    drag.to_page,
                    drag.progress,
                    drag.direction,
                    drag.forward,
                );
                if let Some(pointer) = &mut self.pointer {
                    pointer.captured = Some(CaptureOwner::Page(owner, drag));
                }
            }
            None => {}
        }
    }

    /// Evaluate the intrinsic scroll/paging trigger for the ancestor chain.
    #[allow(clippy::too_many_arguments)]
    fn try_intrinsic_capture(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        scroller: &mut ScrollerEngine,
        pager: &mut PagerEngine,
        event: &PointerEvent,
        t: Timestamp,
    ) -> bool {
        let Some(pointer) = &self.pointer else {
            return false;
        };
        if t - pointer.down_time < config.tap_or_scroll_timeout {
            return false;
        }
        let travel = event.position - pointer.down_position;
        let candidates: SmallVec<[(ComponentId, IntrinsicKind); 2]> = pointer.intrinsic.clone();
        let down_delivered = pointer.down_delivered;
        let target = pointer.target;

        for (owner, kind) in candidates {
            let axis = self.owner_axis(tree, owner);
            let along = match axis {
                Axis::Horizontal => travel.x,
                Axis::Vertical => travel.y,
            };
            if along.abs() <= config.pointer_slop_threshold {
                continue;
            }
            if !within_axis_cone(config, axis, travel) {
                continue;
            }

            // Work out what would own the stream before committing to the
            // capture; a pager whose navigation refuses the move does not
            // steal anything.
            let drag = match kind {
                IntrinsicKind::Scroll => None,
                IntrinsicKind::Page => {
                    let direction = match (axis, along > 0.0) {
                        (Axis::Horizontal, true) => SwipeDirection::Right,
                        (Axis::Horizontal, false) => SwipeDirection::Left,
                        (Axis::Vertical, true) => SwipeDirection::Down,
                        (Axis::Vertical, false) => SwipeDirection::Up,
                    };
                    match PagerEngine::gesture_target(tree, owner, direction) {
                        Some((to_page, forward)) => Some(PageDrag {
                            to_page,
                            direction,
                            forward,
                            progress: 0.0,
                        }),
                        None => continue,
                    }
                }
            };

            // Exactly one synthetic Cancel to whoever saw the Down.
            if down_delivered {
                if let Some(target) = target {
                    log::debug!("capture by {owner:?}; cancelling {target:?}");
                    let mut ignored = PointerOutcome::default();
                    self.deliver_handler(
                        tree,
                        sequencer,
                        target,
                        HandlerKind::Cancel,
                        event.position,
                        &mut ignored,
                    );
                }
            }
            if let Some(target) = target {
                if let Some(set) = self.gesture_sets.get_mut(&target) {
                    set.reset();
                }
            }

            // Apply the accumulated movement immediately and take capture.
            let captured = match drag {
                None => {
                    scroller.cancel(owner);
                    let along = self.axis_delta(tree, owner, travel);
                    scroller.follow_pointer(tree, owner, along);
                    CaptureOwner::Scroll(owner)
                }
                Some(mut drag) => {
                    pager.cancel(owner);
                    let unit = drag.direction.unit();
                    let along = travel.x * unit.x + travel.y * unit.y;
                    let extent = self.global_axis_extent(tree, owner);
                    drag.progress = (along / extent).clamp(0.0, 1.0);
                    pager.drag(
                        tree,
                        sequencer,
                        owner,
                        drag.to_page,
                        drag.progress,
                        drag.direction,
                        drag.forward,
                    );
                    CaptureOwner::Page(owner, drag)
                }
            };

            if let Some(pointer) = &mut self.pointer {
                pointer.captured = Some(captured);
                pointer.down_delivered = false;
            }
            return true;
        }
        false
    }

    /// The deepest visible, enabled component under `position`.
    fn hit_test(&self, tree: &ComponentTree, position: Point) -> Option<ComponentId> {
        let root = tree.root()?;
        self.hit_component(tree, root, position)
    }

    fn hit_component(
        &self,
        tree: &ComponentTree,
        id: ComponentId,
        position: Point,
    ) -> Option<ComponentId> {
        let component = tree.get(id)?;
        if !component.display || component.opacity <= 0.0 {
            return None;
        }
        let Some(local) = tree.viewport_to_local(id, position) else {
            log::warn!("degenerate transform on {id:?}; hit-testing reports no target");
            return None;
        };
        let bounds = Rect::new(0.0, 0.0, component.bounds.width, component.bounds.height);
        if !bounds.contains(local) {
            return None;
        }

        // A disabled component still occludes: it becomes the target and the
        // event is rejected, rather than falling through to an enabled
        // ancestor's handlers.
        if component.is_disabled() {
            return Some(id);
        }

        // Later siblings draw on top; pagers only show the current page.
        if let Some(pager) = &component.pager {
            let child = tree.children(id).get(pager.current_page).copied();
            if let Some(child) = child {
                if let Some(hit) = self.hit_component(tree, child, position) {
                    return Some(hit);
                }
            }
            return Some(id);
        }
        for child in tree.children(id).iter().rev() {
            if let Some(hit) = self.hit_component(tree, *child, position) {
                return Some(hit);
            }
        }
        Some(id)
    }

    fn touchable_of(&self, tree: &ComponentTree, id: ComponentId) -> Option<ComponentId> {
        let component = tree.get(id)?;
        // A disabled hit is the target; the walk must not hand the stream
        // to an enabled touchable above it.
        if component.is_disabled() || component.is(Capability::Touchable) {
            return Some(id);
        }
        tree.nearest_ancestor_with(id, Capability::Touchable)
    }

    fn intrinsic_chain(
        &self,
        tree: &ComponentTree,
        id: ComponentId,
    ) -> SmallVec<[(ComponentId, IntrinsicKind); 2]> {
        let mut chain = SmallVec::new();
        let mut current = Some(id);
        while let Some(component_id) = current {
            if let Some(component) = tree.get(component_id) {
                if component.is(Capability::Scrollable) {
                    chain.push((component_id, IntrinsicKind::Scroll));
                } else if component.is(Capability::Paged) {
                    chain.push((component_id, IntrinsicKind::Page));
                }
            }
            current = tree.parent(component_id);
        }
        chain
    }

    fn ensure_gestures(&mut self, tree: &ComponentTree, id: ComponentId) {
        if self.gesture_sets.contains_key(&id) {
            return;
        }
        let descriptors = tree
            .get(id)
            .and_then(|c| c.touchable.as_ref())
            .map(|t| t.gestures.clone())
            .unwrap_or_default();
        self.gesture_sets
            .insert(id, GestureSet::from_descriptors(&descriptors));
    }

    /// Run the component's gesture set and interpret the emitted effects.
    fn process_gestures(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        sequencer: &mut CommandSequencer,
        id: ComponentId,
        event: &PointerEvent,
        t: Timestamp,
    ) -> bool {
        let Some(component) = tree.get(id) else {
            return false;
        };
        if component.is_disabled() {
            return false;
        }
        self.ensure_gestures(tree, id);
        let global_to_local = tree
            .global_transform(id)
            .invert()
            .unwrap_or(Transform2D::IDENTITY)
            .about_origin();
        let ctx = GestureContext {
            config,
            global_to_local,
            width: component.bounds.width,
            height: component.bounds.height,
            velocity: self.velocity.raw_velocity(config),
        };

        let mut effects = Vec::new();
        let owned = {
            let Some(set) = self.gesture_sets.get_mut(&id) else {
                return false;
            };
            set.process(event, t, &ctx, &mut effects)
        };

        for effect in effects {
            match effect {
                GestureEffect::Fire {
                    handler,
                    commands,
                    mode,
                    bindings,
                } => {
                    sequencer.submit(weft_core::PendingBatch {
                        source: id,
                        handler,
                        commands,
                        mode,
                        bindings,
                    });
                }
                GestureEffect::PassThrough { as_kind } => {
                    let kind = as_kind.or_else(|| handler_kind_for(event.kind));
                    if let Some(kind) = kind {
                        let mut ignored = PointerOutcome::default();
                        self.deliver_handler(
                            tree,
                            sequencer,
                            id,
                            kind,
                            event.position,
                            &mut ignored,
                        );
                    }
                }
                GestureEffect::SyntheticCancel => {
                    let mut ignored = PointerOutcome::default();
                    self.deliver_handler(
                        tree,
                        sequencer,
                        id,
                        HandlerKind::Cancel,
                        event.position,
                        &mut ignored,
                    );
                }
                GestureEffect::SwipeOffset { progress } => {
                    if let Some(touchable) = tree.get_mut(id).and_then(|c| c.touchable.as_mut()) {
                        touchable.swipe_position = progress;
                    }
                }
            }
        }
        owned
    }

    fn capture_local(&mut self, tree: &mut ComponentTree, target: ComponentId) {
        // Capture by the target's own gesture never synthesizes a Cancel,
        // but the pressed state must not linger.
        clear_pressed(tree, target);
        if let Some(pointer) = &mut self.pointer {
            pointer.captured = Some(CaptureOwner::Gesture(target));
        }
    }

    /// Deliver one author handler with the standard pre/post actions.
    fn deliver_handler(
        &mut self,
        tree: &mut ComponentTree,
        sequencer: &mut CommandSequencer,
        id: ComponentId,
        kind: HandlerKind,
        position: Point,
        outcome: &mut PointerOutcome,
    ) {
        let Some(component) = tree.get(id) else {
            return;
        };
        if component.is_disabled() {
            return;
        }
        let width = component.bounds.width;
        let height = component.bounds.height;
        let local = tree.viewport_to_local(id, position).unwrap_or(Point::ZERO);
        let in_bounds = Rect::new(0.0, 0.0, width, height).contains(local);

        // Pressed-state dance around the handler.
        if let Some(component) = tree.get_mut(id) {
            match kind {
                HandlerKind::Down => component.states.set(State::Pressed, true),
                HandlerKind::Up | HandlerKind::Cancel | HandlerKind::Press => {
                    component.states.set(State::Pressed, false)
                }
                HandlerKind::Move => {}
            }
        }

        let mut bindings: SmallVec<[Binding; 4]> = smallvec![
            ("x", BindingValue::Number(local.x)),
            ("y", BindingValue::Number(local.y)),
            ("width", BindingValue::Number(width)),
            ("height", BindingValue::Number(height)),
        ];
        if matches!(kind, HandlerKind::Move | HandlerKind::Up) {
            bindings.push(("inBounds", BindingValue::Bool(in_bounds)));
        }

        let batch = tree
            .get(id)
            .and_then(|c| c.touchable.as_ref())
            .and_then(|touchable| touchable.handler(kind))
            .cloned();
        if let Some(commands) = batch {
            sequencer.submit_handler(id, kind, commands, bindings);
        }

        // Press synthesis: only on an in-bounds Up with nobody capturing.
        if kind == HandlerKind::Up && in_bounds {
            outcome.released_on = Some(id);
            self.deliver_handler(tree, sequencer, id, HandlerKind::Press, position, outcome);
        }
    }

    fn set_last_position(&mut self, position: Point) {
        if let Some(pointer) = &mut self.pointer {
            pointer.last_position = position;
        }
    }

    fn owner_axis(&self, tree: &ComponentTree, id: ComponentId) -> Axis {
        let Some(component) = tree.get(id) else {
            return Axis::Vertical;
        };
        component
            .scrollable
            .as_ref()
            .map(|p| p.axis)
            .or_else(|| component.pager.as_ref().map(|p| p.axis))
            .unwrap_or(Axis::Vertical)
    }

    /// Component of a vector along the owner's axis, in global coordinates.
    fn project_on_axis(&self, tree: &ComponentTree, id: ComponentId, vector: Point) -> f32 {
        match self.owner_axis(tree, id) {
            Axis::Horizontal => vector.x,
            Axis::Vertical => vector.y,
        }
    }

    fn axis_delta(&self, tree: &ComponentTree, id: ComponentId, delta: Point) -> f32 {
        self.project_on_axis(tree, id, delta)
    }

    /// The pager's viewport extent in global units.
    fn global_axis_extent(&self, tree: &ComponentTree, id: ComponentId) -> f32 {
        let axis = self.owner_axis(tree, id);
        let local = tree
            .get(id)
            .map(|c| c.axis_extent(axis))
            .unwrap_or(1.0)
            .max(1.0);
        local * tree.global_axis_scale(id, axis)
    }

    /// Enter-key activation of the focused touchable: key-down shows the
    /// pressed state, key-up clears it and runs the Press batch.
    pub(crate) fn press_via_key(
        &mut self,
        tree: &mut ComponentTree,
        sequencer: &mut CommandSequencer,
        id: ComponentId,
        key_down: bool,
    ) {
        if key_down {
            if let Some(component) = tree.get_mut(id) {
                if !component.is_disabled() {
                    component.states.set(State::Pressed, true);
                }
            }
            return;
        }
        let center = tree.global_bounds(id).center();
        let mut ignored = PointerOutcome::default();
        self.deliver_handler(tree, sequencer, id, HandlerKind::Press, center, &mut ignored);
    }

    /// Where the runtime should aim its synthetic TimeUpdate events.
    pub fn time_update_target(&self) -> Option<ComponentId> {
        self.pointer
            .as_ref()
            .and_then(|p| p.target)
            .or(self.last_target)
    }

    pub fn last_known_position(&self) -> Option<Point> {
        self.pointer.as_ref().map(|p| p.last_position)
    }
}

fn clear_pressed(tree: &mut ComponentTree, id: ComponentId) {
    if let Some(component) = tree.get_mut(id) {
        component.states.set(State::Pressed, false);
    }
}

/// True when the motion vector lies in the axis cone: vertical scrolling
/// wants motion steeper than the vertical slope, horizontal wants it
/// shallower than the horizontal slope.
fn within_axis_cone(config: &InteractionConfig, axis: Axis, travel: Point) -> bool {
    let dx = travel.x.abs();
    let dy = travel.y.abs();
    match axis {
        Axis::Vertical => dx == 0.0 || dy >= config.scroll_angle_slope_vertical * dx,
        Axis::Horizontal => dy <= config.scroll_angle_slope_horizontal * dx,
    }
}

/// Which handler slot a raw pointer event maps to.
fn handler_kind_for(kind: PointerEventKind) -> Option<HandlerKind> {
    match kind {
        PointerEventKind::Down => Some(HandlerKind::Down),
        PointerEventKind::Move => Some(HandlerKind::Move),
        PointerEventKind::Up => Some(HandlerKind::Up),
        PointerEventKind::Cancel => Some(HandlerKind::Cancel),
        PointerEventKind::TimeUpdate | PointerEventKind::TargetChanged => None,
    }
}
