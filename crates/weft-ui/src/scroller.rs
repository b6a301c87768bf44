//! The scroll driver.
//!
//! Owns every scrollable's in-flight animation: pointer-following happens
//! synchronously, while flings, commanded scrolls, and snap settling are
//! value-functions of the host clock evaluated on each `update_time`.

use std::collections::HashMap;
use std::collections::VecDeque;

use smallvec::smallvec;
use weft_animation::{AnimationPlan, FlingCalculator};
use weft_core::{
    Axis, BindingValue, CommandSequencer, ComponentId, ComponentTree, HostEvent, InteractionConfig,
    PendingBatch, SequencerMode, SnapPolicy, Timestamp,
};

/// Positions closer than this count as equal.
const POSITION_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum AnimKind {
    /// Free deceleration after release; carries the residual offset velocity
    /// at the end of the run (non-zero when the duration cap truncated it).
    Fling { end_velocity: f32 },
    /// Author-commanded scroll.
    Command,
    /// Post-fling alignment.
    Snap,
}

#[derive(Debug)]
struct ScrollAnimation {
    plan: AnimationPlan,
    kind: AnimKind,
}

/// Drives scroll positions over time.
#[derive(Debug, Default)]
pub struct ScrollerEngine {
    animations: HashMap<ComponentId, ScrollAnimation>,
}

impl ScrollerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self, id: ComponentId) -> bool {
        self.animations.contains_key(&id)
    }

    /// Scrollables with an in-flight animation; a Down on one of them takes
    /// over the motion directly.
    pub fn animating_ids(&self) -> Vec<ComponentId> {
        self.animations.keys().copied().collect()
    }

    /// Stop an animation at its current (already committed) value.
    pub fn cancel(&mut self, id: ComponentId) {
        self.animations.remove(&id);
    }

    /// A new user gesture kills every in-flight animation at value.
    pub fn cancel_all(&mut self) {
        self.animations.clear();
    }

    /// Scroll-follow the pointer. `delta` is the global-coordinate movement
    /// along the scroll axis since the last event; it is divided by the
    /// component's effective global axis scale.
    pub fn follow_pointer(&mut self, tree: &mut ComponentTree, id: ComponentId, delta: f32) {
        self.animations.remove(&id);
        let axis = self.axis_of(tree, id);
        let scale = tree.global_axis_scale(id, axis);
        let Some(component) = tree.get_mut(id) else {
            return;
        };
        let extent = component.axis_extent(axis);
        let Some(props) = component.scrollable.as_mut() else {
            return;
        };
        let max = props.max_offset(extent);
        let offset = (props.offset() - delta / scale).clamp(0.0, max);
        props.set_offset(offset);
    }

    /// Start a fling from the tracked release velocity (global px/s along
    /// the scroll axis, already clamped by the velocity tracker).
    pub fn start_fling(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        velocity: f32,
        t: Timestamp,
    ) {
        let axis = self.axis_of(tree, id);
        let scale = tree.global_axis_scale(id, axis);
        let Some(component) = tree.get(id) else {
            return;
        };
        let extent = component.axis_extent(axis);
        let Some(props) = component.scrollable.as_ref() else {
            return;
        };

        // Content follows the finger, so the offset moves against it.
        let offset_velocity = -velocity / scale;
        if offset_velocity == 0.0 {
            self.finish_fling(tree, config, id, 0.0, t);
            return;
        }

        let calculator =
            FlingCalculator::new(config.scroller_deceleration, config.scroller_max_duration);
        let run = calculator.run(offset_velocity);
        let natural = (1000.0 / (2.0 * config.scroller_deceleration)) as i64;
        let mut end_velocity = if run.duration < natural {
            offset_velocity * (1.0 - run.duration as f32 / natural as f32)
        } else {
            0.0
        };

        let start = props.offset();
        let max = props.max_offset(extent);
        let target = (start + run.distance).clamp(0.0, max);
        let mut duration = run.duration;
        if (target - (start + run.distance)).abs() > POSITION_EPSILON && run.distance.abs() > 0.0 {
            // Clamped early: shorten the run proportionally and keep the
            // leftover speed so the snap phase can see it.
            let fraction = ((target - start) / run.distance).clamp(0.0, 1.0);
            duration = ((duration as f32) * fraction) as i64;
            end_velocity = offset_velocity;
        }

        log::debug!("fling {id:?}: {start} -> {target} over {duration} ms");
        self.animations.insert(
            id,
            ScrollAnimation {
                plan: AnimationPlan::new(t, duration, start, target, config.scroller_duration_easing),
                kind: AnimKind::Fling { end_velocity },
            },
        );
    }

    /// Author-commanded scroll by a distance in viewport extents.
    pub fn start_command(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        distance: f32,
        t: Timestamp,
    ) {
        let axis = self.axis_of(tree, id);
        let Some(component) = tree.get(id) else {
            return;
        };
        let extent = component.axis_extent(axis);
        let Some(props) = component.scrollable.as_ref() else {
            return;
        };
        let start = props.offset();
        let max = props.max_offset(extent);
        let requested = distance * extent;
        let target = (start + requested).clamp(0.0, max);

        // A clamped target finishes early so any attached author command
        // can chain from the edge without waiting out the full duration.
        let mut duration = config.scroll_command_duration;
        if requested.abs() > f32::EPSILON {
            let fraction = ((target - start) / requested).clamp(0.0, 1.0);
            duration = ((duration as f32) * fraction) as i64;
        }

        self.animations.insert(
            id,
            ScrollAnimation {
                plan: AnimationPlan::new(
                    t,
                    duration,
                    start,
                    target,
                    config.scroll_command_easing,
                ),
                kind: AnimKind::Command,
            },
        );
    }

    /// Animate so the child at `index` sits at the scrollable's leading
    /// edge (clamped to the content range).
    pub fn start_to_index(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        index: usize,
        t: Timestamp,
    ) {
        let axis = self.axis_of(tree, id);
        let Some(child) = tree.children(id).get(index).copied() else {
            log::warn!("scroll-to-index {index} out of range on {id:?}");
            return;
        };
        let leading = match (tree.get(child), axis) {
            (Some(c), Axis::Horizontal) => c.bounds.x,
            (Some(c), Axis::Vertical) => c.bounds.y,
            (None, _) => return,
        };
        let Some(component) = tree.get(id) else {
            return;
        };
        let extent = component.axis_extent(axis);
        let Some(props) = component.scrollable.as_ref() else {
            return;
        };
        let start = props.offset();
        let target = leading.clamp(0.0, props.max_offset(extent));

        self.animations.insert(
            id,
            ScrollAnimation {
                plan: AnimationPlan::new(
                    t,
                    config.scroll_command_duration,
                    start,
                    target,
                    config.scroll_command_easing,
                ),
                kind: AnimKind::Command,
            },
        );
    }

    /// Stop at the current position and align only the force-snap variants;
    /// used when the host cancels a pointer stream mid-scroll.
    pub fn settle_after_cancel(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        t: Timestamp,
    ) {
        self.animations.remove(&id);
        let snap = tree
            .get(id)
            .and_then(|c| c.scrollable.as_ref())
            .map(|p| p.snap)
            .unwrap_or(SnapPolicy::None);
        if snap.is_forced() {
            self.start_snap(tree, config, id, t);
        }
    }

    /// Advance all animations to `t`, committing clamped positions and
    /// running completion phases (snap, author scroll callbacks).
    pub fn tick(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        t: Timestamp,
        sequencer: &mut CommandSequencer,
        events: &mut VecDeque<HostEvent>,
    ) {
        let ids: Vec<ComponentId> = self.animations.keys().copied().collect();
        for id in ids {
            let Some(animation) = self.animations.get(&id) else {
                continue;
            };
            let value = animation.plan.value_at(t);
            let finished = animation.plan.finished(t);
            let kind = animation.kind;

            self.commit_offset(tree, id, value);
            if !finished {
                continue;
            }
            self.animations.remove(&id);

            match kind {
                AnimKind::Fling { end_velocity } => {
                    self.finish_fling(tree, config, id, end_velocity, t);
                }
                AnimKind::Command => {
                    let position = tree
                        .get(id)
                        .and_then(|c| c.scrollable.as_ref())
                        .map(|p| p.position)
                        .unwrap_or_default();
                    events.push_back(HostEvent::ScrollTo {
                        component: id,
                        position,
                    });
                    let batch = tree
                        .get(id)
                        .and_then(|c| c.scrollable.as_ref())
                        .and_then(|p| p.on_scroll.clone());
                    if let Some(commands) = batch {
                        // Scheduled, never reentrant: a scroll command issued
                        // from here is queued for the next drain.
                        sequencer.submit(PendingBatch {
                            source: id,
                            handler: "Scroll",
                            commands,
                            mode: SequencerMode::Fast,
                            bindings: smallvec![(
                                "position",
                                BindingValue::Number(position.x + position.y)
                            )],
                        });
                    }
                }
                AnimKind::Snap => {}
            }
        }
    }

    fn finish_fling(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        end_velocity: f32,
        t: Timestamp,
    ) {
        let Some(component) = tree.get(id) else {
            return;
        };
        let Some(props) = component.scrollable.as_ref() else {
            return;
        };
        let snap = props.snap;
        if snap == SnapPolicy::None {
            return;
        }
        let extent = component.axis_extent(props.axis);
        let offset = props.offset();
        let max = props.max_offset(extent);
        let at_edge = offset <= POSITION_EPSILON || offset >= max - POSITION_EPSILON;

        if at_edge {
            // The clamp wins at content edges, forced or not.
            return;
        }
        if !snap.is_forced() && end_velocity.abs() >= config.minimum_fling_velocity {
            return;
        }
        self.start_snap(tree, config, id, t);
    }

    fn start_snap(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        t: Timestamp,
    ) {
        let Some(target) = self.snap_target(tree, id) else {
            return;
        };
        let Some(props) = tree.get(id).and_then(|c| c.scrollable.as_ref()) else {
            return;
        };
        let start = props.offset();
        if (target - start).abs() < POSITION_EPSILON {
            return;
        }
        self.animations.insert(
            id,
            ScrollAnimation {
                plan: AnimationPlan::new(
                    t,
                    config.scroll_snap_duration,
                    start,
                    target,
                    config.scroll_command_easing,
                ),
                kind: AnimKind::Snap,
            },
        );
    }

    /// The aligned offset the snap policy asks for, if any child qualifies.
    fn snap_target(&self, tree: &ComponentTree, id: ComponentId) -> Option<f32> {
        let component = tree.get(id)?;
        let props = component.scrollable.as_ref()?;
        let axis = props.axis;
        let extent = component.axis_extent(axis);
        let offset = props.offset();
        let max = props.max_offset(extent);

        let mut leading_edges: Vec<f32> = Vec::new();
        for child in tree.children(id) {
            if let Some(c) = tree.get(*child) {
                leading_edges.push(match axis {
                    Axis::Horizontal => c.bounds.x,
                    Axis::Vertical => c.bounds.y,
                });
            }
        }
        if leading_edges.is_empty() {
            return None;
        }

        let child_length = |index: usize| -> f32 {
            let child = tree.children(id)[index];
            tree.get(child).map(|c| c.axis_extent(axis)).unwrap_or(0.0)
        };

        let target = match props.snap {
            SnapPolicy::None => return None,
            SnapPolicy::Start | SnapPolicy::ForceStart => leading_edges
                .iter()
                .filter(|leading| **leading >= offset - POSITION_EPSILON)
                .fold(None::<f32>, |best, leading| match best {
                    Some(current) if current <= *leading => Some(current),
                    _ => Some(*leading),
                })?,
            SnapPolicy::Center | SnapPolicy::ForceCenter => {
                let viewport_center = offset + extent / 2.0;
                let mut best: Option<(f32, f32)> = None;
                for (index, leading) in leading_edges.iter().enumerate() {
                    let center = leading + child_length(index) / 2.0;
                    let distance = (center - viewport_center).abs();
                    if best.is_none() || distance < best.unwrap().0 {
                        best = Some((distance, center - extent / 2.0));
                    }
                }
                best?.1
            }
            SnapPolicy::End | SnapPolicy::ForceEnd => {
                let viewport_end = offset + extent;
                let mut best: Option<f32> = None;
                for (index, leading) in leading_edges.iter().enumerate() {
                    let trailing = leading + child_length(index);
                    if trailing >= viewport_end - POSITION_EPSILON
                        && (best.is_none() || trailing < best.unwrap())
                    {
                        best = Some(trailing);
                    }
                }
                best? - extent
            }
        };

        Some(target.clamp(0.0, max))
    }

    fn commit_offset(&self, tree: &mut ComponentTree, id: ComponentId, value: f32) {
        let Some(component) = tree.get(id) else {
            return;
        };
        let axis = component
            .scrollable
            .as_ref()
            .map(|p| p.axis)
            .unwrap_or(Axis::Vertical);
        let extent = component.axis_extent(axis);
        if let Some(props) = tree.get_mut(id).and_then(|c| c.scrollable.as_mut()) {
            let max = props.max_offset(extent);
            props.set_offset(value.clamp(0.0, max));
        }
    }

    fn axis_of(&self, tree: &ComponentTree, id: ComponentId) -> Axis {
        tree.get(id)
            .and_then(|c| c.scrollable.as_ref())
            .map(|p| p.axis)
            .unwrap_or(Axis::Vertical)
    }
}
