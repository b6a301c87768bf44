//! The page-transition driver.
//!
//! A transition keeps two children alive: the outgoing current page and the
//! incoming next page. Progress runs 0..1; every tick either invokes the
//! author's page-move hook (fast mode, with the event variables bound) or
//! applies the default translate transforms.

use std::collections::HashMap;
use std::collections::VecDeque;

use smallvec::smallvec;
use weft_animation::AnimationPlan;
use weft_core::{
    Axis, BindingValue, CommandSequencer, ComponentId, ComponentTree, HostEvent, InteractionConfig,
    LayoutDirection, PagerNavigation, PendingBatch, SequencerMode, SwipeDirection, Timestamp,
};
use weft_graphics::Transform2D;

#[derive(Debug)]
struct PageTransition {
    plan: AnimationPlan,
    from_page: usize,
    to_page: usize,
    direction: SwipeDirection,
    forward: bool,
    /// False while reverting back to the current page.
    commit: bool,
}

/// A committed page change, reported to the runtime for focus sync.
#[derive(Debug, Clone, Copy)]
pub struct PageCommit {
    pub pager: ComponentId,
    pub old_page: usize,
    pub new_page: usize,
}

/// Drives page transitions over time.
#[derive(Debug, Default)]
pub struct PagerEngine {
    transitions: HashMap<ComponentId, PageTransition>,
}

impl PagerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self, id: ComponentId) -> bool {
        self.transitions.contains_key(&id)
    }

    pub fn cancel(&mut self, id: ComponentId) {
        self.transitions.remove(&id);
    }

    pub fn cancel_all(&mut self) {
        self.transitions.clear();
    }

    /// Whether a swipe in `direction` advances through the data order.
    /// `None` when the motion is off the pager's axis.
    pub fn forward_for_direction(
        tree: &ComponentTree,
        id: ComponentId,
        direction: SwipeDirection,
    ) -> Option<bool> {
        let props = tree.get(id)?.pager.as_ref()?;
        match (props.axis, direction) {
            (Axis::Horizontal, SwipeDirection::Left) => {
                Some(props.direction == LayoutDirection::Ltr)
            }
            (Axis::Horizontal, SwipeDirection::Right) => {
                Some(props.direction == LayoutDirection::Rtl)
            }
            (Axis::Vertical, SwipeDirection::Up) => Some(true),
            (Axis::Vertical, SwipeDirection::Down) => Some(false),
            _ => None,
        }
    }

    /// The page a gesture in the given direction would land on, after the
    /// navigation policy has its say.
    pub fn gesture_target(
        tree: &ComponentTree,
        id: ComponentId,
        direction: SwipeDirection,
    ) -> Option<(usize, bool)> {
        let forward = Self::forward_for_direction(tree, id, direction)?;
        let props = tree.get(id)?.pager.as_ref()?;
        let count = tree.children(id).len();
        if count < 2 || props.navigation == PagerNavigation::None {
            return None;
        }
        let current = props.current_page;
        let target = if forward {
            if current + 1 < count {
                current + 1
            } else if props.navigation == PagerNavigation::Wrap {
                0
            } else {
                return None;
            }
        } else {
            if props.navigation == PagerNavigation::ForwardOnly {
                return None;
            }
            if current > 0 {
                current - 1
            } else if props.navigation == PagerNavigation::Wrap {
                count - 1
            } else {
                return None;
            }
        };
        Some((target, forward))
    }

    /// Apply one drag step of the intrinsic paging gesture.
    pub fn drag(
        &mut self,
        tree: &mut ComponentTree,
        sequencer: &mut CommandSequencer,
        id: ComponentId,
        to_page: usize,
        progress: f32,
        direction: SwipeDirection,
        forward: bool,
    ) {
        self.transitions.remove(&id);
        let Some(props) = tree.get(id).and_then(|c| c.pager.as_ref()) else {
            return;
        };
        let from_page = props.current_page;
        self.apply_tick(
            tree, sequencer, id, from_page, to_page, progress, direction, forward,
        );
    }

    /// Release the drag: settle to the next page or back to the current one.
    pub fn release_drag(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        to_page: usize,
        progress: f32,
        velocity: f32,
        direction: SwipeDirection,
        forward: bool,
        t: Timestamp,
    ) {
        let commit =
            progress.abs() >= 0.5 || velocity.abs() >= config.swipe_velocity_threshold;
        let Some(props) = tree.get(id).and_then(|c| c.pager.as_ref()) else {
            return;
        };
        let from_page = props.current_page;
        let duration = config.default_pager_animation_duration;
        let (target, scaled) = if commit {
            (1.0, ((duration as f32) * (1.0 - progress)) as i64)
        } else {
            (0.0, ((duration as f32) * progress) as i64)
        };
        self.transitions.insert(
            id,
            PageTransition {
                plan: AnimationPlan::new(
                    t,
                    scaled.max(1),
                    progress,
                    target,
                    config.default_pager_animation_easing,
                ),
                from_page,
                to_page,
                direction,
                forward,
                commit,
            },
        );
    }

    /// Host-cancelled drag: always settle back to the current page.
    #[allow(clippy::too_many_arguments)]
    pub fn cancel_drag(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        to_page: usize,
        progress: f32,
        direction: SwipeDirection,
        forward: bool,
        t: Timestamp,
    ) {
        let Some(props) = tree.get(id).and_then(|c| c.pager.as_ref()) else {
            return;
        };
        let from_page = props.current_page;
        let duration = ((config.default_pager_animation_duration as f32) * progress) as i64;
        self.transitions.insert(
            id,
            PageTransition {
                plan: AnimationPlan::new(
                    t,
                    duration.max(1),
                    progress,
                    0.0,
                    config.default_pager_animation_easing,
                ),
                from_page,
                to_page,
                direction,
                forward,
                commit: false,
            },
        );
    }

    /// Programmatic page change; bypasses the navigation policy but clamps
    /// to the page range.
    pub fn set_page(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        id: ComponentId,
        target: usize,
        t: Timestamp,
    ) {
        let count = tree.children(id).len();
        let Some(props) = tree.get(id).and_then(|c| c.pager.as_ref()) else {
            return;
        };
        let current = props.current_page;
        let target = target.min(count.saturating_sub(1));
        if target == current {
            return;
        }
        let forward = target > current;
        let direction = Self::visual_direction(props.axis, props.direction, forward);
        self.transitions.insert(
            id,
            PageTransition {
                plan: AnimationPlan::new(
                    t,
                    config.default_pager_animation_duration,
                    0.0,
                    1.0,
                    config.default_pager_animation_easing,
                ),
                from_page: current,
                to_page: target,
                direction,
                forward,
                commit: true,
            },
        );
    }

    /// Swap the page index with no animation; used by focus-driven page
    /// moves. Returns the commit record when the index changed.
    pub fn jump_to_page(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        id: ComponentId,
        target: usize,
    ) -> Option<PageCommit> {
        self.transitions.remove(&id);
        let count = tree.children(id).len();
        let props = tree.get_mut(id)?.pager.as_mut()?;
        let target = target.min(count.saturating_sub(1));
        let old_page = props.current_page;
        if target == old_page {
            return None;
        }
        props.current_page = target;
        events.push_back(HostEvent::PageChanged {
            component: id,
            page: target,
        });
        Some(PageCommit {
            pager: id,
            old_page,
            new_page: target,
        })
    }

    /// Advance all transitions. Returns the page commits that happened.
    pub fn tick(
        &mut self,
        tree: &mut ComponentTree,
        sequencer: &mut CommandSequencer,
        events: &mut VecDeque<HostEvent>,
        t: Timestamp,
    ) -> Vec<PageCommit> {
        let mut commits = Vec::new();
        let ids: Vec<ComponentId> = self.transitions.keys().copied().collect();
        for id in ids {
            let Some(transition) = self.transitions.get(&id) else {
                continue;
            };
            let progress = transition.plan.value_at(t);
            let finished = transition.plan.finished(t);
            let (from_page, to_page) = (transition.from_page, transition.to_page);
            let (direction, forward, commit) =
                (transition.direction, transition.forward, transition.commit);

            self.apply_tick(
                tree, sequencer, id, from_page, to_page, progress, direction, forward,
            );
            if !finished {
                continue;
            }
            self.transitions.remove(&id);
            self.clear_transforms(tree, id, from_page, to_page);

            if commit {
                if let Some(props) = tree.get_mut(id).and_then(|c| c.pager.as_mut()) {
                    props.current_page = to_page;
                }
                events.push_back(HostEvent::PageChanged {
                    component: id,
                    page: to_page,
                });
                log::debug!("pager {id:?}: page {from_page} -> {to_page}");
                commits.push(PageCommit {
                    pager: id,
                    old_page: from_page,
                    new_page: to_page,
                });
            }
        }
        commits
    }

    /// One visual step: author hook if present, default translations
    /// otherwise.
    #[allow(clippy::too_many_arguments)]
    fn apply_tick(
        &self,
        tree: &mut ComponentTree,
        sequencer: &mut CommandSequencer,
        id: ComponentId,
        from_page: usize,
        to_page: usize,
        amount: f32,
        direction: SwipeDirection,
        forward: bool,
    ) {
        let children = tree.children(id);
        let current = children.get(from_page).copied();
        let next = children.get(to_page).copied();
        let hook = tree
            .get(id)
            .and_then(|c| c.pager.as_ref())
            .and_then(|p| p.page_move.clone());

        if let Some(commands) = hook {
            let mut bindings: smallvec::SmallVec<[weft_core::Binding; 4]> = smallvec![
                ("amount", BindingValue::Number(amount)),
                (
                    "direction",
                    BindingValue::Text(direction_name(direction).into())
                ),
                ("forward", BindingValue::Bool(forward)),
            ];
            if let Some(current) = current {
                bindings.push(("currentChild", BindingValue::Component(current)));
            }
            if let Some(next) = next {
                bindings.push(("nextChild", BindingValue::Component(next)));
            }
            // The hook must never re-enter the animator, so it is queued
            // like any other fast-mode batch.
            sequencer.submit(PendingBatch {
                source: id,
                handler: "PageMove",
                commands,
                mode: SequencerMode::Fast,
                bindings,
            });
            return;
        }

        let Some(component) = tree.get(id) else {
            return;
        };
        let extent = component.axis_extent(
            component
                .pager
                .as_ref()
                .map(|p| p.axis)
                .unwrap_or(Axis::Horizontal),
        );
        let unit = direction.unit();
        if let Some(current) = current {
            if let Some(child) = tree.get_mut(current) {
                child.transform =
                    Transform2D::translate(unit.x * amount * extent, unit.y * amount * extent);
            }
        }
        if let Some(next) = next {
            if let Some(child) = tree.get_mut(next) {
                let shift = amount - 1.0;
                child.transform =
                    Transform2D::translate(unit.x * shift * extent, unit.y * shift * extent);
            }
        }
    }

    fn clear_transforms(
        &self,
        tree: &mut ComponentTree,
        id: ComponentId,
        from_page: usize,
        to_page: usize,
    ) {
        for page in [from_page, to_page] {
            if let Some(child) = tree.children(id).get(page).copied() {
                if let Some(component) = tree.get_mut(child) {
                    component.transform = Transform2D::IDENTITY;
                }
            }
        }
    }

    fn visual_direction(
        axis: Axis,
        layout: LayoutDirection,
        forward: bool,
    ) -> SwipeDirection {
        match axis {
            Axis::Horizontal => match (layout, forward) {
                (LayoutDirection::Ltr, true) | (LayoutDirection::Rtl, false) => {
                    SwipeDirection::Left
                }
                _ => SwipeDirection::Right,
            },
            Axis::Vertical => {
                if forward {
                    SwipeDirection::Up
                } else {
                    SwipeDirection::Down
                }
            }
        }
    }
}

fn direction_name(direction: SwipeDirection) -> &'static str {
    match direction {
        SwipeDirection::Left => "left",
        SwipeDirection::Right => "right",
        SwipeDirection::Up => "up",
        SwipeDirection::Down => "down",
    }
}
