//! The focus manager.
//!
//! Owns the single focused component, resolves directional and sequential
//! moves over the focusable areas map, and negotiates focus release with the
//! host through action refs when navigation runs off the document edge.

use std::collections::VecDeque;

use indexmap::IndexMap;
use weft_core::{
    ActionRef, ActionState, Axis, Capability, ComponentId, ComponentTree, FocusDirection,
    HostEvent, InteractionConfig, LayoutDirection, PagerNavigation, SnapPolicy, State,
};
use weft_graphics::Rect;

use crate::pager::PagerEngine;

/// Geometric slack when comparing rectangle edges.
const EDGE_TOLERANCE: f32 = 0.5;

#[derive(Debug)]
struct PendingRelease {
    action: ActionRef,
}

/// At-most-one focused component, plus the machinery to move it.
#[derive(Debug, Default)]
pub struct FocusManager {
    focused: Option<ComponentId>,
    pending_release: Option<PendingRelease>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<ComponentId> {
        self.focused
    }

    pub fn has_pending_release(&self) -> bool {
        self.pending_release.is_some()
    }

    /// Every currently focusable component mapped to its viewport rect.
    /// Disabled and unreachable components never appear (so a child on a
    /// pager's hidden page, or under an opacity-0 ancestor, is absent).
    pub fn focusable_areas(&self, tree: &ComponentTree) -> IndexMap<ComponentId, Rect> {
        let mut areas = IndexMap::new();
        for id in tree.document_order() {
            let Some(component) = tree.get(id) else {
                continue;
            };
            if !component.is(Capability::Focusable) || component.is_disabled() {
                continue;
            }
            if !tree.is_reachable(id) {
                continue;
            }
            areas.insert(id, tree.global_bounds(id));
        }
        areas
    }

    /// Programmatic or host-driven focus. Fails silently on a non-focusable
    /// or unreachable target.
    pub fn set_focus(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        id: ComponentId,
        direction: Option<FocusDirection>,
    ) -> bool {
        let Some(component) = tree.get(id) else {
            return false;
        };
        if !component.is(Capability::Focusable)
            || component.is_disabled()
            || !tree.is_reachable(id)
        {
            return false;
        }
        self.terminate_release();
        self.commit_focus(tree, events, Some(id), direction);
        self.scroll_into_view(tree, events, id);
        true
    }

    pub fn clear_focus(&mut self, tree: &mut ComponentTree, events: &mut VecDeque<HostEvent>) {
        self.terminate_release();
        self.commit_focus(tree, events, None, None);
    }

    /// Directional or sequential move. Returns true when the input was
    /// acted on (including emitting a release question).
    pub fn next_focus(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        events: &mut VecDeque<HostEvent>,
        pager: &mut PagerEngine,
        direction: FocusDirection,
    ) -> bool {
        // Competing input kills a pending release before anything else.
        self.terminate_release();

        let areas = self.focusable_areas(tree);
        let Some(current) = self.focused.filter(|id| tree.contains(*id)) else {
            return self.focus_initial(tree, events, &areas, direction);
        };

        // Static overrides bypass geometry entirely.
        if let Some(name) = tree
            .get(current)
            .and_then(|c| c.focus.override_for(direction))
            .map(String::from)
        {
            if let Some(target) = tree.find_by_name(&name) {
                if self.set_focus(tree, events, target, Some(direction)) {
                    return true;
                }
            }
        }

        match direction {
            FocusDirection::Forward | FocusDirection::Backward => {
                self.next_sequential(tree, events, &areas, current, direction)
            }
            _ => self.next_directional(tree, config, events, pager, &areas, current, direction),
        }
    }

    /// Poll the pending release action; called from the runtime pump.
    pub fn poll_release(&mut self, tree: &mut ComponentTree) {
        let Some(pending) = &self.pending_release else {
            return;
        };
        match pending.action.state() {
            ActionState::Pending => {}
            ActionState::Resolved(true) => {
                // The host agreed to take focus; drop it quietly, the host
                // already knows what it asked for.
                self.pending_release = None;
                if let Some(old) = self.focused.take() {
                    if let Some(component) = tree.get_mut(old) {
                        component.states.set(State::Focused, false);
                    }
                }
            }
            ActionState::Resolved(false) | ActionState::Terminated => {
                self.pending_release = None;
            }
        }
    }

    /// Called when components leave the tree. Losing the focused component
    /// reports a null focus but picks no successor.
    pub fn handle_removed(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        removed: &[ComponentId],
    ) {
        if let Some(focused) = self.focused {
            if removed.contains(&focused) {
                self.focused = None;
                self.terminate_release();
                events.push_back(HostEvent::Focus {
                    component: None,
                    bounds: None,
                    direction: None,
                    action: None,
                });
            }
        }
    }

    /// Page-change side effect: focus trapped on the outgoing page moves to
    /// the pager container itself, never to a child of the incoming page.
    pub fn handle_page_changed(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        pager_id: ComponentId,
        old_page: usize,
    ) {
        let Some(focused) = self.focused else {
            return;
        };
        let Some(old_child) = tree.children(pager_id).get(old_page).copied() else {
            return;
        };
        if focused != old_child && !tree.is_ancestor(old_child, focused) {
            return;
        }
        self.commit_focus(tree, events, Some(pager_id), None);
    }

    /// Document teardown: forget the focus and kill any pending action.
    pub fn release(&mut self) {
        self.terminate_release();
        self.focused = None;
    }

    fn terminate_release(&mut self) {
        if let Some(pending) = self.pending_release.take() {
            pending.action.terminate();
        }
    }

    /// Flip the state bits and publish the focus event.
    fn commit_focus(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        id: Option<ComponentId>,
        direction: Option<FocusDirection>,
    ) {
        if let Some(old) = self.focused {
            if let Some(component) = tree.get_mut(old) {
                component.states.set(State::Focused, false);
            }
        }
        self.focused = id;
        let bounds = id.map(|id| {
            if let Some(component) = tree.get_mut(id) {
                component.states.set(State::Focused, true);
            }
            tree.global_bounds(id)
        });
        events.push_back(HostEvent::Focus {
            component: id,
            bounds,
            direction,
            action: None,
        });
    }

    /// Emit the release question and keep focus where it is until the host
    /// answers (or competing input terminates the action).
    fn emit_release(
        &mut self,
        events: &mut VecDeque<HostEvent>,
        direction: FocusDirection,
    ) -> bool {
        let action = ActionRef::new();
        log::debug!("focus release requested, direction {direction:?}");
        events.push_back(HostEvent::Focus {
            component: None,
            bounds: None,
            direction: Some(direction),
            action: Some(action.clone()),
        });
        self.pending_release = Some(PendingRelease { action });
        true
    }

    /// First focus when nothing holds it yet.
    fn focus_initial(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        areas: &IndexMap<ComponentId, Rect>,
        direction: FocusDirection,
    ) -> bool {
        let candidate = match direction {
            FocusDirection::Forward => areas.keys().next().copied(),
            FocusDirection::Backward => areas.keys().last().copied(),
            FocusDirection::Down => best_by(areas, |rect| rect.y),
            FocusDirection::Up => best_by(areas, |rect| -rect.bottom()),
            FocusDirection::Right => best_by(areas, |rect| rect.x),
            FocusDirection::Left => best_by(areas, |rect| -rect.right()),
        };
        match candidate {
            Some(id) => self.set_focus(tree, events, id, Some(direction)),
            None => false,
        }
    }

    fn next_sequential(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        areas: &IndexMap<ComponentId, Rect>,
        current: ComponentId,
        direction: FocusDirection,
    ) -> bool {
        let order: Vec<ComponentId> = areas.keys().copied().collect();
        let Some(index) = order.iter().position(|id| *id == current) else {
            return self.focus_initial(tree, events, areas, direction);
        };
        let next = match direction {
            FocusDirection::Forward => index.checked_add(1).filter(|i| *i < order.len()),
            FocusDirection::Backward => index.checked_sub(1),
            _ => None,
        };
        match next {
            Some(index) => self.set_focus(tree, events, order[index], Some(direction)),
            None => self.emit_release(events, direction),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn next_directional(
        &mut self,
        tree: &mut ComponentTree,
        config: &InteractionConfig,
        events: &mut VecDeque<HostEvent>,
        pager: &mut PagerEngine,
        areas: &IndexMap<ComponentId, Rect>,
        current: ComponentId,
        direction: FocusDirection,
    ) -> bool {
        let origin = tree.global_bounds(current);
        if let Some(next) = directional_candidate(areas, origin, current, direction) {
            return self.set_focus(tree, events, next, Some(direction));
        }

        // Nothing ahead: a scrollable ancestor that still has room scrolls
        // one viewport and keeps the focus.
        if self.scroll_ahead(tree, events, current, direction) {
            return true;
        }

        // Then a pager ancestor may advance to the page holding the match.
        if self.advance_page(tree, config, events, pager, current, direction, origin) {
            return true;
        }

        self.emit_release(events, direction)
    }

    /// Scroll the nearest scrollable ancestor a viewport further if it can
    /// move in the requested direction.
    fn scroll_ahead(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        current: ComponentId,
        direction: FocusDirection,
    ) -> bool {
        let mut candidate = Some(current);
        while let Some(id) = candidate {
            if let Some(component) = tree.get(id) {
                if let Some(props) = &component.scrollable {
                    let axis_matches = match (props.axis, direction) {
                        (Axis::Vertical, FocusDirection::Up | FocusDirection::Down) => true,
                        (Axis::Horizontal, FocusDirection::Left | FocusDirection::Right) => true,
                        _ => false,
                    };
                    if axis_matches {
                        let extent = component.axis_extent(props.axis);
                        let max = props.max_offset(extent);
                        let offset = props.offset();
                        let toward_end = matches!(
                            direction,
                            FocusDirection::Down | FocusDirection::Right
                        );
                        let room = if toward_end { max - offset } else { offset };
                        if room > EDGE_TOLERANCE {
                            let step = if toward_end { extent } else { -extent };
                            let target = (offset + step).clamp(0.0, max);
                            if let Some(props) =
                                tree.get_mut(id).and_then(|c| c.scrollable.as_mut())
                            {
                                props.set_offset(target);
                            }
                            let position = tree
                                .get(id)
                                .and_then(|c| c.scrollable.as_ref())
                                .map(|p| p.position)
                                .unwrap_or_default();
                            events.push_back(HostEvent::ScrollTo {
                                component: id,
                                position,
                            });
                            return true;
                        }
                    }
                }
            }
            candidate = tree.parent(id);
        }
        false
    }

    /// Move an ancestor pager to the adjacent page in the focus direction
    /// and focus the best candidate there.
    #[allow(clippy::too_many_arguments)]
    fn advance_page(
        &mut self,
        tree: &mut ComponentTree,
        _config: &InteractionConfig,
        events: &mut VecDeque<HostEvent>,
        pager: &mut PagerEngine,
        current: ComponentId,
        direction: FocusDirection,
        origin: Rect,
    ) -> bool {
        let mut candidate = Some(current);
        while let Some(id) = candidate {
            if let Some(props) = tree.get(id).and_then(|c| c.pager.as_ref()) {
                let forward = match (props.axis, direction) {
                    (Axis::Horizontal, FocusDirection::Right) => {
                        Some(props.direction == LayoutDirection::Ltr)
                    }
                    (Axis::Horizontal, FocusDirection::Left) => {
                        Some(props.direction == LayoutDirection::Rtl)
                    }
                    (Axis::Vertical, FocusDirection::Down) => Some(true),
                    (Axis::Vertical, FocusDirection::Up) => Some(false),
                    _ => None,
                };
                if let Some(forward) = forward {
                    let count = tree.children(id).len();
                    let target = next_page(props.current_page, count, props.navigation, forward);
                    if let Some(target) = target {
                        pager.jump_to_page(tree, events, id, target);
                        let areas = self.focusable_areas(tree);
                        let next = directional_candidate(&areas, origin, current, direction)
                            .or_else(|| areas.keys().next().copied());
                        return match next {
                            Some(next) => self.set_focus(tree, events, next, Some(direction)),
                            None => {
                                // Empty page: the pager container holds focus.
                                self.commit_focus(tree, events, Some(id), Some(direction));
                                true
                            }
                        };
                    }
                }
            }
            candidate = tree.parent(id);
        }
        false
    }

    /// Bring a newly focused component fully into view inside each
    /// scrollable ancestor, honoring the snap policy.
    fn scroll_into_view(
        &mut self,
        tree: &mut ComponentTree,
        events: &mut VecDeque<HostEvent>,
        id: ComponentId,
    ) {
        let ancestors = tree.ancestors(id);
        for ancestor in ancestors {
            let Some(component) = tree.get(ancestor) else {
                continue;
            };
            let Some(props) = &component.scrollable else {
                continue;
            };
            let axis = props.axis;
            let snap = props.snap;
            let extent = component.axis_extent(axis);
            let max = props.max_offset(extent);
            let offset = props.offset();

            let target_bounds = tree.global_bounds(id);
            let viewport = tree.global_bounds(ancestor);
            if viewport.contains_rect(&target_bounds) {
                continue;
            }

            // The child's content-space edges along the axis.
            let scale = tree.global_axis_scale(ancestor, axis);
            let (lead_view, trail_view, view_lead) = match axis {
                Axis::Vertical => (target_bounds.y, target_bounds.bottom(), viewport.y),
                Axis::Horizontal => (target_bounds.x, target_bounds.right(), viewport.x),
            };
            let lead = (lead_view - view_lead) / scale + offset;
            let trail = (trail_view - view_lead) / scale + offset;

            let target = match snap {
                SnapPolicy::Center | SnapPolicy::ForceCenter => {
                    (lead + trail) / 2.0 - extent / 2.0
                }
                SnapPolicy::End | SnapPolicy::ForceEnd => trail - extent,
                SnapPolicy::Start | SnapPolicy::ForceStart => lead,
                SnapPolicy::None => offset.max(trail - extent).min(lead),
            }
            .clamp(0.0, max);

            if (target - offset).abs() > EDGE_TOLERANCE {
                if let Some(props) = tree.get_mut(ancestor).and_then(|c| c.scrollable.as_mut()) {
                    props.set_offset(target);
                }
                let position = tree
                    .get(ancestor)
                    .and_then(|c| c.scrollable.as_ref())
                    .map(|p| p.position)
                    .unwrap_or_default();
                events.push_back(HostEvent::ScrollTo {
                    component: ancestor,
                    position,
                });
            }
        }
    }
}

/// Smallest key wins; used for the initial focus pick.
fn best_by(
    areas: &IndexMap<ComponentId, Rect>,
    key: impl Fn(&Rect) -> f32,
) -> Option<ComponentId> {
    areas
        .iter()
        .min_by(|a, b| key(a.1).total_cmp(&key(b.1)))
        .map(|(id, _)| *id)
}

/// The geometric search: half-plane filter, direct-overlap preference,
/// then the 45-degree cone fallback.
fn directional_candidate(
    areas: &IndexMap<ComponentId, Rect>,
    origin: Rect,
    current: ComponentId,
    direction: FocusDirection,
) -> Option<ComponentId> {
    let mut best_direct: Option<(f32, f32, ComponentId)> = None;
    let mut best_cone: Option<(f32, f32, ComponentId)> = None;

    for (id, rect) in areas {
        if *id == current {
            continue;
        }
        let (axis_distance, perpendicular, overlaps) = measure(origin, *rect, direction);
        if axis_distance < -EDGE_TOLERANCE {
            continue;
        }
        let axis_distance = axis_distance.max(0.0);

        if overlaps {
            let better = match best_direct {
                None => true,
                Some((best_axis, best_perp, _)) => {
                    axis_distance < best_axis - f32::EPSILON
                        || (axis_distance <= best_axis + f32::EPSILON && perpendicular < best_perp)
                }
            };
            if better {
                best_direct = Some((axis_distance, perpendicular, *id));
            }
        } else if perpendicular <= axis_distance {
            let score = axis_distance + perpendicular;
            let better = match best_cone {
                None => true,
                Some((best_score, best_perp, _)) => {
                    score < best_score - f32::EPSILON
                        || (score <= best_score + f32::EPSILON && perpendicular < best_perp)
                }
            };
            if better {
                best_cone = Some((score, perpendicular, *id));
            }
        }
    }

    best_direct
        .or(best_cone)
        .map(|(_, _, id)| id)
}

/// Axis distance, perpendicular distance, and projection overlap of a
/// candidate relative to the origin in the given direction.
fn measure(origin: Rect, candidate: Rect, direction: FocusDirection) -> (f32, f32, bool) {
    match direction {
        FocusDirection::Down => (
            candidate.y - origin.bottom(),
            (candidate.center().x - origin.center().x).abs(),
            ranges_overlap(candidate.x, candidate.right(), origin.x, origin.right()),
        ),
        FocusDirection::Up => (
            origin.y - candidate.bottom(),
            (candidate.center().x - origin.center().x).abs(),
            ranges_overlap(candidate.x, candidate.right(), origin.x, origin.right()),
        ),
        FocusDirection::Right => (
            candidate.x - origin.right(),
            (candidate.center().y - origin.center().y).abs(),
            ranges_overlap(candidate.y, candidate.bottom(), origin.y, origin.bottom()),
        ),
        FocusDirection::Left => (
            origin.x - candidate.right(),
            (candidate.center().y - origin.center().y).abs(),
            ranges_overlap(candidate.y, candidate.bottom(), origin.y, origin.bottom()),
        ),
        FocusDirection::Forward | FocusDirection::Backward => (f32::MIN, 0.0, false),
    }
}

fn ranges_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    a0 < b1 - EDGE_TOLERANCE && b0 < a1 - EDGE_TOLERANCE
}

fn next_page(
    current: usize,
    count: usize,
    navigation: PagerNavigation,
    forward: bool,
) -> Option<usize> {
    if count < 2 || navigation == PagerNavigation::None {
        return None;
    }
    if forward {
        if current + 1 < count {
            Some(current + 1)
        } else if navigation == PagerNavigation::Wrap {
            Some(0)
        } else {
            None
        }
    } else {
        if navigation == PagerNavigation::ForwardOnly {
            return None;
        }
        if current > 0 {
            Some(current - 1)
        } else if navigation == PagerNavigation::Wrap {
            Some(count - 1)
        } else {
            None
        }
    }
}
