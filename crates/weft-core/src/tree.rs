//! The component tree arena.
//!
//! Components live in generation-checked slots addressed by 32-bit indices.
//! Engines hold [`ComponentId`]s, never references; a stale id simply fails
//! lookup after the slot is reused.

use smallvec::SmallVec;
use weft_graphics::{Point, Rect, Transform2D};

use crate::component::{Axis, Capability, Component};

/// Arena address of a component: slot index plus the generation that must
/// still be live for the reference to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId {
    index: u32,
    generation: u32,
}

impl ComponentId {
    pub fn index(&self) -> u32 {
        self.index
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    component: Option<Component>,
    parent: Option<ComponentId>,
    children: SmallVec<[ComponentId; 4]>,
}

/// Arena-backed document tree.
#[derive(Debug, Default)]
pub struct ComponentTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: Option<ComponentId>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    /// The root component's bounds; pointer events outside it hit nothing.
    pub fn viewport(&self) -> Rect {
        self.root
            .and_then(|id| self.get(id))
            .map(|component| component.bounds)
            .unwrap_or(Rect::ZERO)
    }

    /// Install `component` as the document root, replacing (and releasing)
    /// any previous tree.
    pub fn set_root(&mut self, component: Component) -> ComponentId {
        if let Some(root) = self.root {
            self.remove(root);
        }
        let id = self.allocate(component, None);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: ComponentId, component: Component) -> Option<ComponentId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.allocate(component, Some(parent));
        self.slots[parent.index as usize].children.push(id);
        Some(id)
    }

    fn allocate(&mut self, component: Component, parent: Option<ComponentId>) -> ComponentId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.component = Some(component);
            slot.parent = parent;
            slot.children.clear();
            ComponentId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                component: Some(component),
                parent,
                children: SmallVec::new(),
            });
            ComponentId {
                index,
                generation: 0,
            }
        }
    }

    /// Remove a component and its whole subtree. Returns every removed id so
    /// callers can drop gesture state and focus referring to them.
    pub fn remove(&mut self, id: ComponentId) -> Vec<ComponentId> {
        if !self.contains(id) {
            return Vec::new();
        }
        if let Some(parent) = self.slots[id.index as usize].parent {
            if self.contains(parent) {
                self.slots[parent.index as usize]
                    .children
                    .retain(|child| *child != id);
            }
        }
        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            let slot = &mut self.slots[current.index as usize];
            stack.extend(slot.children.drain(..));
            slot.component = None;
            slot.parent = None;
            self.free.push(current.index);
            removed.push(current);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        removed
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.component.is_some())
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.component.as_ref()
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.component.as_mut()
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.index as usize].parent
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        if !self.contains(id) {
            return &[];
        }
        &self.slots[id.index as usize].children
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: ComponentId) -> SmallVec<[ComponentId; 8]> {
        let mut chain = SmallVec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            chain.push(ancestor);
            current = self.parent(ancestor);
        }
        chain
    }

    pub fn is_ancestor(&self, ancestor: ComponentId, of: ComponentId) -> bool {
        self.ancestors(of).contains(&ancestor)
    }

    /// Nearest ancestor (not `id` itself) with the given capability.
    pub fn nearest_ancestor_with(
        &self,
        id: ComponentId,
        capability: Capability,
    ) -> Option<ComponentId> {
        self.ancestors(id)
            .into_iter()
            .find(|ancestor| self.get(*ancestor).is_some_and(|c| c.is(capability)))
    }

    /// Depth-first preorder walk of the whole document.
    pub fn document_order(&self) -> Vec<ComponentId> {
        let mut order = Vec::new();
        let Some(root) = self.root else {
            return order;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !self.contains(id) {
                continue;
            }
            order.push(id);
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        order
    }

    pub fn find_by_name(&self, name: &str) -> Option<ComponentId> {
        self.document_order().into_iter().find(|id| {
            self.get(*id)
                .and_then(|c| c.name.as_deref())
                .is_some_and(|n| n == name)
        })
    }

    /// How the parent's coordinate space shifts for its children: a
    /// scrollable slides them by its scroll offset.
    fn child_adjustment(&self, parent: ComponentId) -> Point {
        let Some(component) = self.get(parent) else {
            return Point::ZERO;
        };
        match &component.scrollable {
            Some(props) => -props.position,
            None => Point::ZERO,
        }
    }

    /// Cumulative transform from the component's local frame to the
    /// viewport.
    pub fn global_transform(&self, id: ComponentId) -> Transform2D {
        let mut chain: SmallVec<[ComponentId; 8]> = self.ancestors(id);
        chain.reverse();
        chain.push(id);

        let mut transform = Transform2D::IDENTITY;
        let mut previous: Option<ComponentId> = None;
        for current in chain {
            if let Some(parent) = previous {
                let shift = self.child_adjustment(parent);
                if shift != Point::ZERO {
                    transform = transform.then(&Transform2D::translate(shift.x, shift.y));
                }
            }
            if let Some(component) = self.get(current) {
                transform = transform.then(&component.local_transform());
            }
            previous = Some(current);
        }
        transform
    }

    /// Axis-aligned viewport-space bounds.
    pub fn global_bounds(&self, id: ComponentId) -> Rect {
        let Some(component) = self.get(id) else {
            return Rect::ZERO;
        };
        let local = Rect::new(0.0, 0.0, component.bounds.width, component.bounds.height);
        self.global_transform(id).apply_rect(&local)
    }

    /// Map a viewport point into the component's local frame. `None` when an
    /// ancestor transform is singular.
    pub fn viewport_to_local(&self, id: ComponentId, point: Point) -> Option<Point> {
        self.global_transform(id)
            .invert()
            .map(|inverse| inverse.apply(point))
    }

    /// Effective global scale along the component's given axis.
    pub fn global_axis_scale(&self, id: ComponentId, axis: Axis) -> f32 {
        let scale = self
            .global_transform(id)
            .axis_scale(axis == Axis::Horizontal);
        if scale.abs() < 1e-6 { 1.0 } else { scale }
    }

    /// A component is reachable when no ancestor (or the component itself)
    /// is display:none or fully transparent, every clipping ancestor still
    /// shows some of it, and every paged ancestor has it on the current
    /// page.
    pub fn is_reachable(&self, id: ComponentId) -> bool {
        let Some(component) = self.get(id) else {
            return false;
        };
        if !component.display || component.opacity <= 0.0 {
            return false;
        }

        let bounds = self.global_bounds(id);
        let mut child = id;
        for ancestor in self.ancestors(id) {
            let Some(parent) = self.get(ancestor) else {
                return false;
            };
            if !parent.display || parent.opacity <= 0.0 {
                return false;
            }
            if let Some(pager) = &parent.pager {
                let page = self.children(ancestor).iter().position(|c| *c == child);
                if page != Some(pager.current_page) {
                    return false;
                }
            }
            if parent.scrollable.is_some() || parent.pager.is_some() {
                if !bounds.intersects(&self.global_bounds(ancestor)) {
                    return false;
                }
            }
            child = ancestor;
        }
        if let Some(root) = self.root {
            if root != id && !bounds.intersects(&self.global_bounds(root)) {
                return false;
            }
        }
        true
    }
}
