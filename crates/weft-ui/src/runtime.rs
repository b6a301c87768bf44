//! The host-facing runtime facade.
//!
//! One object owns the shared component tree and the four engines, and
//! exposes the entry points of the scheduling contract: events in, a pump to
//! advance time, and a queue of host events out. All state changes happen on
//! the host thread inside these calls.

use std::collections::VecDeque;

use weft_core::{
    Capability, Command, CommandSequencer, ComponentId, ComponentTree, FocusDirection, HostEvent,
    InteractionConfig, PageTarget, PointerEvent, PointerEventKind, Timestamp,
};
use weft_graphics::{Point, Rect};

use crate::focus::FocusManager;
use crate::key_event::{Key, KeyEventType};
use crate::pager::PagerEngine;
use crate::pointer::PointerPipeline;
use crate::scroller::ScrollerEngine;

pub struct InteractionRuntime {
    tree: ComponentTree,
    config: InteractionConfig,
    sequencer: CommandSequencer,
    events: VecDeque<HostEvent>,
    pipeline: PointerPipeline,
    scroller: ScrollerEngine,
    pager: PagerEngine,
    focus: FocusManager,
    time: Timestamp,
}

impl Default for InteractionRuntime {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl InteractionRuntime {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            tree: ComponentTree::new(),
            config,
            sequencer: CommandSequencer::new(),
            events: VecDeque::new(),
            pipeline: PointerPipeline::new(),
            scroller: ScrollerEngine::new(),
            pager: PagerEngine::new(),
            focus: FocusManager::new(),
            time: 0,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// Direct tree access for document construction and layout updates.
    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    /// Remove a component (and subtree) with the interaction bookkeeping:
    /// gestures are dropped and focus loss is reported.
    pub fn remove_component(&mut self, id: ComponentId) {
        let removed = self.tree.remove(id);
        if removed.is_empty() {
            return;
        }
        self.pipeline.forget(&removed);
        for id in &removed {
            self.scroller.cancel(*id);
            self.pager.cancel(*id);
        }
        self.focus
            .handle_removed(&mut self.tree, &mut self.events, &removed);
    }

    /// Release the whole document: every gesture dies, every pending action
    /// terminates, nothing survives but the configuration.
    pub fn release_document(&mut self) {
        if let Some(root) = self.tree.root() {
            let removed = self.tree.remove(root);
            self.focus
                .handle_removed(&mut self.tree, &mut self.events, &removed);
        }
        self.pipeline.release();
        self.scroller.cancel_all();
        self.pager.cancel_all();
        self.sequencer.clear();
        self.focus.release();
    }

    /// Pointer entry point. Returns true iff a gesture consumed the event,
    /// in which case the host must not propagate it further.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        let mut flinging = Vec::new();
        if event.kind == PointerEventKind::Down {
            // A fresh interaction terminates in-flight animations at value;
            // a Down over a settling scrollable takes the motion over.
            flinging = self.scroller.animating_ids();
            self.scroller.cancel_all();
            self.pager.cancel_all();
        }
        let outcome = self.pipeline.handle_pointer_event_with_flings(
            &mut self.tree,
            &self.config,
            &mut self.sequencer,
            &mut self.scroller,
            &mut self.pager,
            &event,
            self.time,
            &flinging,
        );

        if self.config.focus_edit_text_on_tap {
            if let Some(released) = outcome.released_on {
                if let Some(edit) = self.edit_text_for(released) {
                    if self
                        .focus
                        .set_focus(&mut self.tree, &mut self.events, edit, None)
                    {
                        self.events.push_back(HostEvent::OpenKeyboard { component: edit });
                    }
                }
            }
        }
        outcome.consumed
    }

    /// Keyboard entry point. Returns true iff the engine acted on the key.
    pub fn handle_key(&mut self, event_type: KeyEventType, key: Key) -> bool {
        if let Some(direction) = key.focus_direction() {
            if event_type == KeyEventType::KeyDown {
                self.focus.next_focus(
                    &mut self.tree,
                    &self.config,
                    &mut self.events,
                    &mut self.pager,
                    direction,
                );
            }
            return true;
        }
        if key.is_press_key() {
            let Some(focused) = self.focus.focus() else {
                return false;
            };
            let is_touchable = self
                .tree
                .get(focused)
                .is_some_and(|c| c.is(Capability::Touchable));
            if !is_touchable {
                return false;
            }
            self.pipeline.press_via_key(
                &mut self.tree,
                &mut self.sequencer,
                focused,
                event_type == KeyEventType::KeyDown,
            );
            return true;
        }
        false
    }

    /// Advance the host clock: animations first, then a synthetic TimeUpdate
    /// to the active gesture target, then pending command completions.
    pub fn update_time(&mut self, t: Timestamp) {
        self.time = t;

        self.scroller.tick(
            &mut self.tree,
            &self.config,
            t,
            &mut self.sequencer,
            &mut self.events,
        );
        let commits = self
            .pager
            .tick(&mut self.tree, &mut self.sequencer, &mut self.events, t);
        for commit in commits {
            self.focus.handle_page_changed(
                &mut self.tree,
                &mut self.events,
                commit.pager,
                commit.old_page,
            );
        }

        if self.pipeline.time_update_target().is_some() {
            let position = self.pipeline.last_known_position().unwrap_or(Point::ZERO);
            let tick = PointerEvent::new(PointerEventKind::TimeUpdate, position);
            self.pipeline.handle_pointer_event(
                &mut self.tree,
                &self.config,
                &mut self.sequencer,
                &mut self.scroller,
                &mut self.pager,
                &tick,
                t,
            );
        }

        self.clear_pending();
    }

    /// Finalize dispatched commands and poll outstanding focus actions.
    pub fn clear_pending(&mut self) {
        let batches = self.sequencer.drain();
        for batch in batches {
            for command in batch.commands.clone() {
                self.run_command(batch.source, command);
            }
        }
        self.focus.poll_release(&mut self.tree);
    }

    fn run_command(&mut self, source: ComponentId, command: Command) {
        match command {
            Command::SendEvent { arguments } => {
                self.events
                    .push_back(HostEvent::SendEvent { source, arguments });
            }
            Command::Scroll { target, distance } => {
                let Some(id) = self.tree.find_by_name(&target) else {
                    log::warn!("Scroll command targets unknown component {target:?}");
                    return;
                };
                self.scroller
                    .start_command(&mut self.tree, &self.config, id, distance, self.time);
            }
            Command::ScrollToIndex { target, index } => {
                let Some(id) = self.tree.find_by_name(&target) else {
                    log::warn!("ScrollToIndex command targets unknown component {target:?}");
                    return;
                };
                self.scroller
                    .start_to_index(&mut self.tree, &self.config, id, index, self.time);
            }
            Command::SetPage { target, page } => {
                let Some(id) = self.tree.find_by_name(&target) else {
                    log::warn!("SetPage command targets unknown component {target:?}");
                    return;
                };
                let count = self.tree.children(id).len();
                let current = self
                    .tree
                    .get(id)
                    .and_then(|c| c.pager.as_ref())
                    .map(|p| p.current_page)
                    .unwrap_or(0);
                let absolute = match page {
                    PageTarget::Absolute(index) => index,
                    PageTarget::Relative(delta) => {
                        let raw = current as i64 + delta as i64;
                        raw.clamp(0, count.saturating_sub(1) as i64) as usize
                    }
                };
                self.pager
                    .set_page(&mut self.tree, &self.config, id, absolute, self.time);
            }
        }
    }

    /// Host- or document-driven command batch; queued like any author batch
    /// and executed on the next pump.
    pub fn execute_commands(&mut self, commands: weft_core::CommandBatch) {
        let Some(root) = self.tree.root() else {
            return;
        };
        self.sequencer.submit(weft_core::PendingBatch {
            source: root,
            handler: "Host",
            commands,
            mode: weft_core::SequencerMode::Normal,
            bindings: smallvec::SmallVec::new(),
        });
    }

    // Focus operations, delegated to the focus manager.

    pub fn set_focus(&mut self, id: ComponentId, direction: Option<FocusDirection>) -> bool {
        self.focus
            .set_focus(&mut self.tree, &mut self.events, id, direction)
    }

    pub fn clear_focus(&mut self) {
        self.focus.clear_focus(&mut self.tree, &mut self.events);
    }

    pub fn next_focus(&mut self, direction: FocusDirection) -> bool {
        self.focus.next_focus(
            &mut self.tree,
            &self.config,
            &mut self.events,
            &mut self.pager,
            direction,
        )
    }

    pub fn focus(&self) -> Option<ComponentId> {
        self.focus.focus()
    }

    pub fn focusable_areas(&self) -> indexmap::IndexMap<ComponentId, Rect> {
        self.focus.focusable_areas(&self.tree)
    }

    // Host event queue.

    pub fn pop_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        self.events.drain(..).collect()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// The touchable's edit-text tap target: itself when it is an edit
    /// text, or its only child when that child is one.
    fn edit_text_for(&self, id: ComponentId) -> Option<ComponentId> {
        let component = self.tree.get(id)?;
        if component.is(Capability::EditText) {
            return Some(id);
        }
        if !component.is(Capability::Touchable) {
            return None;
        }
        let children = self.tree.children(id);
        if children.len() != 1 {
            return None;
        }
        let child = children[0];
        if self.tree.get(child)?.is(Capability::EditText) {
            Some(child)
        } else {
            None
        }
    }
}
