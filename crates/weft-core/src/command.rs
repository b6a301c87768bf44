//! Author command batches and the sequencer queue.
//!
//! The core never runs author logic inline. Handlers and gesture callbacks
//! submit batches here; the runtime drains the queue between pumps and
//! interprets each command. That keeps author-triggered scrolls scheduled
//! rather than reentrant.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::events::HandlerKind;
use crate::tree::ComponentId;

/// A single author command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Surface author-defined arguments to the host.
    SendEvent { arguments: Vec<String> },
    /// Scroll a named scrollable by a distance in viewport extents.
    Scroll { target: String, distance: f32 },
    /// Scroll a named scrollable so the given child sits at its leading
    /// edge.
    ScrollToIndex { target: String, index: usize },
    /// Change a named pager's page.
    SetPage { target: String, page: PageTarget },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageTarget {
    Absolute(usize),
    Relative(i32),
}

pub type CommandBatch = SmallVec<[Command; 1]>;

/// How a batch enters the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerMode {
    /// Runs alongside any in-flight normal-mode work.
    Fast,
    /// Resets the sequencer first; used for Press and gesture commits.
    Normal,
}

/// A value bound into the event scope of a batch (`event.amount`,
/// `event.forward`, ...).
#[derive(Clone, Debug, PartialEq)]
pub enum BindingValue {
    Number(f32),
    Bool(bool),
    Text(String),
    Component(ComponentId),
}

pub type Binding = (&'static str, BindingValue);

/// A batch waiting in the sequencer.
#[derive(Clone, Debug)]
pub struct PendingBatch {
    pub source: ComponentId,
    /// The handler slot or gesture callback that produced the batch.
    pub handler: &'static str,
    pub commands: CommandBatch,
    pub mode: SequencerMode,
    pub bindings: SmallVec<[Binding; 4]>,
}

/// FIFO command sequencer.
///
/// Scheduling internals live with the host; this queue only preserves the
/// fast/normal contract: a normal-mode submission cancels queued normal-mode
/// work, fast work is never disturbed.
#[derive(Debug, Default)]
pub struct CommandSequencer {
    queue: VecDeque<PendingBatch>,
}

impl CommandSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, batch: PendingBatch) {
        if batch.commands.is_empty() {
            return;
        }
        if batch.mode == SequencerMode::Normal {
            self.reset();
        }
        log::trace!(
            "sequencer: {} batch from {:?} ({} commands)",
            batch.handler,
            batch.source,
            batch.commands.len()
        );
        self.queue.push_back(batch);
    }

    /// Convenience for handler submissions.
    pub fn submit_handler(
        &mut self,
        source: ComponentId,
        kind: HandlerKind,
        commands: CommandBatch,
        bindings: SmallVec<[Binding; 4]>,
    ) {
        let mode = if kind.executes_fast() {
            SequencerMode::Fast
        } else {
            SequencerMode::Normal
        };
        self.submit(PendingBatch {
            source,
            handler: kind.name(),
            commands,
            mode,
            bindings,
        });
    }

    /// Drop queued normal-mode batches.
    pub fn reset(&mut self) {
        self.queue.retain(|batch| batch.mode == SequencerMode::Fast);
    }

    pub fn drain(&mut self) -> Vec<PendingBatch> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop everything; used when the document is released.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn send(argument: &str) -> CommandBatch {
        smallvec![Command::SendEvent {
            arguments: vec![argument.into()],
        }]
    }

    fn batch(source: ComponentId, mode: SequencerMode, argument: &str) -> PendingBatch {
        PendingBatch {
            source,
            handler: "Test",
            commands: send(argument),
            mode,
            bindings: SmallVec::new(),
        }
    }

    fn any_id() -> ComponentId {
        let mut tree = crate::tree::ComponentTree::new();
        tree.set_root(crate::component::Component::new(
            weft_graphics::Rect::new(0.0, 0.0, 1.0, 1.0),
        ))
    }

    #[test]
    fn normal_submission_resets_queued_normal_work() {
        let id = any_id();
        let mut sequencer = CommandSequencer::new();
        sequencer.submit(batch(id, SequencerMode::Normal, "first"));
        sequencer.submit(batch(id, SequencerMode::Fast, "fast"));
        sequencer.submit(batch(id, SequencerMode::Normal, "second"));

        let drained = sequencer.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].commands, send("fast"));
        assert_eq!(drained[1].commands, send("second"));
    }

    #[test]
    fn empty_batches_are_ignored() {
        let id = any_id();
        let mut sequencer = CommandSequencer::new();
        sequencer.submit(PendingBatch {
            source: id,
            handler: "Test",
            commands: CommandBatch::new(),
            mode: SequencerMode::Normal,
            bindings: SmallVec::new(),
        });
        assert!(sequencer.is_empty());
    }

    #[test]
    fn handler_mode_follows_kind() {
        let id = any_id();
        let mut sequencer = CommandSequencer::new();
        sequencer.submit_handler(id, HandlerKind::Press, send("press"), SmallVec::new());
        sequencer.submit_handler(id, HandlerKind::Down, send("down"), SmallVec::new());
        let drained = sequencer.drain();
        assert_eq!(drained[0].mode, SequencerMode::Normal);
        assert_eq!(drained[1].mode, SequencerMode::Fast);
    }
}
