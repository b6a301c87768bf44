//! The headless test driver.

use weft_core::{
    ComponentId, HostEvent, InteractionConfig, PointerEvent, PointerEventKind, Timestamp,
};
use weft_graphics::Point;
use weft_ui::{InteractionRuntime, Key, KeyCode, KeyEventType};

/// Drives an [`InteractionRuntime`] the way a view host would: pointer and
/// key events in, explicit clock stepping, host events captured for
/// assertions.
pub struct TestHost {
    runtime: InteractionRuntime,
    time: Timestamp,
    captured: Vec<HostEvent>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_config(InteractionConfig::default())
    }

    pub fn with_config(config: InteractionConfig) -> Self {
        Self {
            runtime: InteractionRuntime::new(config),
            time: 0,
            captured: Vec::new(),
        }
    }

    pub fn runtime(&mut self) -> &mut InteractionRuntime {
        &mut self.runtime
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// Advance the clock and pump the runtime.
    pub fn advance(&mut self, ms: Timestamp) {
        self.time += ms;
        self.runtime.update_time(self.time);
        self.collect();
    }

    pub fn down(&mut self, x: f32, y: f32) -> bool {
        self.pointer(PointerEventKind::Down, x, y)
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        self.pointer(PointerEventKind::Move, x, y)
    }

    pub fn up(&mut self, x: f32, y: f32) -> bool {
        self.pointer(PointerEventKind::Up, x, y)
    }

    pub fn cancel_pointer(&mut self, x: f32, y: f32) -> bool {
        self.pointer(PointerEventKind::Cancel, x, y)
    }

    fn pointer(&mut self, kind: PointerEventKind, x: f32, y: f32) -> bool {
        let consumed = self
            .runtime
            .handle_pointer_event(PointerEvent::new(kind, Point::new(x, y)));
        self.runtime.clear_pending();
        self.collect();
        consumed
    }

    pub fn key_press(&mut self, code: KeyCode) -> bool {
        self.press_key(Key::new(code))
    }

    pub fn key_press_shifted(&mut self, code: KeyCode) -> bool {
        self.press_key(Key::new(code).with_shift())
    }

    fn press_key(&mut self, key: Key) -> bool {
        let handled = self.runtime.handle_key(KeyEventType::KeyDown, key);
        self.runtime.handle_key(KeyEventType::KeyUp, key);
        self.runtime.clear_pending();
        self.collect();
        handled
    }

    fn collect(&mut self) {
        self.captured.extend(self.runtime.take_events());
    }

    /// All captured events, oldest first; the buffer is cleared.
    pub fn events(&mut self) -> Vec<HostEvent> {
        self.collect();
        std::mem::take(&mut self.captured)
    }

    /// The `SendEvent` arguments captured so far, drained.
    pub fn sent(&mut self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::SendEvent { arguments, .. } => Some(arguments.join(",")),
                _ => None,
            })
            .collect()
    }

    /// Assert-and-drain helper: did a `SendEvent` with this argument fire?
    pub fn saw(&mut self, argument: &str) -> bool {
        self.sent().iter().any(|sent| sent == argument)
    }

    pub fn scroll_offset(&mut self, id: ComponentId) -> f32 {
        self.runtime
            .tree()
            .get(id)
            .and_then(|c| c.scrollable.as_ref())
            .map(|p| p.offset())
            .unwrap_or(f32::NAN)
    }

    pub fn current_page(&mut self, id: ComponentId) -> usize {
        self.runtime
            .tree()
            .get(id)
            .and_then(|c| c.pager.as_ref())
            .map(|p| p.current_page)
            .unwrap_or(usize::MAX)
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}
