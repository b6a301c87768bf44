//! DoublePress: one press resolved as either single or double with a
//! bounded delay between the two.

use smallvec::smallvec;
use weft_core::{DoublePressParams, PointerEvent, SequencerMode, Timestamp};

use super::{Effects, GestureContext, GestureEffect, GestureFlags};

#[derive(Debug)]
pub struct DoublePressGesture {
    params: DoublePressParams,
    pub(crate) flags: GestureFlags,
    between_presses: bool,
    start_time: Timestamp,
}

impl DoublePressGesture {
    pub fn new(params: DoublePressParams) -> Self {
        Self {
            params,
            flags: GestureFlags::default(),
            between_presses: false,
            start_time: 0,
        }
    }

    pub fn reset(&mut self) {
        self.flags.reset();
        self.between_presses = false;
    }

    fn timeout(&self, ctx: &GestureContext) -> Timestamp {
        self.params
            .timeout
            .unwrap_or(ctx.config.double_press_timeout)
    }

    pub(crate) fn on_down(&mut self, _event: &PointerEvent, t: Timestamp, effects: &mut Effects) {
        self.flags.started = true;
        self.start_time = t;
        if self.between_presses {
            // Second press began; let the ordinary handlers show feedback.
            self.between_presses = false;
            effects.push(GestureEffect::PassThrough { as_kind: None });
        }
    }

    pub(crate) fn on_time_update(&mut self, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        if self.between_presses && t >= self.start_time + self.timeout(ctx) {
            effects.push(GestureEffect::Fire {
                handler: "SinglePress",
                commands: self.params.on_single_press.clone(),
                mode: SequencerMode::Normal,
                bindings: smallvec![],
            });
            self.reset();
        }
    }

    pub(crate) fn on_up(&mut self, _event: &PointerEvent, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        if self.flags.triggered {
            self.on_second_up(effects);
        } else {
            self.on_first_up(t, ctx, effects);
        }
    }

    fn on_first_up(&mut self, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        if t >= self.start_time + self.timeout(ctx) {
            // Too slow for a double press; stand down so the ordinary
            // press handling fires instead.
            self.reset();
            return;
        }
        self.between_presses = true;
        self.flags.triggered = true;
        // Re-arm the window between the presses.
        self.start_time = t;
        // The first Up still reaches the component so visual feedback runs.
        effects.push(GestureEffect::PassThrough { as_kind: None });
    }

    fn on_second_up(&mut self, effects: &mut Effects) {
        // The press is a double press; cancel the ordinary press handling
        // before firing the author callback.
        effects.push(GestureEffect::SyntheticCancel);
        effects.push(GestureEffect::Fire {
            handler: "DoublePress",
            commands: self.params.on_double_press.clone(),
            mode: SequencerMode::Normal,
            bindings: smallvec![],
        });
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::test_support::{context, fired};
    use weft_core::{InteractionConfig, PointerEventKind};
    use weft_graphics::Point;

    fn down() -> PointerEvent {
        PointerEvent::new(PointerEventKind::Down, Point::new(5.0, 5.0))
    }

    fn up() -> PointerEvent {
        PointerEvent::new(PointerEventKind::Up, Point::new(5.0, 5.0))
    }

    fn gesture() -> DoublePressGesture {
        DoublePressGesture::new(DoublePressParams::default())
    }

    #[test]
    fn two_quick_presses_fire_double() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut press = gesture();
        let mut effects = Effects::new();

        press.on_down(&down(), 0, &mut effects);
        press.on_up(&up(), 100, &ctx, &mut effects);
        assert!(press.flags.triggered);

        press.on_down(&down(), 200, &mut effects);
        effects.clear();
        press.on_up(&up(), 300, &ctx, &mut effects);

        assert!(fired(&effects, "DoublePress").is_some());
        // The ordinary press must be cancelled first.
        assert!(matches!(effects[0], GestureEffect::SyntheticCancel));
        assert!(!press.flags.started);
    }

    #[test]
    fn timeout_between_presses_fires_single() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut press = gesture();
        let mut effects = Effects::new();

        press.on_down(&down(), 0, &mut effects);
        press.on_up(&up(), 100, &ctx, &mut effects);
        effects.clear();

        press.on_time_update(400, &ctx, &mut effects);
        assert!(fired(&effects, "SinglePress").is_none());

        press.on_time_update(600, &ctx, &mut effects);
        assert!(fired(&effects, "SinglePress").is_some());
        assert!(!press.flags.started);
    }

    #[test]
    fn slow_first_press_stands_down() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut press = gesture();
        let mut effects = Effects::new();

        press.on_down(&down(), 0, &mut effects);
        press.on_up(&up(), 700, &ctx, &mut effects);

        assert!(!press.flags.triggered);
        assert!(!press.flags.started);
        assert!(effects.is_empty());
    }

    #[test]
    fn second_down_passes_through() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut press = gesture();
        let mut effects = Effects::new();

        press.on_down(&down(), 0, &mut effects);
        press.on_up(&up(), 100, &ctx, &mut effects);
        effects.clear();

        press.on_down(&down(), 200, &mut effects);
        assert!(matches!(
            effects[0],
            GestureEffect::PassThrough { as_kind: None }
        ));
    }

    #[test]
    fn author_timeout_wins() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut press = DoublePressGesture::new(DoublePressParams {
            timeout: Some(100),
            ..DoublePressParams::default()
        });
        let mut effects = Effects::new();

        press.on_down(&down(), 0, &mut effects);
        press.on_up(&up(), 150, &ctx, &mut effects);
        assert!(!press.flags.triggered);
    }
}
