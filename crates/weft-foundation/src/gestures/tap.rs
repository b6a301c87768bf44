//! Tap: press and release without meaningful travel or speed.

use smallvec::smallvec;
use weft_core::{BindingValue, PointerEvent, SequencerMode, TapParams, Timestamp};
use weft_graphics::Point;

use super::{Effects, GestureContext, GestureEffect, GestureFlags};

#[derive(Debug)]
pub struct TapGesture {
    params: TapParams,
    pub(crate) flags: GestureFlags,
    completed: bool,
    start_time: Timestamp,
    start_position: Point,
}

impl TapGesture {
    pub fn new(params: TapParams) -> Self {
        Self {
            params,
            flags: GestureFlags::default(),
            completed: false,
            start_time: 0,
            start_position: Point::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.flags.reset();
        self.completed = false;
    }

    pub(crate) fn on_down(&mut self, event: &PointerEvent, t: Timestamp) {
        if self.completed {
            self.reset();
        }
        self.flags.started = true;
        self.start_time = t;
        self.start_position = event.position;
    }

    pub(crate) fn on_move(&mut self, event: &PointerEvent, ctx: &GestureContext) {
        let travel = (event.position - self.start_position).magnitude();
        if travel > self.max_travel(ctx) {
            self.reset();
        }
    }

    pub(crate) fn on_up(
        &mut self,
        event: &PointerEvent,
        t: Timestamp,
        ctx: &GestureContext,
        effects: &mut Effects,
    ) {
        let travel = (event.position - self.start_position).magnitude();
        let elapsed = (t - self.start_time).max(1) as f32;
        let average_velocity = travel / elapsed * 1000.0;

        if travel <= self.max_travel(ctx) && average_velocity <= self.max_velocity(ctx) {
            self.flags.triggered = true;
            self.completed = true;
            effects.push(GestureEffect::Fire {
                handler: "Tap",
                commands: self.params.on_tap.clone(),
                mode: SequencerMode::Normal,
                bindings: smallvec![
                    ("x", BindingValue::Number(event.position.x)),
                    ("y", BindingValue::Number(event.position.y)),
                ],
            });
        } else {
            self.reset();
        }
    }

    fn max_travel(&self, ctx: &GestureContext) -> f32 {
        self.params
            .max_travel
            .unwrap_or(ctx.config.maximum_tap_travel)
    }

    fn max_velocity(&self, ctx: &GestureContext) -> f32 {
        self.params
            .max_velocity
            .unwrap_or(ctx.config.maximum_tap_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::test_support::{context, fired};
    use weft_core::{InteractionConfig, PointerEventKind};

    fn gesture() -> TapGesture {
        TapGesture::new(TapParams::default())
    }

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(PointerEventKind::Down, Point::new(x, y))
    }

    fn up(x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(PointerEventKind::Up, Point::new(x, y))
    }

    #[test]
    fn clean_tap_fires() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut tap = gesture();
        let mut effects = Effects::new();

        tap.on_down(&down(10.0, 10.0), 0);
        tap.on_up(&up(12.0, 10.0), 100, &ctx, &mut effects);

        assert!(tap.flags.triggered);
        assert!(fired(&effects, "Tap").is_some());
    }

    #[test]
    fn excess_travel_resets_without_firing() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut tap = gesture();
        let mut effects = Effects::new();

        tap.on_down(&down(10.0, 10.0), 0);
        tap.on_move(
            &PointerEvent::new(PointerEventKind::Move, Point::new(40.0, 10.0)),
            &ctx,
        );
        assert!(!tap.flags.started);

        tap.on_up(&up(40.0, 10.0), 100, &ctx, &mut effects);
        assert!(fired(&effects, "Tap").is_none());
    }

    #[test]
    fn fast_release_is_not_a_tap() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut tap = gesture();
        let mut effects = Effects::new();

        tap.on_down(&down(10.0, 10.0), 0);
        // 8 px in 10 ms is 800 px/s, far over the default 50 px/s bound.
        tap.on_up(&up(18.0, 10.0), 10, &ctx, &mut effects);

        assert!(!tap.flags.triggered);
        assert!(fired(&effects, "Tap").is_none());
    }

    #[test]
    fn next_down_after_completion_restarts() {
        let config = InteractionConfig::default();
        let ctx = context(&config);
        let mut tap = gesture();
        let mut effects = Effects::new();

        tap.on_down(&down(10.0, 10.0), 0);
        tap.on_up(&up(10.0, 10.0), 100, &ctx, &mut effects);
        assert!(tap.flags.triggered);

        tap.on_down(&down(20.0, 20.0), 500);
        assert!(tap.flags.started);
        assert!(!tap.flags.triggered);
    }
}
