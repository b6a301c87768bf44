//! LongPress: hold without travel until the timeout elapses.

use smallvec::smallvec;
use weft_core::{
    BindingValue, HandlerKind, LongPressParams, PointerEvent, SequencerMode, Timestamp,
};
use weft_graphics::Point;

use super::{Effects, GestureContext, GestureEffect, GestureFlags};

#[derive(Debug)]
pub struct LongPressGesture {
    params: LongPressParams,
    pub(crate) flags: GestureFlags,
    start_time: Timestamp,
    start_position: Point,
}

impl LongPressGesture {
    pub fn new(params: LongPressParams) -> Self {
        Self {
            params,
            flags: GestureFlags::default(),
            start_time: 0,
            start_position: Point::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.flags.reset();
    }

    pub(crate) fn on_down(&mut self, event: &PointerEvent, t: Timestamp) {
        self.flags.started = true;
        self.flags.triggered = false;
        self.start_time = t;
        self.start_position = event.position;
    }

    pub(crate) fn on_move(&mut self, event: &PointerEvent, ctx: &GestureContext) {
        if self.flags.triggered {
            return;
        }
        let travel = (event.position - self.start_position).magnitude();
        if travel > ctx.config.maximum_tap_travel {
            self.reset();
        }
    }

    pub(crate) fn on_time_update(
        &mut self,
        event: &PointerEvent,
        t: Timestamp,
        ctx: &GestureContext,
        effects: &mut Effects,
    ) {
        if self.flags.triggered {
            return;
        }
        let timeout = self.params.timeout.unwrap_or(ctx.config.long_press_timeout);
        if t - self.start_time < timeout {
            return;
        }
        self.flags.triggered = true;
        effects.push(GestureEffect::Fire {
            handler: "LongPressStart",
            commands: self.params.on_long_press_start.clone(),
            mode: SequencerMode::Normal,
            bindings: smallvec![
                ("x", BindingValue::Number(event.position.x)),
                ("y", BindingValue::Number(event.position.y)),
            ],
        });
        // Let the component's own handlers run too (visual feedback); the
        // tick has no handler slot of its own so it lands on Move.
        effects.push(GestureEffect::PassThrough {
            as_kind: Some(HandlerKind::Move),
        });
    }

    pub(crate) fn on_up(&mut self, effects: &mut Effects) {
        if self.flags.triggered {
            effects.push(GestureEffect::Fire {
                handler: "LongPressEnd",
                commands: self.params.on_long_press_end.clone(),
                mode: SequencerMode::Normal,
                bindings: smallvec![],
            });
        }
        self.reset();
    }

    pub(crate) fn on_cancel(&mut self, effects: &mut Effects) {
        if self.flags.triggered {
            effects.push(GestureEffect::Fire {
                handler: "LongPressEnd",
                commands: self.params.on_long_press_end.clone(),
                mode: SequencerMode::Normal,
                bindings: smallvec![],
            });
        }
        self.reset();
    }
}
