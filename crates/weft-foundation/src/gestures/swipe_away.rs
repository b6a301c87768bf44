//! SwipeAway: drag the content off along one axis, then settle to either
//! fully swiped or back to rest.

use smallvec::smallvec;
use weft_animation::{AnimationPlan, Easing};
use weft_core::{
    BindingValue, PointerEvent, SequencerMode, SwipeAwayParams, SwipeDirection, Timestamp,
};
use weft_graphics::Point;

use super::{Effects, GestureContext, GestureEffect, GestureFlags};

/// Below this much progress the gesture has not visibly begun.
const PROGRESS_EPSILON: f32 = 0.001;
/// Motion shorter than this is too noisy for the angle check.
const MIN_MOTION: f32 = 1.0;

#[derive(Debug)]
struct Settle {
    plan: AnimationPlan,
    fulfilled: bool,
}

#[derive(Debug)]
pub struct SwipeAwayGesture {
    params: SwipeAwayParams,
    pub(crate) flags: GestureFlags,
    start_position: Point,
    base_progress: f32,
    progress: f32,
    settle: Option<Settle>,
}

impl SwipeAwayGesture {
    pub fn new(params: SwipeAwayParams) -> Self {
        Self {
            params,
            flags: GestureFlags::default(),
            start_position: Point::ZERO,
            base_progress: 0.0,
            progress: 0.0,
            settle: None,
        }
    }

    pub fn reset(&mut self) {
        self.flags.reset();
        self.settle = None;
        self.base_progress = 0.0;
        self.progress = 0.0;
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    fn axis_extent(&self, ctx: &GestureContext) -> f32 {
        let extent = if self.params.direction.is_horizontal() {
            ctx.width
        } else {
            ctx.height
        };
        extent.max(1.0)
    }

    fn direction_name(&self) -> &'static str {
        match self.params.direction {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
        }
    }

    fn emit_move(&self, effects: &mut Effects) {
        effects.push(GestureEffect::SwipeOffset {
            progress: self.progress,
        });
        effects.push(GestureEffect::Fire {
            handler: "SwipeMove",
            commands: self.params.on_swipe_move.clone(),
            mode: SequencerMode::Fast,
            bindings: smallvec![
                ("position", BindingValue::Number(self.progress)),
                (
                    "direction",
                    BindingValue::Text(self.direction_name().into())
                ),
            ],
        });
    }

    pub(crate) fn on_down(&mut self, event: &PointerEvent, t: Timestamp, _ctx: &GestureContext) {
        // A new grab during settle takes over at the current value.
        if let Some(settle) = self.settle.take() {
            self.progress = settle.plan.value_at(t);
        }
        self.flags.started = true;
        self.start_position = event.position;
        self.base_progress = self.progress;
    }

    pub(crate) fn on_move(
        &mut self,
        event: &PointerEvent,
        _t: Timestamp,
        ctx: &GestureContext,
        effects: &mut Effects,
    ) {
        if self.settle.is_some() {
            return;
        }
        let local = ctx.to_local_vector(event.position - self.start_position);
        let along = local.x * self.params.direction.unit().x + local.y * self.params.direction.unit().y;

        if !self.flags.triggered {
            let magnitude = local.magnitude();
            if magnitude < MIN_MOTION {
                return;
            }
            if along <= 0.0 {
                self.reset();
                return;
            }
            let angle = (along / magnitude).clamp(-1.0, 1.0).acos();
            if angle > ctx.config.swipe_angle_tolerance {
                self.reset();
                return;
            }
        }

        let progress = (self.base_progress + along / self.axis_extent(ctx)).clamp(0.0, 1.0);
        if !self.flags.triggered && progress < PROGRESS_EPSILON {
            return;
        }
        self.flags.triggered = true;
        if (progress - self.progress).abs() > f32::EPSILON || self.progress == 0.0 {
            self.progress = progress;
            self.emit_move(effects);
        }
    }

    pub(crate) fn on_up(
        &mut self,
        _event: &PointerEvent,
        t: Timestamp,
        ctx: &GestureContext,
        effects: &mut Effects,
    ) {
        if !self.flags.triggered {
            self.reset();
            return;
        }
        if self.settle.is_some() {
            return;
        }

        let unit = self.params.direction.unit();
        let local_velocity = ctx.to_local_vector(ctx.velocity);
        let along_velocity = local_velocity.x * unit.x + local_velocity.y * unit.y;
        let fulfilled = self.progress >= ctx.config.swipe_fulfill_threshold
            || along_velocity >= ctx.config.swipe_velocity_threshold;

        self.start_settle(t, ctx, fulfilled, along_velocity);
        let _ = effects;
    }

    pub(crate) fn on_cancel(&mut self, t: Timestamp, ctx: &GestureContext, effects: &mut Effects) {
        if self.settle.is_some() {
            return;
        }
        // Revert from wherever we are; duration scales with the distance
        // left to cover.
        let default = ctx.config.default_swipe_animation_duration;
        let duration = ((default as f32 * self.progress) as i64).max(1);
        self.settle = Some(Settle {
            plan: AnimationPlan::new(t, duration, self.progress, 0.0, Easing::ease_out()),
            fulfilled: false,
        });
        let _ = effects;
    }

    fn start_settle(&mut self, t: Timestamp, ctx: &GestureContext, fulfilled: bool, velocity: f32) {
        let extent = self.axis_extent(ctx);
        let default = ctx.config.default_swipe_animation_duration;
        let max = ctx.config.max_swipe_animation_duration;

        let (target, duration) = if fulfilled {
            let remaining = (1.0 - self.progress) * extent;
            let speed = velocity
                .min(ctx.config.swipe_max_velocity)
                .max(1.0);
            let natural = (remaining / speed * 1000.0) as i64;
            (1.0, natural.clamp(default, max))
        } else {
            (0.0, ((default as f32 * self.progress) as i64).max(1))
        };

        self.settle = Some(Settle {
            plan: AnimationPlan::new(t, duration, self.progress, target, Easing::ease_out()),
            fulfilled,
        });
    }

    pub(crate) fn on_time_update(&mut self, t: Timestamp, effects: &mut Effects) {
        let Some(settle) = &self.settle else {
            return;
        };
        self.progress = settle.plan.value_at(t);
        self.emit_move(effects);

        if settle.plan.finished(t) {
            let fulfilled = settle.fulfilled;
            self.settle = None;
            if fulfilled {
                effects.push(GestureEffect::Fire {
                    handler: "SwipeDone",
                    commands: self.params.on_swipe_done.clone(),
                    mode: SequencerMode::Normal,
                    bindings: smallvec![(
                        "direction",
                        BindingValue::Text(self.direction_name().into())
                    )],
                });
                // The component stays in the swiped-away pose; only the
                // machine stands down.
                self.flags.reset();
            } else {
                self.progress = 0.0;
                self.flags.reset();
            }
        }
    }
}
