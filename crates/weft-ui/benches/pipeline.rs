//! Pointer pipeline throughput: hit-test plus dispatch over a deep list.

use criterion::{criterion_group, criterion_main, Criterion};
use weft_core::{
    Axis, Component, InteractionConfig, PointerEvent, PointerEventKind, ScrollableProps,
};
use weft_graphics::{Point, Rect};
use weft_ui::InteractionRuntime;

fn build_runtime(rows: usize) -> InteractionRuntime {
    let mut runtime = InteractionRuntime::new(InteractionConfig::default());
    let tree = runtime.tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 200.0, 300.0)));
    let scrollable = tree
        .add_child(
            root,
            Component::new(Rect::new(0.0, 0.0, 200.0, 300.0))
                .scrollable(ScrollableProps::new(Axis::Vertical, rows as f32 * 100.0)),
        )
        .expect("root is live");
    for index in 0..rows {
        let bounds = Rect::new(0.0, index as f32 * 100.0, 200.0, 100.0);
        let _ = tree.add_child(
            scrollable,
            Component::new(bounds).touchable(Default::default()),
        );
    }
    runtime
}

fn bench_drag_sequence(c: &mut Criterion) {
    c.bench_function("drag_sequence_100_rows", |b| {
        let mut runtime = build_runtime(100);
        let mut t = 0i64;
        b.iter(|| {
            t += 1000;
            runtime.update_time(t);
            runtime.handle_pointer_event(PointerEvent::new(
                PointerEventKind::Down,
                Point::new(100.0, 150.0),
            ));
            for step in 0..16 {
                runtime.update_time(t + step * 16);
                runtime.handle_pointer_event(PointerEvent::new(
                    PointerEventKind::Move,
                    Point::new(100.0, 150.0 - step as f32 * 10.0),
                ));
            }
            runtime.handle_pointer_event(PointerEvent::new(
                PointerEventKind::Up,
                Point::new(100.0, 0.0),
            ));
            runtime.update_time(t + 500);
            runtime.take_events();
        })
    });
}

fn bench_hit_test_miss(c: &mut Criterion) {
    c.bench_function("hit_test_miss_100_rows", |b| {
        let mut runtime = build_runtime(100);
        b.iter(|| {
            runtime.handle_pointer_event(PointerEvent::new(
                PointerEventKind::Down,
                Point::new(5000.0, 5000.0),
            ))
        })
    });
}

criterion_group!(benches, bench_drag_sequence, bench_hit_test_miss);
criterion_main!(benches);
