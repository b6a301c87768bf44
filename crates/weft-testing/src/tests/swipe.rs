//! SwipeAway end-to-end: fulfill, revert, and the scroll interaction.

use smallvec::smallvec;
use weft_core::{
    Axis, Command, GestureDescriptor, ScrollableProps, SwipeAwayParams, SwipeDirection,
};
use weft_graphics::Rect;
use crate::{swipe_away_item, TestHost};

fn swipe_position(host: &mut TestHost, id: weft_core::ComponentId) -> f32 {
    host.runtime()
        .tree()
        .get(id)
        .and_then(|c| c.touchable.as_ref())
        .map(|t| t.swipe_position)
        .unwrap_or(f32::NAN)
}

#[test]
fn slow_drag_past_half_fulfills_on_release() {
    let mut host = TestHost::new();
    let item = swipe_away_item(host.runtime(), SwipeDirection::Left);

    assert!(!host.down(400.0, 50.0));
    host.advance(2000);
    assert!(host.move_to(50.0, 50.0));
    assert!(host.saw("swipeMove"));
    assert!((swipe_position(&mut host, item) - 0.7).abs() < 0.01);

    assert!(host.up(50.0, 50.0));
    host.advance(2000);

    assert!(host.saw("swipeDone"));
    assert!((swipe_position(&mut host, item) - 1.0).abs() < 1e-3);
}

#[test]
fn short_drag_reverts_without_firing_done() {
    let mut host = TestHost::new();
    let item = swipe_away_item(host.runtime(), SwipeDirection::Left);

    host.down(400.0, 50.0);
    host.advance(1000);
    assert!(host.move_to(300.0, 50.0));
    host.advance(1000);
    assert!(host.up(300.0, 50.0));
    host.advance(1000);

    assert!(!host.saw("swipeDone"));
    assert!(swipe_position(&mut host, item).abs() < 1e-3);
}

#[test]
fn fast_flick_fulfills_below_half() {
    let mut host = TestHost::new();
    let item = swipe_away_item(host.runtime(), SwipeDirection::Left);

    host.down(400.0, 50.0);
    host.advance(100);
    // 150 px in 100 ms is 1500 px/s, far over the 500 px/s threshold.
    assert!(host.move_to(250.0, 50.0));
    assert!(host.up(250.0, 50.0));
    host.advance(1000);

    assert!(host.saw("swipeDone"));
    assert!((swipe_position(&mut host, item) - 1.0).abs() < 1e-3);
}

#[test]
fn wrong_direction_never_triggers() {
    let mut host = TestHost::new();
    let item = swipe_away_item(host.runtime(), SwipeDirection::Left);

    host.down(100.0, 50.0);
    host.advance(100);
    assert!(!host.move_to(300.0, 50.0));
    host.up(300.0, 50.0);
    host.advance(1000);

    assert!(!host.saw("swipeMove"));
    assert_eq!(swipe_position(&mut host, item), 0.0);
}

#[test]
fn host_cancel_animates_back_to_rest() {
    let mut host = TestHost::new();
    let item = swipe_away_item(host.runtime(), SwipeDirection::Left);

    host.down(400.0, 50.0);
    host.advance(500);
    assert!(host.move_to(100.0, 50.0));
    assert!(host.cancel_pointer(100.0, 50.0));
    host.advance(1000);

    assert!(!host.saw("swipeDone"));
    assert!(swipe_position(&mut host, item).abs() < 1e-3);
}

/// A swipeable row inside a vertical scrollable: horizontal motion swipes,
/// vertical motion scrolls and cancels the row.
fn swipe_row_in_scrollable(host: &mut TestHost) -> (weft_core::ComponentId, weft_core::ComponentId) {
    let tree = host.runtime().tree_mut();
    let root = tree.set_root(weft_core::Component::new(Rect::new(0.0, 0.0, 200.0, 300.0)));
    let scrollable = tree
        .add_child(
            root,
            weft_core::Component::new(Rect::new(0.0, 0.0, 200.0, 300.0))
                .scrollable(ScrollableProps::new(Axis::Vertical, 1200.0)),
        )
        .unwrap();
    let mut params = SwipeAwayParams::new(SwipeDirection::Left);
    params.on_swipe_done = smallvec![Command::SendEvent {
        arguments: vec!["swipeDone".into()],
    }];
    let mut props = weft_core::TouchableProps::default();
    props.gestures.push(GestureDescriptor::SwipeAway(params));
    let row = tree
        .add_child(
            scrollable,
            weft_core::Component::new(Rect::new(0.0, 0.0, 200.0, 100.0))
                .named("row")
                .touchable(props),
        )
        .unwrap();
    for index in 1..12 {
        let _ = tree.add_child(
            scrollable,
            weft_core::Component::new(Rect::new(0.0, index as f32 * 100.0, 200.0, 100.0)),
        );
    }
    (scrollable, row)
}

#[test]
fn horizontal_motion_swipes_instead_of_scrolling() {
    let mut host = TestHost::new();
    let (scrollable, _row) = swipe_row_in_scrollable(&mut host);

    host.down(180.0, 50.0);
    host.advance(200);
    assert!(host.move_to(60.0, 50.0));
    host.up(60.0, 50.0);
    host.advance(1000);

    assert!(host.saw("swipeDone"));
    assert_eq!(host.scroll_offset(scrollable), 0.0);
}

#[test]
fn vertical_motion_scrolls_through_the_swipeable() {
    let mut host = TestHost::new();
    let (scrollable, _row) = swipe_row_in_scrollable(&mut host);

    host.down(100.0, 90.0);
    host.advance(200);
    assert!(host.move_to(100.0, 40.0));
    host.up(100.0, 40.0);

    assert_eq!(host.scroll_offset(scrollable), 50.0);
    assert!(!host.saw("swipeDone"));
}
