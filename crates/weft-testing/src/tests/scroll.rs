//! Scroll capture, fling, and tap disambiguation.

use weft_core::InteractionConfig;
use weft_graphics::Transform2D;
use crate::{vertical_sequence, TestHost};

#[test]
fn fling_scrolls_and_settles() {
    let mut host = TestHost::new();
    let scrollable = vertical_sequence(host.runtime(), 12);

    assert!(!host.down(0.0, 100.0));
    assert!(host.saw("onDown:item1"));

    host.advance(200);
    assert!(host.move_to(0.0, 50.0));
    // Capture steals the interaction from the touchable exactly once.
    let sent = host.sent();
    assert_eq!(sent.iter().filter(|s| *s == "onCancel:item1").count(), 1);
    assert_eq!(host.scroll_offset(scrollable), 50.0);

    host.advance(200);
    assert!(host.move_to(0.0, 0.0));
    assert!(host.up(0.0, 0.0));
    assert_eq!(host.scroll_offset(scrollable), 100.0);

    host.advance(2600);
    assert!((host.scroll_offset(scrollable) - 725.0).abs() < 1.0);

    // No press leaked through the capture.
    assert!(!host.saw("onPress:item1"));
}

#[test]
fn fling_back_returns_to_origin() {
    let mut host = TestHost::new();
    let scrollable = vertical_sequence(host.runtime(), 12);

    // Scroll down to 725 first.
    host.down(0.0, 100.0);
    host.advance(200);
    host.move_to(0.0, 50.0);
    host.advance(200);
    host.move_to(0.0, 0.0);
    host.up(0.0, 0.0);
    host.advance(2600);
    assert!((host.scroll_offset(scrollable) - 725.0).abs() < 1.0);

    // Equal motion the other way lands back at zero.
    host.down(0.0, 100.0);
    host.advance(200);
    host.move_to(0.0, 150.0);
    host.advance(200);
    host.move_to(0.0, 200.0);
    host.up(0.0, 200.0);
    host.advance(2600);
    assert!(host.scroll_offset(scrollable).abs() < 1.0);
}

#[test]
fn small_slow_release_is_a_press_not_a_scroll() {
    let mut host = TestHost::new();
    let scrollable = vertical_sequence(host.runtime(), 12);

    assert!(!host.down(0.0, 150.0));
    host.advance(100);
    // Travel below the slop threshold never scrolls.
    assert!(!host.move_to(0.0, 145.0));
    host.advance(300);
    assert!(!host.up(0.0, 140.0));

    assert_eq!(host.scroll_offset(scrollable), 0.0);
    let sent = host.sent();
    assert!(sent.contains(&"onUp:item1".to_string()));
    assert!(sent.contains(&"onPress:item1".to_string()));
    assert!(!sent.contains(&"onCancel:item1".to_string()));
}

#[test]
fn moves_before_the_timeout_do_not_capture() {
    let config = InteractionConfig::default().set_tap_or_scroll_timeout(60);
    let mut host = TestHost::with_config(config);
    let scrollable = vertical_sequence(host.runtime(), 12);

    host.down(1.0, 100.0);
    host.advance(50);
    // Under the timeout: recognized as pointer motion, not as a scroll.
    assert!(!host.move_to(1.0, 75.0));
    assert!(host.saw("onMove:item1"));
    assert_eq!(host.scroll_offset(scrollable), 0.0);

    host.advance(50);
    // Past the timeout the accumulated travel applies in one step.
    assert!(host.move_to(1.0, 50.0));
    assert!(host.saw("onCancel:item1"));
    assert_eq!(host.scroll_offset(scrollable), 50.0);

    assert!(host.up(1.0, 50.0));
    host.advance(2900);
    // 500 px/s would run 1250 px; the content edge clamps it.
    assert_eq!(host.scroll_offset(scrollable), 900.0);
}

#[test]
fn thresholds_stay_global_under_scaling() {
    let mut host = TestHost::new();
    let scrollable = vertical_sequence(host.runtime(), 12);
    host.runtime().tree_mut().get_mut(scrollable).unwrap().transform =
        Transform2D::scale(2.0, 2.0);

    host.down(0.0, 100.0);
    host.advance(100);
    // 12 global px of travel beats the slop even though that is only 6
    // local px; the applied delta is divided by the scale.
    assert!(host.move_to(0.0, 88.0));
    assert_eq!(host.scroll_offset(scrollable), 6.0);

    assert!(host.up(0.0, 88.0));
    host.advance(4900);
    // 120 px/s global is 60 px/s of content motion: 150 px of travel.
    assert!((host.scroll_offset(scrollable) - 156.0).abs() < 1.0);
}

#[test]
fn new_down_stops_a_settling_fling_where_it_is() {
    let mut host = TestHost::new();
    let scrollable = vertical_sequence(host.runtime(), 12);

    host.down(0.0, 100.0);
    host.advance(200);
    host.move_to(0.0, 50.0);
    host.advance(200);
    host.move_to(0.0, 0.0);
    host.up(0.0, 0.0);

    host.advance(1600);
    let interrupted_at = host.scroll_offset(scrollable);
    assert!(interrupted_at > 100.0 && interrupted_at < 725.0);

    // The next Down freezes the animation at its current value.
    assert!(host.down(0.0, 100.0));
    host.advance(1000);
    host.up(0.0, 100.0);
    host.advance(500);
    assert_eq!(host.scroll_offset(scrollable), interrupted_at);
}

#[test]
fn down_outside_every_component_is_rejected() {
    let mut host = TestHost::new();
    vertical_sequence(host.runtime(), 3);

    assert!(!host.down(500.0, 500.0));
    assert!(host.sent().is_empty());
}
