//! Page flings, navigation policy, and the page-move hook.

use smallvec::smallvec;
use weft_core::{Command, HostEvent, PagerNavigation, PageTarget};
use crate::{horizontal_pager, TestHost};

fn page_changed_count(events: &[HostEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, HostEvent::PageChanged { .. }))
        .count()
}

#[test]
fn wrap_fling_from_last_page_lands_on_first() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 6, PagerNavigation::Wrap);
    host.runtime()
        .tree_mut()
        .get_mut(pager)
        .unwrap()
        .pager
        .as_mut()
        .unwrap()
        .current_page = 5;

    assert!(!host.down(400.0, 10.0));
    host.advance(100);
    assert!(host.move_to(100.0, 10.0));
    assert!(host.up(100.0, 10.0));

    host.advance(1500);
    assert_eq!(host.current_page(pager), 0);
    assert_eq!(page_changed_count(&host.events()), 1);
}

#[test]
fn normal_navigation_refuses_to_advance_past_the_end() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 3, PagerNavigation::Normal);
    host.runtime()
        .tree_mut()
        .get_mut(pager)
        .unwrap()
        .pager
        .as_mut()
        .unwrap()
        .current_page = 2;

    host.down(400.0, 10.0);
    host.advance(100);
    // No page ahead: the paging gesture never takes the stream.
    assert!(!host.move_to(100.0, 10.0));
    host.up(100.0, 10.0);
    host.advance(1500);
    assert_eq!(host.current_page(pager), 2);
    assert_eq!(page_changed_count(&host.events()), 0);
}

#[test]
fn slow_release_under_half_reverts() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 3, PagerNavigation::Normal);

    host.down(400.0, 10.0);
    host.advance(100);
    assert!(host.move_to(385.0, 10.0));
    // Hold still long enough for the tracked velocity to die out.
    host.advance(400);
    host.move_to(250.0, 10.0);
    host.advance(300);
    host.up(250.0, 10.0);

    host.advance(1500);
    assert_eq!(host.current_page(pager), 0);
    assert_eq!(page_changed_count(&host.events()), 0);
}

#[test]
fn fast_fling_commits_exactly_one_page() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 6, PagerNavigation::Normal);

    host.down(450.0, 10.0);
    host.advance(100);
    assert!(host.move_to(50.0, 10.0));
    host.up(50.0, 10.0);

    host.advance(2000);
    // However hard the fling, a gesture moves a single page.
    assert_eq!(host.current_page(pager), 1);
}

#[test]
fn backward_swipe_goes_to_previous_page() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 3, PagerNavigation::Normal);
    host.runtime()
        .tree_mut()
        .get_mut(pager)
        .unwrap()
        .pager
        .as_mut()
        .unwrap()
        .current_page = 1;

    host.down(100.0, 10.0);
    host.advance(100);
    assert!(host.move_to(400.0, 10.0));
    host.up(400.0, 10.0);
    host.advance(1500);
    assert_eq!(host.current_page(pager), 0);
}

#[test]
fn set_page_command_works_under_navigation_none() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 4, PagerNavigation::None);

    host.runtime().execute_commands(smallvec![Command::SetPage {
        target: "pagers".into(),
        page: PageTarget::Absolute(2),
    }]);
    host.advance(0);
    host.advance(700);
    assert_eq!(host.current_page(pager), 2);
    assert_eq!(page_changed_count(&host.events()), 1);
}

#[test]
fn rtl_pager_advances_on_a_rightward_swipe() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 3, PagerNavigation::Normal);
    host.runtime()
        .tree_mut()
        .get_mut(pager)
        .unwrap()
        .pager
        .as_mut()
        .unwrap()
        .direction = weft_core::LayoutDirection::Rtl;

    host.down(100.0, 10.0);
    host.advance(100);
    assert!(host.move_to(400.0, 10.0));
    host.up(400.0, 10.0);
    host.advance(1500);
    assert_eq!(host.current_page(pager), 1);
}

#[test]
fn vertical_pager_advances_on_an_upward_swipe() {
    let mut host = TestHost::new();
    let tree = host.runtime().tree_mut();
    let root = tree.set_root(weft_core::Component::new(weft_graphics::Rect::new(
        0.0, 0.0, 500.0, 500.0,
    )));
    let mut props = weft_core::PagerProps::new(weft_core::Axis::Vertical);
    props.navigation = PagerNavigation::Normal;
    let pager = tree
        .add_child(
            root,
            weft_core::Component::new(weft_graphics::Rect::new(0.0, 0.0, 500.0, 500.0))
                .paged(props),
        )
        .unwrap();
    for _ in 0..3 {
        let _ = tree.add_child(
            pager,
            weft_core::Component::new(weft_graphics::Rect::new(0.0, 0.0, 500.0, 500.0)),
        );
    }

    host.down(10.0, 400.0);
    host.advance(100);
    assert!(host.move_to(10.0, 100.0));
    host.up(10.0, 100.0);
    host.advance(1500);
    assert_eq!(host.current_page(pager), 1);
}

#[test]
fn page_move_hook_fires_each_drag_step() {
    let mut host = TestHost::new();
    let pager = horizontal_pager(host.runtime(), 3, PagerNavigation::Normal);
    host.runtime()
        .tree_mut()
        .get_mut(pager)
        .unwrap()
        .pager
        .as_mut()
        .unwrap()
        .page_move = Some(smallvec![Command::SendEvent {
        arguments: vec!["pageMove".into()],
    }]);

    host.down(400.0, 10.0);
    host.advance(100);
    host.move_to(300.0, 10.0);
    assert!(host.saw("pageMove"));
    host.move_to(200.0, 10.0);
    assert!(host.saw("pageMove"));
}
