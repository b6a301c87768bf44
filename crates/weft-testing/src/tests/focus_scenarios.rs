//! Focus navigation driven through keys and the host event contract.

use weft_core::{ActionState, Axis, Component, FocusDirection, HostEvent, ScrollableProps};
use weft_graphics::Rect;
use crate::{grid_3x3, marked_touchable, TestHost};
use weft_ui::KeyCode;

fn focus_name(host: &mut TestHost) -> Option<String> {
    let focused = host.runtime().focus()?;
    host.runtime().tree().get(focused)?.name.clone()
}

#[test]
fn arrow_down_skips_an_invisible_row() {
    let mut host = TestHost::new();
    // Three row containers of three cells each; the middle row is
    // invisible, so its cells are not focusable areas.
    let tree = host.runtime().tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 300.0, 300.0)));
    let mut rows = Vec::new();
    for row in 0..3 {
        let container = tree
            .add_child(
                root,
                Component::new(Rect::new(0.0, row as f32 * 100.0, 300.0, 100.0)),
            )
            .unwrap();
        for column in 0..3 {
            let bounds = Rect::new(column as f32 * 100.0, 0.0, 100.0, 100.0);
            let _ = tree.add_child(
                container,
                marked_touchable(bounds, &format!("{}{}", row + 1, column + 1)).focusable(),
            );
        }
        rows.push(container);
    }
    tree.get_mut(rows[1]).unwrap().opacity = 0.0;

    let start = host.runtime().tree().find_by_name("11").unwrap();
    assert!(host.runtime().set_focus(start, None));
    host.events();

    assert!(host.key_press(KeyCode::ArrowDown));
    assert_eq!(focus_name(&mut host).as_deref(), Some("31"));

    // The focus-switch event carries the landing cell's global bounds.
    let events = host.events();
    assert!(events.iter().any(|event| matches!(
        event,
        HostEvent::Focus {
            component: Some(_),
            bounds: Some(bounds),
            direction: Some(FocusDirection::Down),
            ..
        } if *bounds == Rect::new(0.0, 200.0, 100.0, 100.0)
    )));
}

#[test]
fn release_at_the_edge_negotiates_with_the_host() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime().set_focus(cells[2], None); // "13"
    host.events();

    host.key_press(KeyCode::ArrowRight);
    let action = host
        .events()
        .into_iter()
        .find_map(|event| match event {
            HostEvent::Focus {
                component: None,
                direction: Some(FocusDirection::Right),
                action: Some(action),
                ..
            } => Some(action),
            _ => None,
        })
        .expect("release question");

    // Focus holds until the host answers.
    assert_eq!(focus_name(&mut host).as_deref(), Some("13"));

    assert!(action.resolve(true));
    host.advance(0);
    assert_eq!(host.runtime().focus(), None);
}

#[test]
fn declined_release_keeps_focus_in_place() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime().set_focus(cells[2], None);
    host.events();

    host.key_press(KeyCode::ArrowRight);
    let action = host
        .events()
        .into_iter()
        .find_map(|event| match event {
            HostEvent::Focus { action: Some(a), .. } => Some(a),
            _ => None,
        })
        .expect("release question");

    action.resolve(false);
    host.advance(0);
    assert_eq!(focus_name(&mut host).as_deref(), Some("13"));
}

#[test]
fn competing_arrow_terminates_the_pending_release() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime().set_focus(cells[2], None); // "13"
    host.events();

    host.key_press(KeyCode::ArrowRight);
    let action = host
        .events()
        .into_iter()
        .find_map(|event| match event {
            HostEvent::Focus { action: Some(a), .. } => Some(a),
            _ => None,
        })
        .expect("release question");

    host.key_press(KeyCode::ArrowLeft);
    assert_eq!(focus_name(&mut host).as_deref(), Some("12"));
    assert_eq!(action.state(), ActionState::Terminated);
    assert!(!action.resolve(true));
}

#[test]
fn tab_cycles_through_the_grid_in_document_order() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime().set_focus(cells[0], None);

    for expected in ["12", "13", "21", "22"] {
        host.key_press(KeyCode::Tab);
        assert_eq!(focus_name(&mut host).as_deref(), Some(expected));
    }
}

#[test]
fn enter_runs_the_focused_press_handler() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime().set_focus(cells[4], None); // "22"
    host.events();

    assert!(host.key_press(KeyCode::Enter));
    assert!(host.saw("onPress:22"));
}

#[test]
fn focus_moving_into_a_scrollable_scrolls_it_into_view() {
    let mut host = TestHost::new();
    let tree = host.runtime().tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 200.0, 300.0)));
    let scrollable = tree
        .add_child(
            root,
            Component::new(Rect::new(0.0, 0.0, 200.0, 300.0))
                .scrollable(ScrollableProps::new(Axis::Vertical, 1200.0)),
        )
        .unwrap();
    let mut items = Vec::new();
    for index in 0..10 {
        let bounds = Rect::new(0.0, index as f32 * 120.0, 200.0, 120.0);
        let item = tree
            .add_child(
                scrollable,
                marked_touchable(bounds, &format!("item{index}")).focusable(),
            )
            .unwrap();
        items.push(item);
    }

    // item2 spans content 240..360: its tail hangs below the 300-tall
    // viewport until the scrollable moves down by 60.
    assert!(host.runtime().set_focus(items[2], None));
    let offset = host.scroll_offset(scrollable);
    assert_eq!(offset, 60.0);
    assert!(host.events().iter().any(|event| matches!(
        event,
        HostEvent::ScrollTo { component, .. } if *component == scrollable
    )));
}

#[test]
fn set_focus_on_unreachable_component_is_a_silent_no_op() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime()
        .tree_mut()
        .get_mut(cells[3])
        .unwrap()
        .display = false;

    assert!(!host.runtime().set_focus(cells[3], None));
    assert_eq!(host.runtime().focus(), None);
    assert!(host.events().is_empty());
}

#[test]
fn removing_the_focused_component_reports_and_clears() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime().set_focus(cells[4], None);
    host.events();

    host.runtime().remove_component(cells[4]);
    assert_eq!(host.runtime().focus(), None);
    assert!(host.events().iter().any(|event| matches!(
        event,
        HostEvent::Focus {
            component: None,
            action: None,
            ..
        }
    )));
}

#[test]
fn shift_tab_walks_backwards() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    host.runtime().set_focus(cells[4], None); // "22"

    host.key_press_shifted(KeyCode::Tab);
    assert_eq!(focus_name(&mut host).as_deref(), Some("21"));
    host.key_press_shifted(KeyCode::Tab);
    assert_eq!(focus_name(&mut host).as_deref(), Some("13"));
}

/// A pager whose pages each hold one focusable cell.
fn pager_with_focusable_pages(host: &mut TestHost, pages: usize) -> weft_core::ComponentId {
    let tree = host.runtime().tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 500.0, 500.0)));
    let props = weft_core::PagerProps::new(Axis::Horizontal);
    let pager = tree
        .add_child(
            root,
            Component::new(Rect::new(0.0, 0.0, 500.0, 500.0))
                .named("pagers")
                .paged(props),
        )
        .unwrap();
    for index in 0..pages {
        let page = tree
            .add_child(
                pager,
                Component::new(Rect::new(0.0, 0.0, 500.0, 500.0)).named(format!("page{index}")),
            )
            .unwrap();
        let _ = tree.add_child(
            page,
            marked_touchable(Rect::new(200.0, 200.0, 100.0, 100.0), &format!("cell{index}"))
                .focusable(),
        );
    }
    pager
}

#[test]
fn arrow_right_advances_the_page_to_reach_a_match() {
    let mut host = TestHost::new();
    let pager = pager_with_focusable_pages(&mut host, 3);
    let start = host.runtime().tree().find_by_name("cell0").unwrap();
    host.runtime().set_focus(start, None);

    host.key_press(KeyCode::ArrowRight);
    assert_eq!(host.current_page(pager), 1);
    assert_eq!(focus_name(&mut host).as_deref(), Some("cell1"));
}

#[test]
fn programmatic_page_change_parks_focus_on_the_pager() {
    let mut host = TestHost::new();
    let pager = pager_with_focusable_pages(&mut host, 3);
    let start = host.runtime().tree().find_by_name("cell0").unwrap();
    host.runtime().set_focus(start, None);
    host.events();

    host.runtime()
        .execute_commands(smallvec::smallvec![weft_core::Command::SetPage {
            target: "pagers".into(),
            page: weft_core::PageTarget::Absolute(2),
        }]);
    host.advance(0);
    host.advance(700);

    assert_eq!(host.current_page(pager), 2);
    // Focus left the hidden child but did not jump to the new page.
    assert_eq!(host.runtime().focus(), Some(pager));
}

#[test]
fn arrow_down_scrolls_ahead_when_no_focusable_waits() {
    let mut host = TestHost::new();
    let tree = host.runtime().tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 200.0, 300.0)));
    let scrollable = tree
        .add_child(
            root,
            Component::new(Rect::new(0.0, 0.0, 200.0, 300.0))
                .scrollable(ScrollableProps::new(Axis::Vertical, 1200.0)),
        )
        .unwrap();
    // One focusable row at the top, plain content below.
    let cell = tree
        .add_child(
            scrollable,
            marked_touchable(Rect::new(0.0, 0.0, 200.0, 100.0), "row").focusable(),
        )
        .unwrap();
    for index in 1..12 {
        let _ = tree.add_child(
            scrollable,
            Component::new(Rect::new(0.0, index as f32 * 100.0, 200.0, 100.0)),
        );
    }

    host.runtime().set_focus(cell, None);
    host.key_press(KeyCode::ArrowDown);

    // No focusable below: the scrollable moves one viewport and focus stays.
    assert_eq!(host.scroll_offset(scrollable), 300.0);
    assert_eq!(host.runtime().focus(), Some(cell));
}

#[test]
fn focusable_areas_reflect_disabled_state() {
    let mut host = TestHost::new();
    let cells = grid_3x3(host.runtime());
    assert_eq!(host.runtime().focusable_areas().len(), 9);

    host.runtime()
        .tree_mut()
        .get_mut(cells[0])
        .unwrap()
        .states
        .set(weft_core::State::Disabled, true);
    assert_eq!(host.runtime().focusable_areas().len(), 8);
}
