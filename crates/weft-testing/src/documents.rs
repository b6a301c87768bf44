//! Canned document trees for interaction tests.

use smallvec::smallvec;
use weft_core::{
    Axis, Command, Component, ComponentId, GestureDescriptor, HandlerKind, PagerNavigation,
    PagerProps, ScrollableProps, SwipeAwayParams, SwipeDirection, TouchableProps,
};
use weft_graphics::Rect;
use weft_ui::InteractionRuntime;

/// A touchable whose five handlers each send a `<handler>:<name>` marker.
pub fn marked_touchable(bounds: Rect, name: &str) -> Component {
    let mut props = TouchableProps::default();
    for kind in [
        HandlerKind::Down,
        HandlerKind::Move,
        HandlerKind::Up,
        HandlerKind::Cancel,
        HandlerKind::Press,
    ] {
        props.set_handler(
            kind,
            smallvec![Command::SendEvent {
                arguments: vec![format!("on{}:{name}", kind.name())],
            }],
        );
    }
    Component::new(bounds).named(name).touchable(props)
}

/// The scroll fixture: a 200x300 vertical scrollable of `count` touchable
/// rows, each 100 tall, named `item<n>`. Returns the scrollable's id.
pub fn vertical_sequence(runtime: &mut InteractionRuntime, count: usize) -> ComponentId {
    let tree = runtime.tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 200.0, 300.0)));
    let scrollable = tree
        .add_child(
            root,
            Component::new(Rect::new(0.0, 0.0, 200.0, 300.0))
                .named("scrollings")
                .scrollable(ScrollableProps::new(Axis::Vertical, count as f32 * 100.0)),
        )
        .expect("root is live");
    for index in 0..count {
        let bounds = Rect::new(0.0, index as f32 * 100.0, 200.0, 100.0);
        let _ = tree.add_child(scrollable, marked_touchable(bounds, &format!("item{index}")));
    }
    scrollable
}

/// A 300x300 grid of 9 focusable touchables named "11".."33".
pub fn grid_3x3(runtime: &mut InteractionRuntime) -> Vec<ComponentId> {
    let tree = runtime.tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 300.0, 300.0)));
    let mut cells = Vec::new();
    for row in 0..3 {
        for column in 0..3 {
            let bounds = Rect::new(column as f32 * 100.0, row as f32 * 100.0, 100.0, 100.0);
            let name = format!("{}{}", row + 1, column + 1);
            let cell = tree
                .add_child(root, marked_touchable(bounds, &name).focusable())
                .expect("root is live");
            cells.push(cell);
        }
    }
    cells
}

/// A 500x500 horizontal pager of `count` pages named `page<n>`.
pub fn horizontal_pager(
    runtime: &mut InteractionRuntime,
    count: usize,
    navigation: PagerNavigation,
) -> ComponentId {
    let tree = runtime.tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 500.0, 500.0)));
    let mut props = PagerProps::new(Axis::Horizontal);
    props.navigation = navigation;
    let pager = tree
        .add_child(
            root,
            Component::new(Rect::new(0.0, 0.0, 500.0, 500.0))
                .named("pagers")
                .paged(props),
        )
        .expect("root is live");
    for index in 0..count {
        let _ = tree.add_child(
            pager,
            Component::new(Rect::new(0.0, 0.0, 500.0, 500.0)).named(format!("page{index}")),
        );
    }
    pager
}

/// A 500x100 touchable with a SwipeAway gesture whose callbacks emit
/// `swipeMove` / `swipeDone` markers.
pub fn swipe_away_item(runtime: &mut InteractionRuntime, direction: SwipeDirection) -> ComponentId {
    let tree = runtime.tree_mut();
    let root = tree.set_root(Component::new(Rect::new(0.0, 0.0, 500.0, 100.0)));
    let mut params = SwipeAwayParams::new(direction);
    params.on_swipe_move = smallvec![Command::SendEvent {
        arguments: vec!["swipeMove".into()],
    }];
    params.on_swipe_done = smallvec![Command::SendEvent {
        arguments: vec!["swipeDone".into()],
    }];
    let mut props = TouchableProps::default();
    props.gestures.push(GestureDescriptor::SwipeAway(params));
    tree.add_child(
        root,
        Component::new(Rect::new(0.0, 0.0, 500.0, 100.0))
            .named("swipeable")
            .touchable(props),
    )
    .expect("root is live")
}
