use draggrid::{GridItem, MasonryGridConfig};
use draggrid_testing::GridTestRule;

fn rule_with(count: u32, config: MasonryGridConfig) -> GridTestRule<u32> {
    let items = (0..count).map(|id| GridItem::new(id, 100.0)).collect();
    GridTestRule::new(items, config.column_width(100.0), |id: &u32| id.to_string(), 300.0)
}

#[test]
fn only_cards_near_the_viewport_are_mounted() {
    let rule = rule_with(20, MasonryGridConfig::new().window_size(1).initial_num_to_render(0));

    let scene = rule.scene();
    // Rows 0..=3 touch the 300px viewport, row 3 only at its top edge.
    assert_eq!(scene.last_should_render("7"), Some(true));
    assert_eq!(scene.last_should_render("8"), None);
    drop(scene);

    assert!(rule.grid().render_item(7).unwrap().is_visible());
    assert!(!rule.grid().render_item(8).unwrap().is_visible());
}

#[test]
fn initial_cards_are_always_rendered() {
    let rule = rule_with(20, MasonryGridConfig::new().window_size(1).initial_num_to_render(5));

    let state = rule.grid().render_item(9).unwrap();
    assert!(state.always_render);
    assert!(!state.should_render);
    assert!(!rule.grid().render_item(10).unwrap().always_render);
}

#[test]
fn window_follows_throttled_scroll() {
    let mut rule = rule_with(20, MasonryGridConfig::new().window_size(1).initial_num_to_render(0));

    rule.scroll_to(500.0);
    assert_eq!(rule.scene().last_should_render("0"), Some(false));
    assert_eq!(rule.scene().last_should_render("10"), Some(true));

    // Within the throttle interval nothing changes.
    rule.scroll_to(0.0);
    assert_eq!(rule.scene().last_should_render("0"), Some(false));

    rule.advance_time_by(200);
    rule.scroll_to(10.0);
    assert_eq!(rule.scene().last_should_render("0"), Some(true));
    assert_eq!(rule.scene().last_should_render("10"), Some(false));
}

#[test]
fn wide_window_mounts_everything() {
    let rule = rule_with(20, MasonryGridConfig::new());
    let scene = rule.scene();
    assert_eq!(scene.should_render_calls.len(), 20);
    assert!(scene.should_render_calls.iter().all(|(_, mounted)| *mounted));
}

#[test]
fn end_reached_fires_once_per_last_item() {
    let mut rule = rule_with(20, MasonryGridConfig::new().end_reached_threshold(0.0));

    rule.scroll_to(600.0);
    assert!(rule.listener().end_reached.is_empty());
    rule.scroll_to(695.0);
    assert_eq!(rule.listener().end_reached, vec![5.0]);
    rule.scroll_to(699.0);
    assert_eq!(rule.listener().end_reached.len(), 1);

    // More content loaded: the new last item may report again.
    rule.set_items((0..22).map(|id| GridItem::new(id, 100.0)).collect());
    rule.scroll_to(795.0);
    assert_eq!(rule.listener().end_reached, vec![5.0, 5.0]);
}

#[test]
fn scroll_events_are_forwarded_with_throttle() {
    let mut rule = rule_with(20, MasonryGridConfig::new().scroll_event_throttle_ms(100));

    rule.scroll_to(10.0);
    rule.scroll_to(20.0);
    rule.advance_time_by(100);
    rule.scroll_to(30.0);
    // Identical offsets are dropped before the throttle.
    rule.advance_time_by(100);
    rule.scroll_to(30.0);

    assert_eq!(rule.listener().scrolls, vec![10.0, 30.0]);
}

#[test]
fn scroll_to_index_accounts_for_header() {
    let mut rule = rule_with(20, MasonryGridConfig::new());
    rule.set_header_height(40.0);

    rule.grid_mut().scroll_to_index(3, 10.0, false);
    rule.sync();
    assert!(rule.scene().scroll_requests.is_empty());

    rule.frame();
    assert_eq!(rule.scene().scroll_requests, vec![(150.0, false)]);
    assert_eq!(rule.grid().list_scroll_offset(), 150.0);
}

#[test]
fn scroll_to_top() {
    let mut rule = rule_with(20, MasonryGridConfig::new());
    rule.scroll_to(400.0);
    rule.grid_mut().scroll_to_top(true);
    rule.sync();
    assert_eq!(rule.scene().scroll_requests, vec![(0.0, true)]);
    assert_eq!(rule.grid().total_scroll_offset(), 0.0);
}
