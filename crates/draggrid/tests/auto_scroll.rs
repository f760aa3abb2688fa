use draggrid::{GridItem, MasonryGridConfig};
use draggrid_testing::GridTestRule;

// 20 cards of height 100 in two columns: 1000px of content.
fn tall_rule(config: MasonryGridConfig) -> GridTestRule<u32> {
    let items = (0..20).map(|id| GridItem::new(id, 100.0)).collect();
    GridTestRule::new(items, config.column_width(100.0), |id: &u32| id.to_string(), 300.0)
}

fn assert_near(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1.0,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn dragging_past_bottom_edge_scrolls_at_constant_velocity() {
    let mut rule = tall_rule(MasonryGridConfig::new());

    rule.on_item("0").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, 260.0);
        assert!(touch.grid().is_auto_scrolling());

        // 0.5 px/ms toward the bottom extreme at 700.
        touch.advance_time_by(700);
        assert_near(touch.grid().total_scroll_offset(), 350.0);
        assert_eq!(touch.grid().list_scroll_offset(), 0.0);
    });

    // The card stays under the finger.
    assert_near(rule.bounds("0").unwrap().page_y, 260.0);
    assert!(!rule.listener().scrolls.is_empty());
}

#[test]
fn moving_back_on_screen_stops_scrolling() {
    let mut rule = tall_rule(MasonryGridConfig::new());

    rule.on_item("0").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, 260.0);
        touch.advance_time_by(400);
        touch.move_to(0.0, 100.0);
        assert!(!touch.grid().is_auto_scrolling());
        let stopped_at = touch.grid().total_scroll_offset();
        assert_near(stopped_at, 200.0);

        touch.move_to(0.0, 110.0);
        touch.advance_time_by(200);
        assert_eq!(touch.grid().total_scroll_offset(), stopped_at);
        touch.up();
    });
    rule.await_idle();

    // The animated scroll ends up in the host scroll view.
    let scene = rule.scene();
    assert_near(scene.list_offset, 200.0);
    assert_eq!(scene.scroll_requests.last().map(|(_, animated)| *animated), Some(false));
    assert_eq!(scene.remounts, vec![1]);
    drop(scene);
    assert_near(rule.grid().total_scroll_offset(), 200.0);
    assert_near(rule.grid().list_scroll_offset(), 200.0);
    assert_eq!(rule.grid().scroll_translation().get(), 0.0);
}

#[test]
fn dragging_past_top_edge_scrolls_up() {
    let mut rule = tall_rule(MasonryGridConfig::new());
    rule.scroll_to(500.0);

    rule.on_item("10").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, -60.0);
        assert!(touch.grid().is_auto_scrolling());
        touch.advance_time_by(1_100);
        assert!(!touch.grid().is_auto_scrolling());
        assert_near(touch.grid().total_scroll_offset(), 0.0);
        touch.up();
    });
    rule.await_idle();

    assert_near(rule.grid().total_scroll_offset(), 0.0);
}

#[test]
fn no_auto_scroll_while_rearrange_animates() {
    let mut rule = tall_rule(MasonryGridConfig::new());

    rule.on_item("0").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, 100.0);
        assert_eq!(touch.grid().pending_rearrange_target(), Some("2"));
        touch.advance_time_by(110);
        assert!(touch.grid().is_rearrange_in_flight());

        touch.move_to(0.0, 260.0);
        assert!(!touch.grid().is_auto_scrolling());

        touch.advance_time_by(250);
        touch.move_to(0.0, 261.0);
        assert!(touch.grid().is_auto_scrolling());
        touch.up();
    });
    rule.await_idle();

    assert!(!rule.grid().is_auto_scrolling());
}

#[test]
fn end_reached_threshold_enables_load_more_poll() {
    let mut rule = tall_rule(MasonryGridConfig::new().end_reached_threshold(0.0));

    rule.on_item("0").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, 260.0);
        assert!(touch.grid().is_auto_scroll_polling());
        touch.move_to(0.0, 100.0);
        assert!(!touch.grid().is_auto_scroll_polling());
        touch.up();
    });
    rule.await_idle();
}

#[test]
fn poll_resumes_scrolling_after_more_items_load() {
    let mut rule = tall_rule(MasonryGridConfig::new().end_reached_threshold(0.0));

    rule.on_item("0").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, 260.0);
        touch.advance_time_by(1_500);
        assert!(!touch.grid().is_auto_scrolling());
        assert!(touch.grid().is_auto_scroll_polling());
        assert_near(touch.grid().total_scroll_offset(), 700.0);
    });

    // Another page arrives while the card is still held at the bottom edge.
    rule.set_items((0..30).map(|id| GridItem::new(id, 100.0)).collect());
    rule.advance_time_by(600);
    assert!(rule.grid().is_auto_scrolling());
    assert!(rule.grid().total_scroll_offset() > 700.0);

    rule.advance_time_by(1_500);
    assert_near(rule.grid().total_scroll_offset(), 1_200.0);
    assert_near(rule.bounds("0").unwrap().page_y, 260.0);

    rule.grid_mut().on_touch_release();
    rule.sync();
    rule.await_idle();
    assert_near(rule.grid().total_scroll_offset(), 1_200.0);
}

#[test]
fn end_reached_fires_during_auto_scroll() {
    let mut rule = tall_rule(MasonryGridConfig::new().end_reached_threshold(0.0));

    rule.on_item("0").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, 260.0);
        touch.advance_time_by(1_500);
        touch.up();
    });
    rule.await_idle();

    assert_eq!(rule.listener().end_reached.len(), 1);
    assert!(rule.listener().end_reached[0] < 10.0);
}
