//! Scripted drag session against a headless grid.
//!
//! Run with:
//! ```bash
//! cargo run --package draggrid-robot-demo --features logging
//! ```

use anyhow::{bail, ensure, Context, Result};
use draggrid::prelude::*;
use draggrid_testing::GridTestRule;

#[derive(Clone, Debug, PartialEq)]
struct Card {
    id: u32,
    title: String,
}

fn card(id: u32, height: f32) -> GridItem<Card> {
    GridItem::new(
        Card {
            id,
            title: format!("Card #{id}"),
        },
        height,
    )
}

fn deck() -> Vec<GridItem<Card>> {
    let heights = [180.0, 120.0, 240.0, 90.0, 150.0, 200.0, 110.0, 170.0];
    let mut items: Vec<_> = heights
        .iter()
        .enumerate()
        .map(|(id, height)| card(id as u32, *height))
        .collect();
    items.push(GridItem::HeightEqualizer);
    items.extend((8..24).map(|id| card(id, 100.0 + (id % 4) as f32 * 40.0)));
    items
}

fn order(items: &[GridItem<Card>]) -> Vec<u32> {
    items.iter().filter_map(|item| item.item()).map(|card| card.id).collect()
}

fn print_columns(rule: &GridTestRule<Card>) {
    let snapshot = rule.grid().snapshot();
    for (index, column) in snapshot.columns.iter().enumerate() {
        let titles: Vec<&str> = column
            .iter()
            .filter_map(|entry| entry.item())
            .map(|card| card.title.as_str())
            .collect();
        println!("  column {index} ({:.0}px): {}", snapshot.column_heights[index], titles.join(", "));
    }
}

fn drop_card_on_neighbour(rule: &mut GridTestRule<Card>) -> Result<()> {
    println!("\n--- Step 1: drag Card #1 onto Card #3 ---");
    let source = rule.bounds("1").context("Card #1 is not on screen")?;
    let target = rule.bounds("3").context("Card #3 is not on screen")?;
    let dx = (target.page_x + target.width / 2.0) - (source.page_x + source.width / 2.0);
    let dy = (target.page_y + target.height / 2.0) - (source.page_y + source.height / 2.0);
    println!("  moving by ({dx:.0}, {dy:.0})");
    log::info!("dragging card 1 from page y {:.0} toward card 3", source.page_y);

    let before = order(rule.grid().items());
    rule.on_item("1").perform_drag(|touch| {
        touch.down();
        touch.move_by(dx / 2.0, dy / 2.0);
        touch.move_by(dx / 2.0, dy / 2.0);
        touch.advance_time_by(400);
        touch.up();
    });
    rule.await_idle();

    let after = order(rule.grid().items());
    log::info!("drop settled at {} ms", rule.clock().now());
    ensure!(after != before, "order did not change after the drop");
    ensure!(
        rule.listener().rearrangements.len() == 1,
        "expected a single rearrange callback, got {}",
        rule.listener().rearrangements.len()
    );
    println!("  ✓ order {before:?} -> {after:?}");
    print_columns(rule);
    Ok(())
}

fn auto_scroll_to_bottom(rule: &mut GridTestRule<Card>) -> Result<()> {
    println!("\n--- Step 2: hold Card #0 against the bottom edge ---");
    let viewport = rule.grid().viewport_height();
    let bounds = rule.bounds("0").context("Card #0 is not on screen")?;
    let dy = viewport - bounds.page_y - bounds.height / 2.0;
    log::info!("holding card 0 {dy:.0}px below its slot, viewport {viewport:.0}px");

    rule.on_item("0").perform_drag(|touch| {
        touch.down();
        touch.move_to(0.0, dy);
        touch.advance_time_by(5_000);
        touch.up();
    });
    rule.await_idle();

    let offset = rule.grid().total_scroll_offset();
    if offset <= 0.0 {
        bail!("grid did not scroll, offset {offset}");
    }
    println!("  ✓ scrolled to {offset:.0}px, remounted {} time(s)", rule.scene().remounts.len());
    Ok(())
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::init();
    println!("=== draggrid robot demo ===");

    let config = MasonryGridConfig::new().column_count(2).column_width(180.0).wobble(true);
    let mut rule = GridTestRule::new(deck(), config, |card: &Card| card.id.to_string(), 640.0);
    println!("✓ Grid laid out with {} entries", rule.grid().snapshot().len());
    print_columns(&rule);

    drop_card_on_neighbour(&mut rule)?;
    auto_scroll_to_bottom(&mut rule)?;

    rule.grid_mut().dispose();
    log::info!("grid disposed, settled: {}", rule.grid().is_settled());
    println!("\n=== done ===");
    Ok(())
}
