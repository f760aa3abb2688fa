use std::cell::{Ref, RefCell};
use std::rc::Rc;

use draggrid_foundation::{MasonryGridConfig, MasonryGridController};
use draggrid_layout::{GridItem, ViewMeasurement};

use crate::clock::ManualClock;
use crate::scene::{FakeScene, ListenerLog, RecordingHost, RecordingListener};

/// Drives a [`MasonryGridController`] against a [`FakeScene`] frame by frame.
///
/// Every mutating call re-syncs the scene with the controller's render
/// states, and scroll requests the controller sends to the host are echoed
/// back as scroll events the way a real scroll view would report them.
pub struct GridTestRule<T> {
    grid: MasonryGridController<T>,
    clock: ManualClock,
    scene: Rc<RefCell<FakeScene>>,
    listener: Rc<RefCell<ListenerLog<T>>>,
    echoed_scrolls: usize,
}

impl<T: Clone + 'static> GridTestRule<T> {
    pub const FRAME_MS: u64 = 16;
    pub const MAX_SETTLE_FRAMES: usize = 1_000;

    pub fn new(
        items: Vec<GridItem<T>>,
        config: MasonryGridConfig,
        key_fn: impl Fn(&T) -> String + 'static,
        viewport_height: f32,
    ) -> Self {
        let clock = ManualClock::new();
        let host = RecordingHost::new();
        let listener = RecordingListener::new();
        let scene = host.scene();
        let log = listener.log();

        let mut grid = MasonryGridController::new(config.initial_viewport_height(viewport_height), key_fn)
            .with_clock(clock.clone())
            .with_host(host)
            .with_listener(listener);
        grid.on_layout(viewport_height);
        grid.set_items(items);

        let mut rule = Self {
            grid,
            clock,
            scene,
            listener: log,
            echoed_scrolls: 0,
        };
        rule.sync_scene();
        rule
    }

    pub fn grid(&self) -> &MasonryGridController<T> {
        &self.grid
    }

    /// Direct access for calls the rule has no helper for. Call
    /// [`GridTestRule::sync`] afterwards.
    pub fn grid_mut(&mut self) -> &mut MasonryGridController<T> {
        &mut self.grid
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn scene(&self) -> Ref<'_, FakeScene> {
        self.scene.borrow()
    }

    pub fn listener(&self) -> Ref<'_, ListenerLog<T>> {
        self.listener.borrow()
    }

    pub fn sync(&mut self) {
        self.echo_scrolls();
        self.sync_scene();
    }

    fn sync_scene(&mut self) {
        let states = self.grid.render_states();
        let mut scene = self.scene.borrow_mut();
        scene.items = states
            .into_iter()
            .map(|state| (state.key.clone(), state))
            .collect();
        scene.header_height = self.grid.header_height();
        scene.translation = self.grid.scroll_translation();
    }

    fn echo_scrolls(&mut self) {
        let pending: Vec<f32> = {
            let scene = self.scene.borrow();
            scene.scroll_requests[self.echoed_scrolls..]
                .iter()
                .map(|(offset, _)| *offset)
                .collect()
        };
        self.echoed_scrolls += pending.len();
        for offset in pending {
            log::trace!("echoing host scroll to {offset}");
            self.grid.on_scroll(offset);
        }
    }

    /// Runs one frame.
    pub fn frame(&mut self) {
        self.clock.advance(Self::FRAME_MS);
        self.grid.on_frame();
        self.sync();
    }

    /// Advances the clock by `ms`, one frame at a time.
    pub fn advance_time_by(&mut self, ms: u64) {
        let target = self.clock.now() + ms;
        while self.clock.now() < target {
            let step = Self::FRAME_MS.min(target - self.clock.now());
            self.clock.advance(step);
            self.grid.on_frame();
            self.sync();
        }
    }

    /// Runs frames until no drag, timer or tracked animation is left.
    pub fn await_idle(&mut self) {
        let mut frames = 0;
        while !self.grid.is_settled() {
            self.frame();
            frames += 1;
            if frames > Self::MAX_SETTLE_FRAMES {
                panic!("Grid failed to settle after {} frames", Self::MAX_SETTLE_FRAMES);
            }
        }
        log::debug!("grid settled after {frames} frames");
    }

    /// User scroll of the host scroll view.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scene.borrow_mut().list_offset = offset;
        self.grid.on_scroll(offset);
        self.sync_scene();
    }

    pub fn set_header_height(&mut self, height: f32) {
        self.grid.on_header_layout(height);
        self.sync_scene();
    }

    pub fn set_items(&mut self, items: Vec<GridItem<T>>) {
        self.grid.set_items(items);
        self.sync_scene();
    }

    /// Makes every later measurement of `key` fail, as for a cell that was
    /// detached from the view tree.
    pub fn set_unmeasurable(&mut self, key: &str) {
        log::debug!("cell {key:?} is no longer measurable");
        self.scene.borrow_mut().unmeasurable.insert(key.to_owned());
    }

    pub fn bounds(&self, key: &str) -> Option<ViewMeasurement> {
        self.scene.borrow().measure(key)
    }

    pub fn on_item(&mut self, key: &str) -> TestItem<'_, T> {
        TestItem {
            rule: self,
            key: key.to_owned(),
        }
    }
}

pub struct TestItem<'a, T> {
    rule: &'a mut GridTestRule<T>,
    key: String,
}

impl<'a, T: Clone + 'static> TestItem<'a, T> {
    pub fn bounds(&self) -> ViewMeasurement {
        match self.rule.scene.borrow().bounds(&self.key) {
            Some(bounds) => bounds,
            None => panic!("Item {:?} is not on screen", self.key),
        }
    }

    /// Long-press without moving the finger.
    pub fn long_press(&mut self) {
        self.rule.grid.start_drag(&self.key);
        self.rule.sync();
    }

    pub fn perform_drag(&mut self, block: impl FnOnce(&mut DragScope<'_, T>)) {
        let bounds = self.bounds();
        let mut scope = DragScope {
            rule: &mut *self.rule,
            key: self.key.clone(),
            start_y: bounds.page_y + bounds.height / 2.0,
            dx: 0.0,
            dy: 0.0,
        };
        block(&mut scope);
    }
}

/// One finger gesture on a card, expressed as displacement from where the
/// finger went down.
pub struct DragScope<'a, T> {
    rule: &'a mut GridTestRule<T>,
    key: String,
    start_y: f32,
    dx: f32,
    dy: f32,
}

impl<'a, T: Clone + 'static> DragScope<'a, T> {
    /// Long-press then grant: the card is picked up.
    pub fn down(&mut self) {
        self.rule.grid.start_drag(&self.key);
        self.rule.grid.on_touch_grant(self.start_y);
        self.rule.sync();
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.move_to(self.dx + dx, self.dy + dy);
    }

    pub fn move_to(&mut self, dx: f32, dy: f32) {
        self.dx = dx;
        self.dy = dy;
        self.rule.grid.on_touch_move(dx, dy, self.start_y + dy);
        self.rule.sync();
    }

    pub fn up(&mut self) {
        self.rule.grid.on_touch_release();
        self.rule.sync();
    }

    /// The responder is taken away without the finger lifting.
    pub fn lose_responder(&mut self) {
        self.rule.grid.end_drag(false);
        self.rule.sync();
    }

    /// The grid becomes the responder again for the same gesture.
    pub fn regain_responder(&mut self) {
        self.rule.grid.on_touch_grant(self.start_y);
        self.rule.sync();
    }

    pub fn advance_time_by(&mut self, ms: u64) {
        self.rule.advance_time_by(ms);
    }

    pub fn grid(&self) -> &MasonryGridController<T> {
        &self.rule.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<GridItem<u32>> {
        (0..6).map(|id| GridItem::new(id, 100.0)).collect()
    }

    fn rule() -> GridTestRule<u32> {
        GridTestRule::new(
            items(),
            MasonryGridConfig::new().column_width(100.0),
            |id: &u32| id.to_string(),
            400.0,
        )
    }

    #[test]
    fn test_scene_mirrors_layout() {
        let rule = rule();
        assert_eq!(rule.scene().items.len(), 6);
        let bounds = rule.bounds("3").unwrap();
        assert_eq!((bounds.page_x, bounds.page_y), (100.0, 100.0));
    }

    #[test]
    fn test_scroll_moves_cells() {
        let mut rule = rule();
        rule.set_header_height(40.0);
        rule.scroll_to(30.0);
        let bounds = rule.bounds("0").unwrap();
        assert_eq!(bounds.page_y, 10.0);
    }

    #[test]
    fn test_advance_time_runs_whole_frames() {
        let mut rule = rule();
        rule.advance_time_by(40);
        assert_eq!(rule.clock().now(), 40);
        rule.await_idle();
        assert_eq!(rule.clock().now(), 40);
    }

    #[test]
    fn test_drag_scope_moves_the_card() {
        let mut rule = rule();
        rule.on_item("0").perform_drag(|scope| {
            scope.down();
            scope.move_by(10.0, 20.0);
            scope.move_by(0.0, 20.0);
            assert_eq!(scope.grid().dragged_key(), Some("0"));
        });
        let bounds = rule.bounds("0").unwrap();
        assert_eq!((bounds.page_x, bounds.page_y), (10.0, 40.0));
    }
}
