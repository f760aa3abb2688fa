//! Drag and rearrange controller.
//!
//! [`MasonryGridController`] owns all grid state: the committed item
//! sequence and its layout, the working sequence of an ongoing drag, the
//! geometry cache, scroll bookkeeping, timers and running animations.
//!
//! # Architecture
//!
//! The controller is driven entirely from the outside:
//!
//! 1. The rendering host forwards touch, scroll and layout events.
//! 2. The host calls [`MasonryGridController::on_frame`] once per frame. Expired
//!    timers fire, animations advance, the animated scroll is folded back into
//!    scroll handling and finished plans run their continuations.
//! 3. The host draws each cell from [`MasonryGridController::render_item`],
//!    reading the animated channels it returns.
//!
//! A drag moves through [`DragPhase::Idle`] → [`DragPhase::Dragging`] →
//! [`DragPhase::Releasing`] → [`DragPhase::Idle`]. While dragging, hovering
//! over another card for the debounce interval moves the dragged item to that
//! card's slot in the working sequence and animates the displaced cards. The
//! caller only learns about the new order once the drop animation finished,
//! through [`GridListener::on_rearrange`].

use draggrid_animation::{AnimatedValue, AnimationPlan, Animator, Easing, PlanId, Tween};
use draggrid_layout::{
    layout, move_index, EntryKind, GridItem, GridSnapshot, LayoutEntry, Point, VertexOffsets,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::auto_scroll::{AutoScroller, ScrollDirection, MIN_AUTO_SCROLL_DISTANCE};
use crate::clock::{FrameClock, SystemFrameClock};
use crate::config::MasonryGridConfig;
use crate::geometry_cache::{measure_vertices, GeometryCache, ItemGeometry};
use crate::host::{GridHost, GridListener, NoopHost, NoopListener};
use crate::overlap::find_overlap;
use crate::render::{DragTransform, ItemRenderState, RotationDegrees};
use crate::scroll::{EndReachedTracker, ScrollTracker};
use crate::timers::TimerQueue;
use crate::windowing::{Throttle, WindowBand};
use crate::wobble::wobble_plan;

/// Maps an item to its stable key.
pub type KeyFn<T> = Box<dyn Fn(&T) -> String>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    /// The drop animation is running; the new order is not committed yet.
    Releasing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GridTimer {
    Rearrange,
    DeferredRelease,
    AutoScrollPoll,
    RemountSettle,
    ScrollToIndex,
}

/// Work to run when a plan finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Continuation {
    Lift,
    Rearrange,
    DragEnd,
    AutoScroll,
    SyncPositions,
}

struct DragSession<T> {
    key: String,
    /// Committed placement of the dragged item when the drag started.
    entry: LayoutEntry<T>,
    granted: bool,
    grant_page_y: f32,
    grant_scroll: f32,
    /// Keys overlap detection skips: the dragged item and every
    /// non-draggable entry.
    exclude: FxHashSet<String>,
    /// Last overlap target; a repeated sample of the same target is ignored.
    pending_target: Option<String>,
    /// Target captured by the armed rearrange timer.
    scheduled_target: Option<String>,
    rearrange_plan: Option<PlanId>,
}

struct WorkingLayout<T> {
    items: Vec<GridItem<T>>,
    snapshot: GridSnapshot<T>,
}

/// Drag-to-reorder masonry grid engine.
///
/// # Example
///
/// ```rust
/// use draggrid_foundation::{MasonryGridConfig, MasonryGridController};
/// use draggrid_layout::GridItem;
///
/// let mut grid = MasonryGridController::new(
///     MasonryGridConfig::new().column_width(100.0),
///     |name: &&str| name.to_string(),
/// );
/// grid.set_items(vec![GridItem::new("a", 100.0), GridItem::new("b", 50.0)]);
///
/// assert_eq!(grid.snapshot().column_heights, vec![100.0, 50.0]);
/// let state = grid.render_item(1).unwrap();
/// assert_eq!(state.key, "b");
/// assert_eq!(state.position.x, 100.0);
/// ```
pub struct MasonryGridController<T> {
    config: MasonryGridConfig,
    key_fn: KeyFn<T>,
    host: Box<dyn GridHost>,
    listener: Box<dyn GridListener<T>>,
    clock: Box<dyn FrameClock>,

    items: Vec<GridItem<T>>,
    snapshot: GridSnapshot<T>,
    working: WorkingLayout<T>,
    index_by_key: FxHashMap<String, usize>,
    undraggable_keys: FxHashSet<String>,
    last_item_key: String,

    cache: GeometryCache,
    scroll: ScrollTracker,
    end_reached: EndReachedTracker,
    window_throttle: Throttle,
    scroll_event_throttle: Throttle,
    last_scroll_event_offset: Option<f32>,

    phase: DragPhase,
    drag: Option<DragSession<T>>,
    drag_transform: DragTransform,
    gesture_capture: bool,

    animator: Animator,
    continuations: FxHashMap<PlanId, Continuation>,
    timers: TimerQueue<GridTimer>,
    auto_scroll: AutoScroller,
    pending_scroll_to: Option<(f32, bool)>,
    remount_settle_offset: f32,
    render_key: u64,
}

fn entry_key<T>(key_fn: &dyn Fn(&T) -> String, entry: &LayoutEntry<T>) -> String {
    match &entry.kind {
        EntryKind::Item { item, .. } => key_fn(item),
        EntryKind::EmptySpace => format!("{}-{}", entry.column_index, entry.index),
    }
}

fn positions_by_key<T>(
    key_fn: &dyn Fn(&T) -> String,
    snapshot: &GridSnapshot<T>,
) -> FxHashMap<String, Point> {
    snapshot
        .entries_in_sequence
        .iter()
        .filter(|entry| !entry.is_empty_space())
        .map(|entry| (entry_key(key_fn, entry), entry.position))
        .collect()
}

fn find_original_index<T>(
    key_fn: &dyn Fn(&T) -> String,
    snapshot: &GridSnapshot<T>,
    key: &str,
) -> Option<usize> {
    snapshot
        .entries_in_sequence
        .iter()
        .find(|entry| !entry.is_empty_space() && entry_key(key_fn, entry) == key)
        .map(|entry| entry.original_index)
}

impl<T: Clone + 'static> MasonryGridController<T> {
    pub fn new(config: MasonryGridConfig, key_fn: impl Fn(&T) -> String + 'static) -> Self {
        let config = config.sanitized();
        let column_count = config.column_count;
        Self {
            key_fn: Box::new(key_fn),
            host: Box::new(NoopHost),
            listener: Box::new(NoopListener),
            clock: Box::new(SystemFrameClock::new()),
            items: Vec::new(),
            snapshot: GridSnapshot::empty(column_count),
            working: WorkingLayout {
                items: Vec::new(),
                snapshot: GridSnapshot::empty(column_count),
            },
            index_by_key: FxHashMap::default(),
            undraggable_keys: FxHashSet::default(),
            last_item_key: String::new(),
            cache: GeometryCache::new(),
            scroll: ScrollTracker::new(config.initial_viewport_height),
            end_reached: EndReachedTracker::default(),
            window_throttle: Throttle::new(config.timings.window_check_throttle_ms),
            scroll_event_throttle: Throttle::new(config.scroll_event_throttle_ms),
            last_scroll_event_offset: None,
            phase: DragPhase::Idle,
            drag: None,
            drag_transform: DragTransform::default(),
            gesture_capture: false,
            animator: Animator::new(),
            continuations: FxHashMap::default(),
            timers: TimerQueue::new(),
            auto_scroll: AutoScroller::new(),
            pending_scroll_to: None,
            remount_settle_offset: 0.0,
            render_key: 0,
            config,
        }
    }

    pub fn with_host(mut self, host: impl GridHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    pub fn with_listener(mut self, listener: impl GridListener<T> + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn with_clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_items(mut self, items: Vec<GridItem<T>>) -> Self {
        self.set_items(items);
        self
    }

    // ------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------

    /// Replaces the item sequence and relayouts immediately.
    pub fn set_items(&mut self, items: Vec<GridItem<T>>) {
        self.items = items;
        self.apply_data_change();
    }

    pub fn set_column_count(&mut self, column_count: usize) {
        self.config.column_count = column_count;
        self.config = self.config.clone().sanitized();
        self.apply_data_change();
    }

    pub fn set_column_width(&mut self, column_width: f32) {
        self.config.column_width = column_width;
        self.config = self.config.clone().sanitized();
        self.apply_data_change();
    }

    pub fn set_wobble(&mut self, enabled: bool) {
        self.config.wobble = enabled;
        self.sync_wobble();
    }

    fn apply_data_change(&mut self) {
        let snapshot = layout(&self.items, self.config.column_count, self.config.column_width);

        let mut live_keys = Vec::with_capacity(snapshot.entries_in_sequence.len());
        self.index_by_key.clear();
        self.undraggable_keys.clear();
        for entry in &snapshot.entries_in_sequence {
            let key = entry_key(&*self.key_fn, entry);
            if !entry.is_draggable {
                self.undraggable_keys.insert(key.clone());
            }
            if !entry.is_empty_space() {
                self.cache.ensure(&key, entry.vertex_offsets().copied());
                self.index_by_key.insert(key.clone(), entry.original_index);
                live_keys.push(key);
            }
        }
        for evicted in self.cache.retain_in_order(&live_keys) {
            if let Some(plan) = evicted.wobble_plan {
                self.animator.stop(plan);
            }
        }
        self.last_item_key = snapshot
            .entries_in_sequence
            .last()
            .map(|entry| entry_key(&*self.key_fn, entry))
            .unwrap_or_default();
        self.scroll.set_items_height(snapshot.content_height());
        self.snapshot = snapshot;

        if let Some(session) = self.drag.as_mut() {
            session.exclude = self.undraggable_keys.clone();
            session.exclude.insert(session.key.clone());
        }

        self.update_window(self.scroll.total());
        self.cache.remeasure(self.host.as_mut(), None);
        self.reset_offsets();
        self.working = WorkingLayout {
            items: self.items.clone(),
            snapshot: self.snapshot.clone(),
        };
        self.sync_wobble();
        log::debug!(
            "grid laid out: {} entries in {} columns, content height {}",
            self.snapshot.len(),
            self.snapshot.column_count(),
            self.snapshot.content_height()
        );
    }

    fn reset_offsets(&mut self) {
        for entry in self.cache.iter() {
            self.animator.snap(entry.offset.x(), 0.0);
            self.animator.snap(entry.offset.y(), 0.0);
        }
    }

    fn update_window(&mut self, scroll_offset: f32) {
        let band = WindowBand::new(scroll_offset, self.scroll.viewport_height(), self.config.window_size);
        let header = self.scroll.header_height();
        let dragged = self.drag.as_ref().map(|session| session.key.as_str());
        for entry in &self.snapshot.entries_in_sequence {
            if entry.is_empty_space() {
                continue;
            }
            let key = entry_key(&*self.key_fn, entry);
            let top = entry.offset_y + header;
            let should_render = band.intersects(top, top + entry.height) || dragged == Some(key.as_str());
            if let Some(geometry) = self.cache.get_mut(&key) {
                if geometry.should_render != should_render {
                    geometry.should_render = should_render;
                    self.host.set_should_render(&key, should_render);
                }
            }
        }
    }

    fn sync_wobble(&mut self) {
        let dragged = self.drag.as_ref().map(|session| session.key.clone());
        let now = self.clock.now_millis();
        for geometry in self.cache.iter_mut() {
            let should_wobble = self.config.wobble && dragged.as_deref() != Some(geometry.key.as_str());
            match (should_wobble, geometry.wobble_plan) {
                (true, None) => {
                    let plan = wobble_plan(&geometry.rotation, &geometry.key, &self.config.wobble_config);
                    geometry.wobble_plan = Some(self.animator.run(plan, now));
                }
                (false, Some(plan)) => {
                    self.animator.stop(plan);
                    self.animator.snap(&geometry.rotation, 0.0);
                    geometry.wobble_plan = None;
                }
                _ => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Drag
    // ------------------------------------------------------------------

    /// Picks up the item with `key`.
    ///
    /// Ignored while another drag is active, and for unknown or
    /// non-draggable keys.
    pub fn start_drag(&mut self, key: &str) {
        if self.phase != DragPhase::Idle {
            log::debug!("start_drag({key:?}) ignored: drag already {:?}", self.phase);
            return;
        }
        let entry = self
            .index_by_key
            .get(key)
            .and_then(|&index| self.snapshot.entry(index))
            .cloned();
        let Some(entry) = entry else {
            log::debug!("start_drag({key:?}) ignored: unknown key");
            return;
        };
        if !entry.is_draggable {
            log::debug!("start_drag({key:?}) ignored: item is not draggable");
            return;
        }

        let now = self.clock.now_millis();
        let mut exclude = self.undraggable_keys.clone();
        exclude.insert(key.to_owned());
        self.drag = Some(DragSession {
            key: key.to_owned(),
            entry,
            granted: false,
            grant_page_y: 0.0,
            grant_scroll: self.scroll.total(),
            exclude,
            pending_target: None,
            scheduled_target: None,
            rearrange_plan: None,
        });
        self.phase = DragPhase::Dragging;
        self.set_gesture_capture(true);
        self.sync_wobble();

        self.animator.snap(self.drag_transform.pan.x(), 0.0);
        self.animator.snap(self.drag_transform.pan.y(), 0.0);
        self.animator.snap(&self.drag_transform.translate_y, 0.0);
        self.cache.remeasure(self.host.as_mut(), None);

        let lift = AnimationPlan::new().with(
            Tween::new(
                &self.drag_transform.scale,
                self.config.dragged_item_scale,
                self.config.timings.scale_animation_ms,
            )
            .easing(Easing::EaseOutCubic),
        );
        self.run_plan(lift, now, Continuation::Lift);
        log::debug!("drag started for {key:?}");
    }

    /// Ends the active drag. A non-forced end waits for the responder
    /// transfer grace period and is cancelled by a touch grant.
    pub fn end_drag(&mut self, forced: bool) {
        if self.phase != DragPhase::Dragging {
            log::debug!("end_drag ignored: no active drag");
            return;
        }
        self.timers.cancel(GridTimer::DeferredRelease);
        if forced {
            self.trigger_drag_end();
        } else {
            let now = self.clock.now_millis();
            self.timers.schedule(
                GridTimer::DeferredRelease,
                now,
                self.config.timings.responder_transfer_grace_ms,
            );
        }
    }

    /// The grid became the touch responder at `page_y`.
    pub fn on_touch_grant(&mut self, page_y: f32) {
        let total = self.scroll.total();
        let Some(session) = self.drag.as_mut() else {
            log::trace!("touch grant without an active drag");
            return;
        };
        session.granted = true;
        session.grant_page_y = page_y;
        session.grant_scroll = total;
        if self.timers.cancel(GridTimer::DeferredRelease) {
            log::debug!("touch handed over to the grid, drag continues");
        }
    }

    /// Finger moved by `(dx, dy)` since the grant; `page_y` is its absolute
    /// position.
    pub fn on_touch_move(&mut self, dx: f32, dy: f32, page_y: f32) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        let total = self.scroll.total();
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        if !session.granted {
            session.granted = true;
            session.grant_page_y = page_y - dy;
            session.grant_scroll = total;
        }
        let key = session.key.clone();
        let entry_top = session.entry.offset_y;
        let height = session.entry.height;
        let vertex_offsets: Option<VertexOffsets> = session.entry.vertex_offsets().copied();
        let grant_page_y = session.grant_page_y;
        let grant_scroll = session.grant_scroll;

        self.animator.snap(self.drag_transform.pan.x(), dx);
        self.animator.snap(self.drag_transform.pan.y(), dy);

        let header = self.scroll.header_height();
        let current_y = ((page_y - grant_page_y) + (entry_top + header - grant_scroll)).round();
        let padding = self.config.edge_padding.min((height / 2.0).round());
        let post = self.config.view_post_offsets;
        let off_top = current_y < -padding + post.top;
        let off_bottom = current_y + height > self.scroll.viewport_height() + padding - post.bottom;

        if off_top || off_bottom {
            let (direction, extreme) = if off_top {
                (ScrollDirection::Up, self.scroll.top_extreme())
            } else {
                (ScrollDirection::Down, self.scroll.bottom_extreme())
            };
            if (extreme - total).abs() > MIN_AUTO_SCROLL_DISTANCE {
                if !self.auto_scroll.is_scrolling() && !self.is_rearrange_in_flight() {
                    self.start_auto_scroll(direction);
                }
                return;
            }
        } else {
            self.stop_auto_scroll();
        }

        let Some(dragged) = measure_vertices(
            self.host.as_mut(),
            &key,
            self.config.dragged_item_scale,
            vertex_offsets.as_ref(),
        ) else {
            return;
        };
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let Some(target) = find_overlap(&self.cache, &dragged, &session.exclude) else {
            return;
        };
        if session.pending_target.as_deref() == Some(target) {
            return;
        }
        log::trace!("rearrange toward {target:?} armed");
        session.pending_target = Some(target.to_owned());
        session.scheduled_target = Some(target.to_owned());
        let now = self.clock.now_millis();
        self.timers.schedule(
            GridTimer::Rearrange,
            now,
            self.config.timings.rearrange_debounce_ms,
        );
    }

    pub fn on_touch_release(&mut self) {
        self.end_drag(true);
    }

    fn set_gesture_capture(&mut self, enabled: bool) {
        if self.gesture_capture != enabled {
            self.gesture_capture = enabled;
            self.host.set_drag_capture(enabled);
        }
    }

    fn fire_rearrange(&mut self, now: u64) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let Some(target) = session.scheduled_target.take() else {
            return;
        };
        let dragged_key = session.key.clone();
        let previous_plan = session.rearrange_plan.take();

        let from = find_original_index(&*self.key_fn, &self.working.snapshot, &dragged_key);
        let to = find_original_index(&*self.key_fn, &self.working.snapshot, &target);
        let (Some(from), Some(to)) = (from, to) else {
            log::debug!("rearrange toward {target:?} skipped: key left the working layout");
            if let Some(session) = self.drag.as_mut() {
                session.pending_target = None;
                session.rearrange_plan = previous_plan;
            }
            return;
        };
        if let Some(plan) = previous_plan {
            self.stop_plan(plan);
        }

        let items = move_index(&self.working.items, from, to);
        let snapshot = layout(&items, self.config.column_count, self.config.column_width);
        let positions = positions_by_key(&*self.key_fn, &snapshot);

        let duration = self.config.timings.rearrange_animation_ms;
        let mut plan = AnimationPlan::new();
        for entry in &self.snapshot.entries_in_sequence {
            if entry.is_empty_space() {
                continue;
            }
            let key = entry_key(&*self.key_fn, entry);
            if key == dragged_key {
                continue;
            }
            let (Some(geometry), Some(new_position)) = (self.cache.get(&key), positions.get(&key)) else {
                continue;
            };
            let delta = Point::new(new_position.x - entry.position.x, new_position.y - entry.position.y);
            plan = plan.tween_offset(&geometry.offset, delta, duration, Easing::EaseInOutSine);
        }

        self.working = WorkingLayout { items, snapshot };
        let id = self.run_plan(plan, now, Continuation::Rearrange);
        if let Some(session) = self.drag.as_mut() {
            session.rearrange_plan = Some(id);
        }
        log::debug!("moved {dragged_key:?} from {from} to {to}");
    }

    fn finish_rearrange(&mut self, id: PlanId) {
        self.cache.remeasure(self.host.as_mut(), None);
        if let Some(session) = self.drag.as_mut() {
            if session.rearrange_plan == Some(id) {
                session.rearrange_plan = None;
            }
            session.pending_target = None;
        }
    }

    fn trigger_drag_end(&mut self) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        let now = self.clock.now_millis();
        self.phase = DragPhase::Releasing;
        self.set_gesture_capture(false);
        self.stop_auto_scroll();
        self.timers.cancel(GridTimer::Rearrange);
        let in_flight = self.drag.as_mut().and_then(|session| {
            session.pending_target = None;
            session.scheduled_target = None;
            session.rearrange_plan.take()
        });
        if let Some(plan) = in_flight {
            self.stop_plan(plan);
        }

        // Fold the animated scroll into the real scroll offset in one step.
        let total = self.scroll.total();
        self.animator.snap(self.scroll.translation(), 0.0);
        self.scroll.set_split(total, 0.0);
        self.host.scroll_to_offset(total, false);

        let duration = self.config.timings.rearrange_animation_ms;
        let positions = positions_by_key(&*self.key_fn, &self.working.snapshot);
        let mut plan = AnimationPlan::new();
        for entry in &self.snapshot.entries_in_sequence {
            if entry.is_empty_space() {
                continue;
            }
            let key = entry_key(&*self.key_fn, entry);
            let (Some(geometry), Some(new_position)) = (self.cache.get(&key), positions.get(&key)) else {
                continue;
            };
            let delta = Point::new(new_position.x - entry.position.x, new_position.y - entry.position.y);
            plan = plan.tween_offset(&geometry.offset, delta, duration, Easing::EaseInOutSine);
        }
        let plan = plan
            .tween_offset(&self.drag_transform.pan, Point::ZERO, duration, Easing::EaseInOutSine)
            .with(Tween::new(&self.drag_transform.translate_y, 0.0, duration).easing(Easing::EaseInOutSine))
            .with(
                Tween::new(&self.drag_transform.scale, 1.0, self.config.timings.scale_animation_ms)
                    .easing(Easing::EaseOutCubic),
            );
        self.run_plan(plan, now, Continuation::DragEnd);
        log::debug!("drag released");
    }

    fn finish_drag(&mut self, now: u64) {
        let Some(session) = self.drag.take() else {
            return;
        };
        self.phase = DragPhase::Idle;
        self.set_gesture_capture(false);
        self.items = std::mem::take(&mut self.working.items);

        self.render_key += 1;
        self.host.remount(self.render_key);

        // The remounted list starts at offset 0; carry the whole scroll in
        // the translation until it settled, then hand it back.
        let total = self.scroll.total();
        self.remount_settle_offset = total;
        self.scroll.set_split(0.0, total);
        self.host.scroll_to_offset(0.0, false);
        self.timers.schedule(GridTimer::RemountSettle, now, 0);

        self.animator.snap(&self.drag_transform.translate_y, 0.0);
        self.animator.snap(&self.drag_transform.scale, 1.0);
        self.animator.snap(self.drag_transform.pan.x(), 0.0);
        self.animator.snap(self.drag_transform.pan.y(), 0.0);

        self.apply_data_change();
        log::debug!("drag of {:?} committed, render key {}", session.key, self.render_key);
        self.listener.on_rearrange(self.items.clone());
    }

    fn settle_remount(&mut self) {
        let offset = self.remount_settle_offset;
        self.scroll.set_split(offset, 0.0);
        self.host.scroll_to_offset(offset, false);
    }

    // ------------------------------------------------------------------
    // Auto-scroll
    // ------------------------------------------------------------------

    fn start_auto_scroll(&mut self, direction: ScrollDirection) {
        let now = self.clock.now_millis();
        self.trigger_auto_scroll(direction, now);
        if self.config.end_reached_threshold.is_some() {
            self.timers.schedule_repeating(
                GridTimer::AutoScrollPoll,
                now,
                self.config.timings.auto_scroll_poll_ms,
            );
        }
    }

    fn trigger_auto_scroll(&mut self, direction: ScrollDirection, now: u64) {
        let started = self.auto_scroll.start(
            direction,
            &self.scroll,
            &self.drag_transform.translate_y,
            self.config.auto_scroll_velocity,
            &mut self.animator,
            now,
        );
        if let Some(id) = started {
            self.continuations.insert(id, Continuation::AutoScroll);
        }
    }

    fn poll_auto_scroll(&mut self, now: u64) {
        if self.phase != DragPhase::Dragging {
            self.timers.cancel(GridTimer::AutoScrollPoll);
            return;
        }
        if self.auto_scroll.is_scrolling() {
            return;
        }
        // The previous scroll finished; more content may have loaded since.
        if let Some(direction) = self.auto_scroll.direction() {
            self.trigger_auto_scroll(direction, now);
        }
    }

    fn stop_auto_scroll(&mut self) {
        self.timers.cancel(GridTimer::AutoScrollPoll);
        if let Some(id) = self.auto_scroll.stop(&mut self.animator) {
            self.continuations.remove(&id);
            self.remeasure_after_scroll();
        }
    }

    /// Cards moved on screen while the list scrolled under the finger.
    fn remeasure_after_scroll(&mut self) {
        let dragged = self.drag.as_ref().map(|session| session.key.as_str());
        self.cache.remeasure(self.host.as_mut(), dragged);
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    /// The host scroll view moved to `offset`.
    pub fn on_scroll(&mut self, offset: f32) {
        self.scroll.set_list_offset(offset);
        let now = self.clock.now_millis();
        self.handle_scroll(now);
    }

    /// The list viewport was laid out with `height`.
    pub fn on_layout(&mut self, height: f32) {
        self.scroll.set_viewport_height(height);
    }

    /// The list header was laid out with `height`.
    pub fn on_header_layout(&mut self, height: f32) {
        self.scroll.set_header_height(height);
    }

    fn handle_scroll(&mut self, now: u64) {
        let offset = self.scroll.total();
        if self.last_scroll_event_offset == Some(offset) {
            return;
        }
        self.last_scroll_event_offset = Some(offset);

        if let Some(threshold) = self.config.end_reached_threshold {
            let reached = self.end_reached.check(
                threshold,
                offset,
                self.scroll.bottom_extreme(),
                self.scroll.content_height(),
                &self.last_item_key,
            );
            if let Some(distance) = reached {
                log::debug!("end reached, {distance}px from the end");
                self.listener.on_end_reached(distance);
            }
        }
        if self.window_throttle.try_acquire(now) {
            self.update_window(offset);
        }
        if self.scroll_event_throttle.try_acquire(now) {
            self.listener.on_scroll(offset);
        }
    }

    /// Advances timers and animations to the clock's current time.
    pub fn on_frame(&mut self) {
        let now = self.clock.now_millis();
        for timer in self.timers.take_due(now) {
            self.fire_timer(timer, now);
        }
        let finished = self.animator.tick(now);
        if self.scroll.sync_from_translation() {
            self.handle_scroll(now);
        }
        for id in finished {
            if let Some(continuation) = self.continuations.remove(&id) {
                self.run_continuation(id, continuation, now);
            }
        }
    }

    fn fire_timer(&mut self, timer: GridTimer, now: u64) {
        log::trace!("timer {timer:?} fired");
        match timer {
            GridTimer::Rearrange => self.fire_rearrange(now),
            GridTimer::DeferredRelease => self.trigger_drag_end(),
            GridTimer::AutoScrollPoll => self.poll_auto_scroll(now),
            GridTimer::RemountSettle => self.settle_remount(),
            GridTimer::ScrollToIndex => {
                if let Some((offset, animated)) = self.pending_scroll_to.take() {
                    let offset = offset + self.scroll.header_height();
                    self.host.scroll_to_offset(offset, animated);
                }
            }
        }
    }

    fn run_continuation(&mut self, id: PlanId, continuation: Continuation, now: u64) {
        match continuation {
            Continuation::Lift | Continuation::SyncPositions => {}
            Continuation::Rearrange => self.finish_rearrange(id),
            Continuation::DragEnd => self.finish_drag(now),
            Continuation::AutoScroll => {
                if self.auto_scroll.plan_finished(id) {
                    self.remeasure_after_scroll();
                }
            }
        }
    }

    fn run_plan(&mut self, plan: AnimationPlan, now: u64, continuation: Continuation) -> PlanId {
        let id = self.animator.run(plan, now);
        self.continuations.insert(id, continuation);
        id
    }

    fn stop_plan(&mut self, id: PlanId) {
        self.animator.stop(id);
        self.continuations.remove(&id);
    }

    // ------------------------------------------------------------------
    // Imperative handle
    // ------------------------------------------------------------------

    pub fn scroll_to_top(&mut self, animated: bool) {
        self.host.scroll_to_offset(0.0, animated);
    }

    /// Scrolls so the item at `index` sits `offset` pixels below the top.
    /// Deferred to the next frame; unknown indices are ignored.
    pub fn scroll_to_index(&mut self, index: usize, offset: f32, animated: bool) {
        let Some(entry) = self.snapshot.entry(index) else {
            log::debug!("scroll_to_index({index}) ignored: no such item");
            return;
        };
        self.pending_scroll_to = Some((entry.offset_y + offset, animated));
        let now = self.clock.now_millis();
        self.timers.schedule(GridTimer::ScrollToIndex, now, 0);
    }

    /// Animates every card back to the slot it holds in the committed
    /// sequence and discards the working sequence.
    pub fn animate_to_original_positions(&mut self) -> PlanId {
        let now = self.clock.now_millis();
        let snapshot = layout(&self.items, self.config.column_count, self.config.column_width);
        let positions = positions_by_key(&*self.key_fn, &snapshot);
        let duration = self.config.timings.rearrange_animation_ms;

        let mut plan = AnimationPlan::new();
        for entry in &self.snapshot.entries_in_sequence {
            if entry.is_empty_space() {
                continue;
            }
            let key = entry_key(&*self.key_fn, entry);
            let (Some(geometry), Some(new_position)) = (self.cache.get(&key), positions.get(&key)) else {
                continue;
            };
            let delta = Point::new(new_position.x - entry.position.x, new_position.y - entry.position.y);
            plan = plan.tween_offset(&geometry.offset, delta, duration, Easing::EaseInOutSine);
        }
        let plan = plan.tween_offset(&self.drag_transform.pan, Point::ZERO, duration, Easing::EaseInOutSine);

        self.working = WorkingLayout {
            items: self.items.clone(),
            snapshot,
        };
        self.run_plan(plan, now, Continuation::SyncPositions)
    }

    pub fn is_animation_running(&self, id: PlanId) -> bool {
        self.animator.is_running(id)
    }

    /// Cancels every timer and animation. The grid keeps its data.
    pub fn dispose(&mut self) {
        self.timers.clear();
        self.auto_scroll.stop(&mut self.animator);
        self.animator.stop_all();
        self.continuations.clear();
        for geometry in self.cache.iter_mut() {
            geometry.wobble_plan = None;
        }
        self.pending_scroll_to = None;
        self.drag = None;
        self.phase = DragPhase::Idle;
        self.set_gesture_capture(false);
        log::debug!("grid disposed");
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn config(&self) -> &MasonryGridConfig {
        &self.config
    }

    /// Committed layout.
    pub fn snapshot(&self) -> &GridSnapshot<T> {
        &self.snapshot
    }

    /// Committed sequence.
    pub fn items(&self) -> &[GridItem<T>] {
        &self.items
    }

    /// Sequence the grid will commit when the current drag ends.
    pub fn working_items(&self) -> &[GridItem<T>] {
        &self.working.items
    }

    pub fn working_snapshot(&self) -> &GridSnapshot<T> {
        &self.working.snapshot
    }

    pub fn geometry(&self, key: &str) -> Option<&ItemGeometry> {
        self.cache.get(key)
    }

    /// Render state of the committed item at `original_index`. `None` for
    /// out-of-range indices and height equalizer spacers.
    ///
    /// # Panics
    ///
    /// Panics when a laid out item has no geometry cache entry.
    pub fn render_item(&self, original_index: usize) -> Option<ItemRenderState> {
        let entry = self.snapshot.entry(original_index)?;
        if entry.is_empty_space() {
            return None;
        }
        let key = entry_key(&*self.key_fn, entry);
        let geometry = self.cache.expect_entry(&key, "render_item");
        Some(self.render_state(entry, key, geometry))
    }

    pub fn item_render_state(&self, key: &str) -> Option<ItemRenderState> {
        let entry = self.snapshot.entry(*self.index_by_key.get(key)?)?;
        let geometry = self.cache.get(key)?;
        Some(self.render_state(entry, key.to_owned(), geometry))
    }

    /// Render states of every committed item, in sequence order.
    pub fn render_states(&self) -> Vec<ItemRenderState> {
        (0..self.snapshot.len())
            .filter_map(|index| self.render_item(index))
            .collect()
    }

    fn render_state(&self, entry: &LayoutEntry<T>, key: String, geometry: &ItemGeometry) -> ItemRenderState {
        let is_dragged = self.drag.as_ref().is_some_and(|session| session.key == key);
        ItemRenderState {
            key,
            original_index: entry.original_index,
            column_index: entry.column_index,
            index: entry.index,
            position: entry.position,
            width: self.config.column_width,
            height: entry.height,
            offset: geometry.offset.clone(),
            drag: is_dragged.then(|| self.drag_transform.clone()),
            rotation: geometry.rotation.clone(),
            should_render: geometry.should_render,
            always_render: entry.index < self.config.initial_num_to_render,
            z_index: i32::from(is_dragged),
        }
    }

    /// Current wobble rotation of `key`, in degrees.
    pub fn rotation_degrees(&self, key: &str) -> Option<RotationDegrees> {
        let geometry = self.cache.get(key)?;
        Some(RotationDegrees::from_value(geometry.rotation.get(), &self.config.wobble_config))
    }

    /// The column holding the dragged card draws above its neighbours.
    pub fn column_z_index(&self, column_index: usize) -> i32 {
        let raised = self
            .drag
            .as_ref()
            .is_some_and(|session| session.entry.column_index == column_index);
        i32::from(raised)
    }

    pub fn dragged_key(&self) -> Option<&str> {
        self.drag.as_ref().map(|session| session.key.as_str())
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn pending_rearrange_target(&self) -> Option<&str> {
        self.drag.as_ref().and_then(|session| session.pending_target.as_deref())
    }

    pub fn is_rearrange_in_flight(&self) -> bool {
        self.drag
            .as_ref()
            .is_some_and(|session| session.rearrange_plan.is_some())
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.auto_scroll.is_scrolling()
    }

    pub fn is_auto_scroll_polling(&self) -> bool {
        self.timers.is_pending(GridTimer::AutoScrollPoll)
    }

    pub fn has_drag_capture(&self) -> bool {
        self.gesture_capture
    }

    pub fn total_scroll_offset(&self) -> f32 {
        self.scroll.total()
    }

    pub fn list_scroll_offset(&self) -> f32 {
        self.scroll.list_offset()
    }

    /// Translation the host applies to the columns and the header.
    pub fn scroll_translation(&self) -> AnimatedValue {
        self.scroll.translation().clone()
    }

    pub fn header_height(&self) -> f32 {
        self.scroll.header_height()
    }

    pub fn viewport_height(&self) -> f32 {
        self.scroll.viewport_height()
    }

    pub fn render_key(&self) -> u64 {
        self.render_key
    }

    /// True when no drag, timer or tracked animation is outstanding. Wobble
    /// never blocks settling.
    pub fn is_settled(&self) -> bool {
        self.phase == DragPhase::Idle && self.timers.is_empty() && self.continuations.is_empty()
    }
}
