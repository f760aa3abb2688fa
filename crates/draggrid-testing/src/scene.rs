//! In-memory stand-in for the rendering host.
//!
//! [`FakeScene`] mirrors what a real virtualized list would have on screen:
//! one cell per item at its layout position, moved by the live animation
//! channels the controller hands out. Measurements are computed from those
//! channels at the moment the controller asks for them.

use std::cell::RefCell;
use std::rc::Rc;

use draggrid_animation::AnimatedValue;
use draggrid_foundation::{GridHost, GridListener, ItemRenderState};
use draggrid_layout::{GridItem, ViewMeasurement};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Default)]
pub struct FakeScene {
    pub items: FxHashMap<String, ItemRenderState>,
    pub header_height: f32,
    /// Offset of the host scroll view.
    pub list_offset: f32,
    /// Translation applied to the columns.
    pub translation: AnimatedValue,
    /// Keys whose measurement fails, as for a cell that is not attached.
    pub unmeasurable: FxHashSet<String>,

    pub should_render_calls: Vec<(String, bool)>,
    pub scroll_requests: Vec<(f32, bool)>,
    pub remounts: Vec<u64>,
    pub drag_capture: Vec<bool>,
}

impl FakeScene {
    /// Page-space rectangle of the cell for `key`, before scale.
    pub fn measure(&self, key: &str) -> Option<ViewMeasurement> {
        if self.unmeasurable.contains(key) {
            return None;
        }
        self.bounds(key)
    }

    /// Where the cell for `key` is drawn, whether or not it can be measured.
    pub fn bounds(&self, key: &str) -> Option<ViewMeasurement> {
        let state = self.items.get(key)?;
        let translation = state.translation();
        let page_y = self.header_height + state.position.y + translation.y + self.translation.get()
            - self.list_offset;
        Some(ViewMeasurement::at_page(
            state.position.x + translation.x,
            page_y,
            state.width,
            state.height,
        ))
    }

    /// Last mount state pushed for `key`.
    pub fn last_should_render(&self, key: &str) -> Option<bool> {
        self.should_render_calls
            .iter()
            .rev()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, should_render)| *should_render)
    }
}

/// [`GridHost`] backed by a shared [`FakeScene`].
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    scene: Rc<RefCell<FakeScene>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> Rc<RefCell<FakeScene>> {
        Rc::clone(&self.scene)
    }
}

impl GridHost for RecordingHost {
    fn measure(&mut self, key: &str) -> Option<ViewMeasurement> {
        self.scene.borrow().measure(key)
    }

    fn set_should_render(&mut self, key: &str, should_render: bool) {
        self.scene
            .borrow_mut()
            .should_render_calls
            .push((key.to_owned(), should_render));
    }

    fn scroll_to_offset(&mut self, offset: f32, animated: bool) {
        let mut scene = self.scene.borrow_mut();
        scene.list_offset = offset;
        scene.scroll_requests.push((offset, animated));
    }

    fn remount(&mut self, render_key: u64) {
        self.scene.borrow_mut().remounts.push(render_key);
    }

    fn set_drag_capture(&mut self, enabled: bool) {
        self.scene.borrow_mut().drag_capture.push(enabled);
    }
}

#[derive(Debug)]
pub struct ListenerLog<T> {
    pub rearrangements: Vec<Vec<GridItem<T>>>,
    pub scrolls: Vec<f32>,
    pub end_reached: Vec<f32>,
}

impl<T> Default for ListenerLog<T> {
    fn default() -> Self {
        Self {
            rearrangements: Vec::new(),
            scrolls: Vec::new(),
            end_reached: Vec::new(),
        }
    }
}

/// [`GridListener`] that records every callback.
#[derive(Debug)]
pub struct RecordingListener<T> {
    log: Rc<RefCell<ListenerLog<T>>>,
}

impl<T> Clone for RecordingListener<T> {
    fn clone(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
        }
    }
}

impl<T> Default for RecordingListener<T> {
    fn default() -> Self {
        Self {
            log: Rc::new(RefCell::new(ListenerLog::default())),
        }
    }
}

impl<T> RecordingListener<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<ListenerLog<T>>> {
        Rc::clone(&self.log)
    }
}

impl<T> GridListener<T> for RecordingListener<T> {
    fn on_rearrange(&mut self, items: Vec<GridItem<T>>) {
        self.log.borrow_mut().rearrangements.push(items);
    }

    fn on_scroll(&mut self, offset: f32) {
        self.log.borrow_mut().scrolls.push(offset);
    }

    fn on_end_reached(&mut self, distance_from_end: f32) {
        self.log.borrow_mut().end_reached.push(distance_from_end);
    }
}
