//! Seams to the rendering host and to the grid's owner.
//!
//! The controller never renders anything itself. It asks a [`GridHost`] to
//! measure cells, toggle their mount state and move the scroll view, and it
//! reports user-visible outcomes to a [`GridListener`]. Every method has a
//! no-op default so hosts only implement what they support.

use draggrid_layout::{GridItem, ViewMeasurement};

/// The virtualized list that mounts item cells.
pub trait GridHost {
    /// Measures the mounted cell for `key`. `None` when the cell is not
    /// attached or cannot be measured right now.
    fn measure(&mut self, _key: &str) -> Option<ViewMeasurement> {
        None
    }

    /// Mounts or unmounts the content of a cell.
    fn set_should_render(&mut self, _key: &str, _should_render: bool) {}

    /// Moves the scroll view.
    fn scroll_to_offset(&mut self, _offset: f32, _animated: bool) {}

    /// Asks the host to recreate the list; `render_key` changes every time.
    fn remount(&mut self, _render_key: u64) {}

    /// While enabled the grid owns every touch and the scroll view must not
    /// scroll on its own.
    fn set_drag_capture(&mut self, _enabled: bool) {}
}

/// Receives the outcome of user interaction.
pub trait GridListener<T> {
    /// Called once per completed drag with the full reordered sequence,
    /// height equalizer markers included.
    fn on_rearrange(&mut self, _items: Vec<GridItem<T>>) {}

    fn on_scroll(&mut self, _offset: f32) {}

    /// Only called when an end-reached threshold is configured.
    fn on_end_reached(&mut self, _distance_from_end: f32) {}
}

/// Host that measures nothing and ignores every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHost;

impl GridHost for NoopHost {}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl<T> GridListener<T> for NoopListener {}
