//! Drag-and-reorder masonry grid engine.
//!
//! `draggrid` lays variable-height cards out in columns, lets the user pick
//! one up with a long press, moves the other cards out of its way while it
//! hovers over them and reports the new order once the card is dropped.
//!
//! The engine renders nothing. A host (a virtualized list in some UI
//! toolkit) implements [`GridHost`], forwards touch and scroll events to a
//! [`MasonryGridController`] and draws each cell from the
//! [`ItemRenderState`] the controller returns.
//!
//! # Example
//!
//! ```rust
//! use draggrid::prelude::*;
//!
//! let mut grid = MasonryGridController::new(
//!     MasonryGridConfig::new().column_count(2).column_width(180.0),
//!     |card: &u32| card.to_string(),
//! );
//! grid.set_items(vec![
//!     GridItem::new(1, 240.0),
//!     GridItem::new(2, 120.0),
//!     GridItem::HeightEqualizer,
//!     GridItem::pinned(3, 60.0),
//! ]);
//! assert_eq!(grid.snapshot().column_heights, vec![300.0, 240.0]);
//!
//! grid.start_drag("1");
//! assert_eq!(grid.phase(), DragPhase::Dragging);
//! ```

pub use draggrid_animation as animation;
pub use draggrid_foundation as foundation;
pub use draggrid_layout as layout;

pub use draggrid_foundation::{
    DragPhase, DragTimings, FrameClock, GridHost, GridListener, ItemRenderState,
    MasonryGridConfig, MasonryGridController, NoopHost, NoopListener, RotationDegrees,
    SystemFrameClock, ViewPostOffsets, WobbleConfig,
};
pub use draggrid_layout::{
    GridItem, GridSnapshot, LayoutEntry, Point, VertexOffsets, ViewMeasurement,
};

pub mod prelude {
    pub use crate::{
        DragPhase, GridHost, GridItem, GridListener, ItemRenderState, MasonryGridConfig,
        MasonryGridController,
    };
}
