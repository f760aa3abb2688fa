//! Runtime engine of the draggrid masonry grid.
//!
//! # Architecture
//!
//! The crate sits between a rendering host (a virtualized list that mounts
//! one cell per item) and the pure layout in `draggrid-layout`:
//!
//! - [`controller`] - [`MasonryGridController`], the single owner of grid state
//! - [`geometry_cache`] and [`overlap`] - measured card quads and hit testing
//! - [`scroll`], [`auto_scroll`] and [`windowing`] - scroll bookkeeping,
//!   edge scrolling and mount windows
//! - [`timers`] and [`clock`] - deferred work driven by the host's frame clock
//! - [`render`] and [`wobble`] - per-cell render state and idle animation
//! - [`host`] - the traits the controller talks to the outside world through
//!
//! Nothing here spawns threads or reads the wall clock on its own: every
//! state change happens inside a call from the host, which makes the whole
//! engine deterministic under a manual clock.

pub mod auto_scroll;
pub mod clock;
pub mod config;
pub mod controller;
pub mod geometry_cache;
pub mod host;
pub mod overlap;
pub mod render;
pub mod scroll;
pub mod timers;
pub mod windowing;
pub mod wobble;

pub use auto_scroll::{AutoScroller, ScrollDirection, MIN_AUTO_SCROLL_DISTANCE};
pub use clock::{FrameClock, SystemFrameClock};
pub use config::{DragTimings, MasonryGridConfig, ViewPostOffsets, WobbleConfig};
pub use controller::{DragPhase, KeyFn, MasonryGridController};
pub use geometry_cache::{GeometryCache, ItemGeometry};
pub use host::{GridHost, GridListener, NoopHost, NoopListener};
pub use render::{DragTransform, ItemRenderState, RotationDegrees};
pub use scroll::{EndReachedTracker, ScrollTracker, END_REACHED_MIN_DISTANCE};
pub use timers::TimerQueue;
pub use windowing::{Throttle, WindowBand};
