//! Layout contracts for draggrid.
//!
//! This crate is pure: it owns no state and never talks to a rendering host.
//!
//! - [`geometry`] - points, measured rectangles and vertex quads
//! - [`sequence`] - insert/remove/move helpers over ordered item sequences
//! - [`masonry`] - greedy shortest-column-first masonry layout and its inverse

pub mod geometry;
pub mod masonry;
pub mod sequence;

pub use geometry::*;
pub use masonry::*;
pub use sequence::*;
