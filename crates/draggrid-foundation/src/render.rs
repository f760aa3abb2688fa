//! What a rendering host needs to draw one cell.

use draggrid_animation::{AnimatedOffset, AnimatedValue};
use draggrid_layout::Point;

use crate::config::WobbleConfig;

/// Transforms applied only to the card being dragged.
///
/// The controller owns one set of channels and hands clones to whichever
/// cell is currently dragged.
#[derive(Clone, Debug)]
pub struct DragTransform {
    /// Finger displacement since the drag started.
    pub pan: AnimatedOffset,
    /// Cancels out auto-scroll so the card stays under the finger.
    pub translate_y: AnimatedValue,
    pub scale: AnimatedValue,
}

impl Default for DragTransform {
    fn default() -> Self {
        Self {
            pan: AnimatedOffset::default(),
            translate_y: AnimatedValue::new(0.0),
            scale: AnimatedValue::new(1.0),
        }
    }
}

/// Rotation of a wobbling card around each axis, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationDegrees {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationDegrees {
    /// Maps a rotation value in `[-1, 1]` onto the configured peak angles.
    pub fn from_value(value: f32, config: &WobbleConfig) -> Self {
        let value = value.clamp(-1.0, 1.0);
        Self {
            x: value * config.rotation_x_deg,
            y: value * config.rotation_y_deg,
            z: value * config.rotation_z_deg,
        }
    }
}

/// Render-time view of one item cell.
///
/// Animated fields are live handles; reading them between frames yields
/// the current animation value.
#[derive(Clone, Debug)]
pub struct ItemRenderState {
    pub key: String,
    pub original_index: usize,
    pub column_index: usize,
    /// Index within the column.
    pub index: usize,
    /// Layout position inside the grid content, before any transform.
    pub position: Point,
    pub width: f32,
    pub height: f32,
    /// Rearrangement offset relative to `position`.
    pub offset: AnimatedOffset,
    /// Present only on the dragged card.
    pub drag: Option<DragTransform>,
    /// Wobble rotation in `[-1, 1]`.
    pub rotation: AnimatedValue,
    pub should_render: bool,
    pub always_render: bool,
    pub z_index: i32,
}

impl ItemRenderState {
    pub fn is_dragged(&self) -> bool {
        self.drag.is_some()
    }

    /// True when the cell content should be mounted.
    pub fn is_visible(&self) -> bool {
        self.always_render || self.should_render
    }

    /// Total translation applied on top of `position`.
    pub fn translation(&self) -> Point {
        let offset = self.offset.get();
        match &self.drag {
            Some(drag) => {
                let pan = drag.pan.get();
                Point::new(offset.x + pan.x, offset.y + pan.y + drag.translate_y.get())
            }
            None => offset,
        }
    }

    pub fn scale(&self) -> f32 {
        self.drag.as_ref().map_or(1.0, |drag| drag.scale.get())
    }
}
