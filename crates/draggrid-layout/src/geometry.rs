//! Geometry primitives used by overlap detection.
//!
//! All coordinates are page coordinates (pixels from the top-left corner of
//! the screen), which is what a rendering host reports from a measure pass.

/// A point in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance_to(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn offset_by(self, offset: Option<Point>) -> Point {
        match offset {
            Some(offset) => Point::new(self.x + offset.x, self.y + offset.y),
            None => self,
        }
    }

    fn rounded(self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }
}

/// Raw result of measuring a mounted cell.
///
/// `x`/`y` are relative to the cell's parent, `page_x`/`page_y` are
/// absolute. Width and height are the laid out size, before any scale
/// transform is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewMeasurement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub page_x: f32,
    pub page_y: f32,
}

impl ViewMeasurement {
    /// Convenience constructor for a cell whose parent sits at the page origin.
    pub fn at_page(page_x: f32, page_y: f32, width: f32, height: f32) -> Self {
        Self {
            x: page_x,
            y: page_y,
            width,
            height,
            page_x,
            page_y,
        }
    }
}

/// Per-vertex pixel corrections supplied by the caller.
///
/// Cards whose visible content does not fill their cell (drop shadows,
/// rounded badges) use these to pull the overlap quad toward what the user
/// actually sees. Edge midpoints follow the adjacent corners, the centre
/// correction also shifts the horizontal position of the top/bottom
/// midpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexOffsets {
    pub top_left: Option<Point>,
    pub top_right: Option<Point>,
    pub bottom_left: Option<Point>,
    pub bottom_right: Option<Point>,
    pub center: Option<Point>,
}

/// Reference points of an on-screen bounding rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertices {
    pub top_left: Point,
    pub top_center: Point,
    pub top_right: Point,
    pub center_left: Point,
    pub center: Point,
    pub center_right: Point,
    pub bottom_left: Point,
    pub bottom_center: Point,
    pub bottom_right: Point,
}

impl Vertices {
    /// Builds the quad of an axis-aligned rectangle.
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::from_measurement(&ViewMeasurement::at_page(left, top, width, height), 1.0, None)
    }

    /// Computes vertices from a measurement.
    ///
    /// `scale` is the visual scale currently applied to the cell. The quad is
    /// contracted toward the centre by half of the scale excess, so a lifted
    /// (enlarged) card has to travel further into a neighbour before its
    /// centre counts as inside. Every coordinate is rounded to whole pixels.
    pub fn from_measurement(
        measurement: &ViewMeasurement,
        scale: f32,
        offsets: Option<&VertexOffsets>,
    ) -> Self {
        let corner_scale = (scale - 1.0) / 2.0 + 1.0;
        let corner_scale = if corner_scale > 0.0 { corner_scale } else { 1.0 };
        let offsets = offsets.copied().unwrap_or_default();

        let center = Point::new(
            measurement.page_x + measurement.width / 2.0,
            measurement.page_y + measurement.height / 2.0,
        );
        let half_width = measurement.width / 2.0 / corner_scale;
        let half_height = measurement.height / 2.0 / corner_scale;

        let left = center.x - half_width;
        let right = center.x + half_width;
        let top = center.y - half_height;
        let bottom = center.y + half_height;

        let top_left = Point::new(left, top).offset_by(offsets.top_left);
        let top_right = Point::new(right, top).offset_by(offsets.top_right);
        let bottom_left = Point::new(left, bottom).offset_by(offsets.bottom_left);
        let bottom_right = Point::new(right, bottom).offset_by(offsets.bottom_right);
        let center_x = center.x + offsets.center.map_or(0.0, |offset| offset.x);

        Self {
            top_left: top_left.rounded(),
            top_center: Point::new(center_x, top_left.y).rounded(),
            top_right: top_right.rounded(),
            center_left: Point::new(top_left.x, (top_left.y + bottom_left.y) / 2.0).rounded(),
            center: center.offset_by(offsets.center).rounded(),
            center_right: Point::new(top_right.x, (top_right.y + bottom_right.y) / 2.0).rounded(),
            bottom_left: bottom_left.rounded(),
            bottom_center: Point::new(center_x, bottom_right.y).rounded(),
            bottom_right: bottom_right.rounded(),
        }
    }

    /// Strict containment against the box spanned by `top_left` and
    /// `bottom_right`. Points on the edge are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.top_left.x
            && point.y > self.top_left.y
            && point.x < self.bottom_right.x
            && point.y < self.bottom_right.y
    }

    /// True when each quad contains the other's centre.
    pub fn mutually_contains_centers(&self, other: &Vertices) -> bool {
        self.contains(other.center) && other.contains(self.center)
    }

    /// True when either quad contains the other's centre.
    pub fn overlaps(&self, other: &Vertices) -> bool {
        self.contains(other.center) || other.contains(self.center)
    }

    pub fn width(&self) -> f32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bottom_right.y - self.top_left.y
    }
}
