//! Shared animated channels.

use std::cell::Cell;
use std::rc::Rc;

use draggrid_layout::Point;

/// A single animated number.
///
/// Clones share the same underlying cell: the controller writes through one
/// handle while the rendering host reads through another.
#[derive(Clone, Debug, Default)]
pub struct AnimatedValue {
    inner: Rc<Cell<f32>>,
}

impl AnimatedValue {
    pub fn new(initial: f32) -> Self {
        Self {
            inner: Rc::new(Cell::new(initial)),
        }
    }

    pub fn get(&self) -> f32 {
        self.inner.get()
    }

    /// Writes the value directly. This does not stop tweens that target the
    /// value; use [`crate::Animator::snap`] for that.
    pub fn set(&self, value: f32) {
        self.inner.set(value);
    }

    /// True when both handles point at the same channel.
    pub fn same_channel(&self, other: &AnimatedValue) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A 2-D animated offset made of two independent channels.
#[derive(Clone, Debug, Default)]
pub struct AnimatedOffset {
    x: AnimatedValue,
    y: AnimatedValue,
}

impl AnimatedOffset {
    pub fn new(initial: Point) -> Self {
        Self {
            x: AnimatedValue::new(initial.x),
            y: AnimatedValue::new(initial.y),
        }
    }

    pub fn get(&self) -> Point {
        Point::new(self.x.get(), self.y.get())
    }

    pub fn set(&self, value: Point) {
        self.x.set(value.x);
        self.y.set(value.y);
    }

    pub fn x(&self) -> &AnimatedValue {
        &self.x
    }

    pub fn y(&self) -> &AnimatedValue {
        &self.y
    }
}
