//! Frame time source.

use std::rc::Rc;

use web_time::Instant;

/// Supplies the current time, in milliseconds, to [`crate::MasonryGridController::on_frame`].
///
/// Only differences between readings matter; the origin is arbitrary.
pub trait FrameClock {
    fn now_millis(&self) -> u64;
}

/// Monotonic wall clock. Works on `wasm32` through `web-time`.
#[derive(Clone, Copy, Debug)]
pub struct SystemFrameClock {
    origin: Instant,
}

impl SystemFrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemFrameClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl<C: FrameClock + ?Sized> FrameClock for Rc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}
