//! Viewport windowing.
//!
//! Only cards inside an extended band around the viewport keep their content
//! mounted. The band spans `window_size` viewport heights centred on the
//! visible area, the same unit a lazy list uses for its render window.

/// Vertical band, in list content coordinates, whose cards stay mounted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowBand {
    pub min_y: f32,
    pub max_y: f32,
}

impl WindowBand {
    pub fn new(scroll_offset: f32, viewport_height: f32, window_size: usize) -> Self {
        let window_size = window_size.max(1) as f32;
        let extension = viewport_height * (window_size - 1.0) / 2.0;
        Self {
            min_y: (scroll_offset - extension).round(),
            max_y: (scroll_offset + viewport_height + extension).round(),
        }
    }

    /// True when a card spanning `top..bottom` touches the band. Edges count.
    pub fn intersects(&self, top: f32, bottom: f32) -> bool {
        bottom >= self.min_y && top <= self.max_y
    }
}

/// Lets an action through at most once per interval.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Returns true, and records `now_ms`, when the interval has elapsed
    /// since the last accepted call.
    pub fn try_acquire(&mut self, now_ms: u64) -> bool {
        let ready = match self.last_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
            None => true,
        };
        if ready {
            self.last_ms = Some(now_ms);
        }
        ready
    }
}
