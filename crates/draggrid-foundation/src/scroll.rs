//! Scroll position bookkeeping.
//!
//! The visible scroll position is split between two sources: the host's
//! scroll view (`list_offset`) and an animated translation applied to every
//! column (`animated_offset`). Auto-scroll moves only the animated part, the
//! host scroll view stays put while a drag owns the touch. The two are folded
//! back together when the drag ends.

use draggrid_animation::AnimatedValue;

#[derive(Debug)]
pub struct ScrollTracker {
    list_offset: f32,
    animated_offset: f32,
    /// Translation applied to the columns and header; always
    /// `-animated_offset` once synced.
    translation: AnimatedValue,
    header_height: f32,
    viewport_height: f32,
    items_height: f32,
}

impl ScrollTracker {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            list_offset: 0.0,
            animated_offset: 0.0,
            translation: AnimatedValue::new(0.0),
            header_height: 0.0,
            viewport_height,
            items_height: 0.0,
        }
    }

    pub fn list_offset(&self) -> f32 {
        self.list_offset
    }

    pub fn animated_offset(&self) -> f32 {
        self.animated_offset
    }

    pub fn total(&self) -> f32 {
        self.list_offset + self.animated_offset
    }

    /// Channel the host applies as `translateY` to the columns and header.
    pub fn translation(&self) -> &AnimatedValue {
        &self.translation
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Height of the scrollable content, header included.
    pub fn content_height(&self) -> f32 {
        self.items_height + self.header_height
    }

    pub fn top_extreme(&self) -> f32 {
        0.0
    }

    /// Largest reachable scroll offset.
    pub fn bottom_extreme(&self) -> f32 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    pub fn set_list_offset(&mut self, offset: f32) {
        self.list_offset = offset;
    }

    pub fn set_header_height(&mut self, height: f32) {
        self.header_height = height.round();
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.round();
    }

    pub fn set_items_height(&mut self, height: f32) {
        self.items_height = height;
    }

    /// Re-reads the translation channel after an animation frame. Returns
    /// true when the total scroll moved.
    pub fn sync_from_translation(&mut self) -> bool {
        let animated_offset = -self.translation.get();
        if animated_offset == self.animated_offset {
            return false;
        }
        self.animated_offset = animated_offset;
        true
    }

    /// Sets both parts at once and updates the translation channel.
    ///
    /// Callers must stop any animation driving the channel first.
    pub fn set_split(&mut self, list_offset: f32, animated_offset: f32) {
        self.list_offset = list_offset;
        self.animated_offset = animated_offset;
        self.translation.set(-animated_offset);
    }
}

/// Fires end-reached at most once per distinct last item.
#[derive(Debug, Default)]
pub struct EndReachedTracker {
    last_reported_key: Option<String>,
}

/// Distance under which end-reached fires regardless of the threshold.
pub const END_REACHED_MIN_DISTANCE: f32 = 10.0;

impl EndReachedTracker {
    /// Returns the rounded distance from the end when end-reached should
    /// fire for a scroll to `offset`.
    pub fn check(
        &mut self,
        threshold: f32,
        offset: f32,
        bottom_extreme: f32,
        content_height: f32,
        last_item_key: &str,
    ) -> Option<f32> {
        let distance = (bottom_extreme - offset).round();
        let ratio = if content_height > 0.0 {
            distance / content_height
        } else {
            0.0
        };
        if distance >= END_REACHED_MIN_DISTANCE && ratio > threshold {
            return None;
        }
        if self.last_reported_key.as_deref() == Some(last_item_key) {
            return None;
        }
        self.last_reported_key = Some(last_item_key.to_owned());
        Some(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_sync() {
        let mut scroll = ScrollTracker::new(800.0);
        scroll.set_list_offset(100.0);
        scroll.translation().set(-50.0);
        assert!(scroll.sync_from_translation());
        assert!(!scroll.sync_from_translation());
        assert_eq!(scroll.total(), 150.0);

        scroll.set_split(150.0, 0.0);
        assert_eq!(scroll.translation().get(), 0.0);
        assert_eq!(scroll.total(), 150.0);

        scroll.set_split(0.0, 150.0);
        assert_eq!(scroll.translation().get(), -150.0);
        assert_eq!(scroll.total(), 150.0);
    }

    #[test]
    fn test_extremes() {
        let mut scroll = ScrollTracker::new(300.0);
        scroll.set_items_height(1_000.0);
        scroll.set_header_height(49.6);
        assert_eq!(scroll.content_height(), 1_050.0);
        assert_eq!(scroll.bottom_extreme(), 750.0);

        scroll.set_items_height(100.0);
        assert_eq!(scroll.bottom_extreme(), 0.0);
    }

    #[test]
    fn test_end_reached_once_per_last_key() {
        let mut tracker = EndReachedTracker::default();
        assert_eq!(tracker.check(0.0, 600.0, 700.0, 1_000.0, "z"), None);
        assert_eq!(tracker.check(0.0, 695.0, 700.0, 1_000.0, "z"), Some(5.0));
        assert_eq!(tracker.check(0.0, 699.0, 700.0, 1_000.0, "z"), None);
        assert_eq!(tracker.check(0.0, 699.0, 700.0, 1_000.0, "zz"), Some(1.0));
    }

    #[test]
    fn test_end_reached_threshold_ratio() {
        let mut tracker = EndReachedTracker::default();
        assert_eq!(tracker.check(0.25, 500.0, 700.0, 1_000.0, "z"), Some(200.0));
    }
}
