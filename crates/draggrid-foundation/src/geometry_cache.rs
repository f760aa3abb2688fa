//! Per-item geometry cache.
//!
//! Holds, for every laid out card, the last measured on-screen quad, the
//! animated rearrangement offset and the mount flag. Entries are keyed by the
//! caller's stable item key and kept in layout sequence order, which is also
//! the order overlap detection scans them in.

use draggrid_animation::{AnimatedOffset, AnimatedValue, PlanId};
use draggrid_layout::{VertexOffsets, Vertices};
use indexmap::IndexMap;

use crate::host::GridHost;

#[derive(Debug)]
pub struct ItemGeometry {
    pub key: String,
    /// Offset from the committed layout position while cards are being
    /// rearranged. Back at the origin whenever the layout is committed.
    pub offset: AnimatedOffset,
    /// `None` until measured, or when the last measurement failed.
    pub vertices: Option<Vertices>,
    pub vertex_offsets: Option<VertexOffsets>,
    pub should_render: bool,
    pub rotation: AnimatedValue,
    pub(crate) wobble_plan: Option<PlanId>,
}

impl ItemGeometry {
    fn new(key: String, vertex_offsets: Option<VertexOffsets>) -> Self {
        Self {
            key,
            offset: AnimatedOffset::default(),
            vertices: None,
            vertex_offsets,
            should_render: false,
            rotation: AnimatedValue::new(0.0),
            wobble_plan: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: IndexMap<String, ItemGeometry>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, creating it on first use. Vertex offsets
    /// follow the latest layout.
    pub fn ensure(&mut self, key: &str, vertex_offsets: Option<VertexOffsets>) -> &mut ItemGeometry {
        let entry = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| ItemGeometry::new(key.to_owned(), None));
        entry.vertex_offsets = vertex_offsets;
        entry
    }

    pub fn get(&self, key: &str) -> Option<&ItemGeometry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ItemGeometry> {
        self.entries.get_mut(key)
    }

    /// Looks up an entry that must exist.
    ///
    /// # Panics
    ///
    /// Panics with `context` in the message when `key` is not cached.
    pub fn expect_entry(&self, key: &str, context: &str) -> &ItemGeometry {
        match self.entries.get(key) {
            Some(entry) => entry,
            None => panic!("[{context}] geometry cache entry for key {key:?} cannot be missing"),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemGeometry> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ItemGeometry> {
        self.entries.values_mut()
    }

    /// Measures every entry (except `skip`) through the host and stores
    /// the resulting unscaled quads.
    pub fn remeasure(&mut self, host: &mut dyn GridHost, skip: Option<&str>) {
        for entry in self.entries.values_mut() {
            if skip == Some(entry.key.as_str()) {
                continue;
            }
            entry.vertices = measure_vertices(host, &entry.key, 1.0, entry.vertex_offsets.as_ref());
        }
    }

    /// Reorders the cache to follow `order` and returns the entries whose
    /// key is not in it. Keys in `order` that were never cached are skipped.
    pub fn retain_in_order(&mut self, order: &[String]) -> Vec<ItemGeometry> {
        let mut kept = IndexMap::with_capacity(order.len());
        for key in order {
            if let Some(entry) = self.entries.swap_remove(key) {
                kept.insert(key.clone(), entry);
            }
        }
        let evicted: Vec<ItemGeometry> = self.entries.drain(..).map(|(_, entry)| entry).collect();
        self.entries = kept;
        if !evicted.is_empty() {
            log::debug!("evicted {} stale geometry cache entries", evicted.len());
        }
        evicted
    }
}

/// Measures `key` and converts the result into a quad at `scale`.
pub fn measure_vertices(
    host: &mut dyn GridHost,
    key: &str,
    scale: f32,
    offsets: Option<&VertexOffsets>,
) -> Option<Vertices> {
    match host.measure(key) {
        Some(measurement) => Some(Vertices::from_measurement(&measurement, scale, offsets)),
        None => {
            log::trace!("measurement of {key:?} unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draggrid_layout::{Point, ViewMeasurement};

    struct RowHost;

    impl GridHost for RowHost {
        fn measure(&mut self, key: &str) -> Option<ViewMeasurement> {
            let row: f32 = key.parse().ok()?;
            Some(ViewMeasurement::at_page(0.0, row * 100.0, 100.0, 100.0))
        }
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut cache = GeometryCache::new();
        cache.ensure("a", None).offset.set(Point::new(1.0, 2.0));
        cache.ensure("a", None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.expect_entry("a", "test").offset.get(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_remeasure_skips_and_tolerates_failures() {
        let mut cache = GeometryCache::new();
        cache.ensure("0", None);
        cache.ensure("1", None);
        cache.ensure("unmeasurable", None);
        cache.remeasure(&mut RowHost, Some("1"));

        let first = cache.get("0").and_then(|entry| entry.vertices);
        assert_eq!(first.map(|v| v.center), Some(Point::new(50.0, 50.0)));
        assert!(cache.get("1").and_then(|entry| entry.vertices).is_none());
        assert!(cache.get("unmeasurable").and_then(|entry| entry.vertices).is_none());
    }

    #[test]
    fn test_retain_in_order_follows_given_order() {
        let mut cache = GeometryCache::new();
        for key in ["a", "b", "c", "d"] {
            cache.ensure(key, None);
        }
        cache.ensure("b", None).offset.set(Point::new(0.0, 5.0));
        let order: Vec<String> = ["d", "b", "new"].iter().map(|k| k.to_string()).collect();
        let evicted = cache.retain_in_order(&order);

        let kept: Vec<_> = cache.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(kept, vec!["d", "b"]);
        assert_eq!(cache.expect_entry("b", "test").offset.get(), Point::new(0.0, 5.0));
        let mut evicted: Vec<_> = evicted.into_iter().map(|entry| entry.key).collect();
        evicted.sort();
        assert_eq!(evicted, vec!["a", "c"]);
    }

    #[test]
    #[should_panic(expected = "[render_item]")]
    fn test_expect_entry_panics_with_context() {
        GeometryCache::new().expect_entry("missing", "render_item");
    }
}
