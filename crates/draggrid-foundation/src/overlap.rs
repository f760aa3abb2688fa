//! Finds the card the dragged card is hovering over.

use draggrid_layout::Vertices;
use rustc_hash::FxHashSet;

use crate::geometry_cache::GeometryCache;

/// Returns the key of the cached card that mutually contains centres with
/// `dragged`.
///
/// Keys in `exclude` and entries without a measured quad never match. When
/// several cards match, the one whose centre is nearest to the dragged
/// centre wins; remaining ties go to the earliest cache entry.
pub fn find_overlap<'a>(
    cache: &'a GeometryCache,
    dragged: &Vertices,
    exclude: &FxHashSet<String>,
) -> Option<&'a str> {
    let mut best: Option<(&'a str, f32)> = None;
    for entry in cache.iter() {
        if exclude.contains(&entry.key) {
            continue;
        }
        let Some(vertices) = entry.vertices.as_ref() else {
            continue;
        };
        if !vertices.mutually_contains_centers(dragged) {
            continue;
        }
        let distance = vertices.center.distance_to(dragged.center);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((entry.key.as_str(), distance)),
        }
    }
    if let Some((key, distance)) = best {
        log::trace!("dragged card overlaps {key:?} ({distance:.1}px apart)");
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(quads: &[(&str, Option<Vertices>)]) -> GeometryCache {
        let mut cache = GeometryCache::new();
        for (key, vertices) in quads {
            cache.ensure(key, None).vertices = *vertices;
        }
        cache
    }

    fn no_exclusions() -> FxHashSet<String> {
        FxHashSet::default()
    }

    #[test]
    fn test_requires_mutual_containment() {
        let cache = cache_with(&[("big", Some(Vertices::from_rect(0.0, 0.0, 400.0, 400.0)))]);
        // The big card contains the dragged centre, but the small dragged card
        // does not contain the big card's centre.
        let dragged = Vertices::from_rect(10.0, 10.0, 50.0, 50.0);
        assert_eq!(find_overlap(&cache, &dragged, &no_exclusions()), None);

        let dragged = Vertices::from_rect(150.0, 150.0, 100.0, 100.0);
        assert_eq!(find_overlap(&cache, &dragged, &no_exclusions()), Some("big"));
    }

    #[test]
    fn test_excluded_and_unmeasured_entries_never_match() {
        let quad = Some(Vertices::from_rect(0.0, 0.0, 100.0, 100.0));
        let cache = cache_with(&[("self", quad), ("pinned", quad), ("unmeasured", None)]);
        let exclude: FxHashSet<String> = ["self", "pinned"].iter().map(|k| k.to_string()).collect();
        let dragged = Vertices::from_rect(5.0, 5.0, 100.0, 100.0);
        assert_eq!(find_overlap(&cache, &dragged, &exclude), None);
    }

    #[test]
    fn test_nearest_centre_wins() {
        let cache = cache_with(&[
            ("far", Some(Vertices::from_rect(0.0, 0.0, 100.0, 100.0))),
            ("near", Some(Vertices::from_rect(20.0, 20.0, 100.0, 100.0))),
        ]);
        let dragged = Vertices::from_rect(30.0, 30.0, 100.0, 100.0);
        assert_eq!(find_overlap(&cache, &dragged, &no_exclusions()), Some("near"));
    }

    #[test]
    fn test_equal_distance_prefers_cache_order() {
        let cache = cache_with(&[
            ("left", Some(Vertices::from_rect(-10.0, 0.0, 100.0, 100.0))),
            ("right", Some(Vertices::from_rect(10.0, 0.0, 100.0, 100.0))),
        ]);
        let dragged = Vertices::from_rect(0.0, 0.0, 100.0, 100.0);
        assert_eq!(find_overlap(&cache, &dragged, &no_exclusions()), Some("left"));
    }
}
