//! Masonry column layout.
//!
//! [`layout`] packs an ordered sequence of variable-height items into a fixed
//! number of columns using greedy shortest-column-first placement.
//! [`unlayout`] is its inverse: it walks the columns back from their tails
//! and reconstructs the flat sequence.
//!
//! # Example
//!
//! ```rust
//! use draggrid_layout::{layout, GridItem};
//!
//! let items = vec![
//!     GridItem::new("a", 100.0),
//!     GridItem::new("b", 50.0),
//!     GridItem::HeightEqualizer,
//!     GridItem::new("c", 80.0),
//! ];
//! let snapshot = layout(&items, 2, 160.0);
//! assert_eq!(snapshot.column_heights, vec![180.0, 100.0]);
//! ```

use crate::geometry::{Point, VertexOffsets};

/// A column whose running height is within this many pixels of the shortest
/// column counts as "shortest"; the leftmost such column wins.
pub const COLUMN_TIE_TOLERANCE: f32 = 10.0;

/// One element of the caller's flat, ordered sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum GridItem<T> {
    /// A card with a declared height.
    Item {
        item: T,
        height: f32,
        is_draggable: bool,
        vertex_offsets: Option<VertexOffsets>,
    },
    /// Realigns every column to the tallest column at this point of the
    /// sequence (section breaks, full-width rows).
    HeightEqualizer,
}

impl<T> GridItem<T> {
    /// A draggable item.
    pub fn new(item: T, height: f32) -> Self {
        GridItem::Item {
            item,
            height,
            is_draggable: true,
            vertex_offsets: None,
        }
    }

    /// An item that can never be picked up nor displaced by overlap.
    pub fn pinned(item: T, height: f32) -> Self {
        GridItem::Item {
            item,
            height,
            is_draggable: false,
            vertex_offsets: None,
        }
    }

    pub fn with_vertex_offsets(self, offsets: VertexOffsets) -> Self {
        match self {
            GridItem::Item {
                item,
                height,
                is_draggable,
                ..
            } => GridItem::Item {
                item,
                height,
                is_draggable,
                vertex_offsets: Some(offsets),
            },
            GridItem::HeightEqualizer => GridItem::HeightEqualizer,
        }
    }

    pub fn item(&self) -> Option<&T> {
        match self {
            GridItem::Item { item, .. } => Some(item),
            GridItem::HeightEqualizer => None,
        }
    }

    pub fn is_height_equalizer(&self) -> bool {
        matches!(self, GridItem::HeightEqualizer)
    }
}

/// What a [`LayoutEntry`] represents.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryKind<T> {
    Item {
        item: T,
        vertex_offsets: Option<VertexOffsets>,
    },
    /// Spacer synthesized by a [`GridItem::HeightEqualizer`].
    EmptySpace,
}

/// Placement of one item (or spacer) inside the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEntry<T> {
    pub column_index: usize,
    /// Position within the column.
    pub index: usize,
    pub height: f32,
    /// Running height of the column before this entry.
    pub offset_y: f32,
    pub position: Point,
    /// Index in the caller's flat sequence. This is the only identity used
    /// when reordering the source data.
    pub original_index: usize,
    pub is_draggable: bool,
    pub kind: EntryKind<T>,
}

impl<T> LayoutEntry<T> {
    pub fn item(&self) -> Option<&T> {
        match &self.kind {
            EntryKind::Item { item, .. } => Some(item),
            EntryKind::EmptySpace => None,
        }
    }

    pub fn vertex_offsets(&self) -> Option<&VertexOffsets> {
        match &self.kind {
            EntryKind::Item { vertex_offsets, .. } => vertex_offsets.as_ref(),
            EntryKind::EmptySpace => None,
        }
    }

    pub fn is_empty_space(&self) -> bool {
        matches!(self.kind, EntryKind::EmptySpace)
    }

    /// Bottom edge in grid content coordinates.
    pub fn bottom(&self) -> f32 {
        self.offset_y + self.height
    }
}

/// Complete layout of a sequence. Always recomputed wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSnapshot<T> {
    pub columns: Vec<Vec<LayoutEntry<T>>>,
    /// Index-aligned with the input sequence. A height equalizer position
    /// holds the spacer synthesized for the last column.
    pub entries_in_sequence: Vec<LayoutEntry<T>>,
    pub column_heights: Vec<f32>,
}

impl<T> GridSnapshot<T> {
    pub fn empty(column_count: usize) -> Self {
        Self {
            columns: (0..column_count).map(|_| Vec::new()).collect(),
            entries_in_sequence: Vec::new(),
            column_heights: vec![0.0; column_count],
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Height of the tallest column.
    pub fn content_height(&self) -> f32 {
        self.column_heights.iter().copied().fold(0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.entries_in_sequence.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries_in_sequence.len()
    }

    pub fn entry(&self, original_index: usize) -> Option<&LayoutEntry<T>> {
        self.entries_in_sequence.get(original_index)
    }

    /// Iterates every placed entry column by column, spacers included.
    pub fn iter_placed(&self) -> impl Iterator<Item = &LayoutEntry<T>> {
        self.columns.iter().flatten()
    }
}

/// Lays `items` out into `column_count` columns of `column_width`.
///
/// Each item goes to the leftmost column whose running height is within
/// [`COLUMN_TIE_TOLERANCE`] of the shortest one. Heights are rounded to whole
/// pixels before they are accumulated.
pub fn layout<T: Clone>(
    items: &[GridItem<T>],
    column_count: usize,
    column_width: f32,
) -> GridSnapshot<T> {
    let column_count = if column_count == 0 {
        log::warn!("masonry layout requested with zero columns, using a single column");
        1
    } else {
        column_count
    };

    let mut snapshot = GridSnapshot::empty(column_count);
    snapshot.entries_in_sequence.reserve(items.len());

    for (original_index, item) in items.iter().enumerate() {
        match item {
            GridItem::HeightEqualizer => {
                let max_height = snapshot.content_height();
                let mut last_spacer = None;
                for column_index in 0..column_count {
                    let offset_y = snapshot.column_heights[column_index];
                    let entry = LayoutEntry {
                        column_index,
                        index: snapshot.columns[column_index].len(),
                        height: max_height - offset_y,
                        offset_y,
                        position: Point::new(column_index as f32 * column_width, offset_y),
                        original_index,
                        is_draggable: false,
                        kind: EntryKind::EmptySpace,
                    };
                    snapshot.columns[column_index].push(entry.clone());
                    snapshot.column_heights[column_index] = max_height;
                    last_spacer = Some(entry);
                }
                if let Some(entry) = last_spacer {
                    snapshot.entries_in_sequence.push(entry);
                }
            }
            GridItem::Item {
                item,
                height,
                is_draggable,
                vertex_offsets,
            } => {
                let column_index = shortest_column(&snapshot.column_heights);
                let offset_y = snapshot.column_heights[column_index];
                let entry = LayoutEntry {
                    column_index,
                    index: snapshot.columns[column_index].len(),
                    height: height.round(),
                    offset_y,
                    position: Point::new(column_index as f32 * column_width, offset_y),
                    original_index,
                    is_draggable: *is_draggable,
                    kind: EntryKind::Item {
                        item: item.clone(),
                        vertex_offsets: *vertex_offsets,
                    },
                };
                snapshot.column_heights[column_index] += entry.height;
                snapshot.columns[column_index].push(entry.clone());
                snapshot.entries_in_sequence.push(entry);
            }
        }
    }

    snapshot
}

fn shortest_column(heights: &[f32]) -> usize {
    let min_height = heights.iter().copied().fold(f32::INFINITY, f32::min);
    heights
        .iter()
        .position(|height| *height < min_height + COLUMN_TIE_TOLERANCE)
        .unwrap_or(0)
}

/// Reconstructs the flat sequence from laid out columns.
///
/// Entries are pulled from column tails, walking each column's running
/// height back to zero. The next tail taken is the one placed last (highest
/// `original_index`), then the tallest column, then the leftmost; this keeps
/// the inverse exact even when the tie tolerance sent an item to a column
/// that was not the shortest. A run of spacers collapses into one
/// [`GridItem::HeightEqualizer`].
pub fn unlayout<T: Clone>(columns: &[Vec<LayoutEntry<T>>], column_heights: &[f32]) -> Vec<GridItem<T>> {
    let mut heights: Vec<f32> = if column_heights.len() == columns.len() {
        column_heights.to_vec()
    } else {
        log::warn!(
            "unlayout received {} column heights for {} columns, recomputing",
            column_heights.len(),
            columns.len()
        );
        columns
            .iter()
            .map(|column| column.iter().map(|entry| entry.height).sum())
            .collect()
    };
    let mut remaining: Vec<usize> = columns.iter().map(Vec::len).collect();
    let total: usize = remaining.iter().sum();

    let mut reversed = Vec::with_capacity(total);
    let mut previous_was_space = false;

    for _ in 0..total {
        let Some(column_index) = next_tail(columns, &remaining, &heights) else {
            break;
        };
        remaining[column_index] -= 1;
        let entry = &columns[column_index][remaining[column_index]];
        heights[column_index] -= entry.height;

        match &entry.kind {
            EntryKind::EmptySpace => {
                if !previous_was_space {
                    reversed.push(GridItem::HeightEqualizer);
                }
                previous_was_space = true;
            }
            EntryKind::Item {
                item,
                vertex_offsets,
            } => {
                reversed.push(GridItem::Item {
                    item: item.clone(),
                    height: entry.height,
                    is_draggable: entry.is_draggable,
                    vertex_offsets: *vertex_offsets,
                });
                previous_was_space = false;
            }
        }
    }

    reversed.reverse();
    reversed
}

fn next_tail<T>(columns: &[Vec<LayoutEntry<T>>], remaining: &[usize], heights: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, usize, f32)> = None;
    for (column_index, column) in columns.iter().enumerate() {
        if remaining[column_index] == 0 {
            continue;
        }
        let tail = &column[remaining[column_index] - 1];
        let height = heights[column_index];
        let better = match best {
            None => true,
            Some((_, best_index, best_height)) => {
                tail.original_index > best_index
                    || (tail.original_index == best_index && height > best_height)
            }
        };
        if better {
            best = Some((column_index, tail.original_index, height));
        }
    }
    best.map(|(column_index, _, _)| column_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(heights: &[f32]) -> Vec<GridItem<usize>> {
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| GridItem::new(i, *h))
            .collect()
    }

    fn column_members(snapshot: &GridSnapshot<usize>, column: usize) -> Vec<usize> {
        snapshot.columns[column]
            .iter()
            .map(|entry| entry.original_index)
            .collect()
    }

    /// Removes equalizers that directly follow another equalizer.
    fn collapse_equalizer_runs(items: &[GridItem<usize>]) -> Vec<GridItem<usize>> {
        let mut result: Vec<GridItem<usize>> = Vec::new();
        for item in items {
            if item.is_height_equalizer()
                && result.last().map_or(false, GridItem::is_height_equalizer)
            {
                continue;
            }
            result.push(item.clone());
        }
        result
    }

    #[test]
    fn test_empty_input() {
        let snapshot = layout::<usize>(&[], 3, 100.0);
        assert_eq!(snapshot.columns.len(), 3);
        assert!(snapshot.columns.iter().all(Vec::is_empty));
        assert_eq!(snapshot.column_heights, vec![0.0, 0.0, 0.0]);
        assert!(snapshot.is_empty());
        assert!(unlayout(&snapshot.columns, &snapshot.column_heights).is_empty());
    }

    #[test]
    fn test_greedy_assignment_is_deterministic() {
        let input = items(&[100.0, 50.0, 80.0, 30.0, 60.0, 40.0]);
        let snapshot = layout(&input, 2, 100.0);

        assert_eq!(column_members(&snapshot, 0), vec![0, 3, 4]);
        assert_eq!(column_members(&snapshot, 1), vec![1, 2, 5]);
        assert_eq!(snapshot.column_heights, vec![190.0, 170.0]);

        let item3 = &snapshot.entries_in_sequence[3];
        assert_eq!(item3.column_index, 0);
        assert_eq!(item3.index, 1);
        assert_eq!(item3.offset_y, 100.0);
        assert_eq!(item3.position, Point::new(0.0, 100.0));

        let item5 = &snapshot.entries_in_sequence[5];
        assert_eq!(item5.position, Point::new(100.0, 130.0));

        assert_eq!(layout(&input, 2, 100.0), snapshot);
    }

    #[test]
    fn test_tie_tolerance_prefers_leftmost_column() {
        // After two items the heights are [100, 95]; 100 is within 10px of 95.
        let snapshot = layout(&items(&[100.0, 95.0, 50.0]), 2, 100.0);
        assert_eq!(snapshot.entries_in_sequence[2].column_index, 0);

        // [100, 89] is outside the tolerance.
        let snapshot = layout(&items(&[100.0, 89.0, 50.0]), 2, 100.0);
        assert_eq!(snapshot.entries_in_sequence[2].column_index, 1);
    }

    #[test]
    fn test_heights_are_rounded() {
        let snapshot = layout(&items(&[10.4, 20.6]), 1, 50.0);
        assert_eq!(snapshot.entries_in_sequence[0].height, 10.0);
        assert_eq!(snapshot.entries_in_sequence[1].offset_y, 10.0);
        assert_eq!(snapshot.column_heights, vec![31.0]);
    }

    #[test]
    fn test_height_equalizer_aligns_columns() {
        let mut input = items(&[100.0, 40.0, 30.0]);
        input.push(GridItem::HeightEqualizer);
        input.push(GridItem::new(4, 20.0));
        let snapshot = layout(&input, 3, 50.0);

        // Columns are [100, 40, 30] before the marker.
        let spacers: Vec<f32> = snapshot
            .iter_placed()
            .filter(|entry| entry.is_empty_space())
            .map(|entry| entry.height)
            .collect();
        assert_eq!(spacers, vec![0.0, 60.0, 70.0]);

        let marker = &snapshot.entries_in_sequence[3];
        assert!(marker.is_empty_space());
        assert_eq!(marker.column_index, 2);
        assert_eq!(marker.original_index, 3);

        let after = &snapshot.entries_in_sequence[4];
        assert_eq!(after.column_index, 0);
        assert_eq!(after.offset_y, 100.0);
        assert_eq!(snapshot.column_heights, vec![120.0, 100.0, 100.0]);
    }

    #[test]
    fn test_column_offsets_are_running_sums() {
        let input = items(&[33.0, 12.0, 90.0, 41.0, 7.0, 64.0, 18.0, 55.0]);
        let snapshot = layout(&input, 3, 10.0);
        for column in &snapshot.columns {
            let mut running = 0.0;
            for entry in column {
                assert_eq!(entry.offset_y, running);
                running += entry.height;
            }
        }
    }

    #[test]
    fn test_zero_columns_falls_back_to_one() {
        let snapshot = layout(&items(&[10.0, 20.0]), 0, 10.0);
        assert_eq!(snapshot.column_count(), 1);
        assert_eq!(snapshot.column_heights, vec![30.0]);
    }

    #[test]
    fn test_unlayout_restores_sequence() {
        let heights = [11.0, 10.0, 19.0, 25.0, 60.0, 13.0, 42.0, 18.0, 77.0, 30.0, 16.0];
        for column_count in 1..=5 {
            let mut input = items(&heights);
            input.insert(4, GridItem::HeightEqualizer);
            input.insert(0, GridItem::HeightEqualizer);
            input.push(GridItem::HeightEqualizer);
            let snapshot = layout(&input, column_count, 100.0);
            let restored = unlayout(&snapshot.columns, &snapshot.column_heights);
            assert_eq!(restored, input, "columns: {column_count}");
        }
    }

    #[test]
    fn test_unlayout_collapses_equalizer_runs() {
        let mut input = items(&[50.0, 20.0, 35.0]);
        input.insert(2, GridItem::HeightEqualizer);
        input.insert(2, GridItem::HeightEqualizer);
        let snapshot = layout(&input, 2, 100.0);
        let restored = unlayout(&snapshot.columns, &snapshot.column_heights);
        assert_eq!(restored, collapse_equalizer_runs(&input));
        assert_eq!(restored.len(), input.len() - 1);
    }

    #[test]
    fn test_unlayout_keeps_item_metadata() {
        let offsets = VertexOffsets {
            center: Some(Point::new(1.0, 2.0)),
            ..Default::default()
        };
        let input = vec![
            GridItem::pinned(0usize, 40.0),
            GridItem::new(1usize, 60.0).with_vertex_offsets(offsets),
        ];
        let snapshot = layout(&input, 2, 100.0);
        assert_eq!(unlayout(&snapshot.columns, &snapshot.column_heights), input);
    }

    #[test]
    fn test_balance_bound() {
        // Deterministic pseudo-random heights between 10 and 210.
        let mut seed: u32 = 0x9e37_79b9;
        let heights: Vec<f32> = (0..64)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                (10 + seed % 200) as f32
            })
            .collect();
        let largest = heights.iter().copied().fold(0.0, f32::max);

        for column_count in 1..=4 {
            let snapshot = layout(&items(&heights), column_count, 100.0);
            let max = snapshot.content_height();
            let min = snapshot
                .column_heights
                .iter()
                .copied()
                .fold(f32::INFINITY, f32::min);
            assert!(
                max - min <= largest + COLUMN_TIE_TOLERANCE,
                "columns {column_count}: {:?}",
                snapshot.column_heights
            );
        }
    }
}
