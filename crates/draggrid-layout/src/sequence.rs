//! Helpers for rearranging an ordered item sequence.
//!
//! All helpers return a new vector and leave the input untouched, so a drag
//! session can derive its working sequence without disturbing the committed
//! one.

/// Returns a copy of `items` with `item` inserted at `index`.
///
/// An `index` past the end appends.
pub fn insert_at<T: Clone>(items: &[T], index: usize, item: T) -> Vec<T> {
    let mut result = items.to_vec();
    let index = index.min(result.len());
    result.insert(index, item);
    result
}

/// Returns a copy of `items` without the element at `index`.
///
/// An out-of-range `index` returns an unchanged copy.
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    let mut result = items.to_vec();
    if index < result.len() {
        result.remove(index);
    }
    result
}

/// Returns a copy of `items` with the element at `from` moved to `to`.
///
/// Moving forward shifts the intervening elements back by one slot, moving
/// backward shifts them forward by one slot. A `to` past the end moves the
/// element to the last slot; an out-of-range `from` returns an unchanged copy.
pub fn move_index<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut result = items.to_vec();
    if from >= result.len() {
        return result;
    }
    let to = to.min(result.len() - 1);
    if from != to {
        let item = result.remove(from);
        result.insert(to, item);
    }
    result
}
