//! Pure transforms applied to intercepted results

use crate::list::List;
use std::collections::HashSet;
use std::hash::Hash;

/// Reverse the sequence.
///
/// The vector is owned, so reversing in place cannot alias anything the
/// producing function still holds.
pub fn reverse<T>(mut items: Vec<T>) -> Vec<T> {
    items.reverse();
    items
}

/// Drop repeated elements, keeping each value at its first position.
///
/// Only `PartialEq` is required, so floats and other unhashable elements
/// work. Each element is compared against the ones already kept; use
/// `deduplicate_by_key` when a hashable key is available for long inputs.
/// A value unequal to itself (`f64::NAN`) is never a duplicate.
pub fn deduplicate<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    kept
}

/// Like `deduplicate`, for elements compared through a hashed key.
///
/// Two elements are duplicates when their keys are equal.
pub fn deduplicate_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    let keep: Vec<bool> = items.iter().map(|item| seen.insert(key(item))).collect();
    retain_marked(items, keep)
}

/// Return the list if present, otherwise a new empty list.
///
/// Each substitution allocates its own list, so no two callers ever share one.
pub fn not_null_default<T>(value: Option<List<T>>, modifiable: bool) -> List<T> {
    value.unwrap_or_else(|| List::empty(modifiable))
}

fn retain_marked<T>(items: Vec<T>, keep: Vec<bool>) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}
