//! Collection editor: copy-on-write operations over a repeatable section.
//!
//! Every function takes the current entries by shared reference and returns
//! the next value; the input slice is never modified. A section is never left
//! empty: removing the last entry resets it to the blank template instead.

use crate::cv::models::Entry;

/// Appends one blank entry.
pub fn append<T: Entry>(entries: &[T]) -> Vec<T> {
    let mut next = Vec::with_capacity(entries.len() + 1);
    next.extend_from_slice(entries);
    next.push(T::blank());
    next
}

/// Removes the entry at `index`, or resets it to blank if it is the only one.
///
/// # Panics
/// If `index >= entries.len()`. Callers own the bounds check.
pub fn remove_at<T: Entry>(entries: &[T], index: usize) -> Vec<T> {
    assert!(
        index < entries.len(),
        "remove_at index {index} out of bounds for {} {} entries",
        entries.len(),
        T::SECTION.as_str()
    );

    if entries.len() == 1 {
        return vec![T::blank()];
    }

    let mut next = entries.to_vec();
    next.remove(index);
    next
}

/// Replaces a single field of the entry at `index`; everything else is carried over unchanged.
///
/// # Panics
/// If `index >= entries.len()`.
pub fn update_field<T: Entry>(entries: &[T], index: usize, field: T::Field, value: &str) -> Vec<T> {
    assert!(
        index < entries.len(),
        "update_field index {index} out of bounds for {} {} entries",
        entries.len(),
        T::SECTION.as_str()
    );

    let mut next = entries.to_vec();
    next[index].set(field, value);
    next
}
