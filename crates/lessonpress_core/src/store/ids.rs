//! Sequential record id allocation.

use crate::config::IdRange;
use crate::constants::RECORD_ID_PREFIX;
use std::collections::HashSet;

/// Numeric suffix of a `rec<digits>` id.
///
/// # Returns
/// `None` for ids with another shape or a suffix that overflows `u32`.
pub fn record_number(id: &str) -> Option<u32> {
    let digits = id.strip_prefix(RECORD_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn format_record_id(number: u32) -> String {
    format!("{}{:03}", RECORD_ID_PREFIX, number)
}

/// Compute the next free id.
///
/// Only ids inside `range` form the allocation basis: the result is one past
/// the largest in-range number (or `range.min` when none exist). A candidate
/// that collides with any existing id, in range or not, is skipped.
pub fn next_id<'a>(existing: impl IntoIterator<Item = &'a str>, range: IdRange) -> String {
    let existing: HashSet<&str> = existing.into_iter().collect();
    let highest = existing
        .iter()
        .filter_map(|id| record_number(id))
        .filter(|number| range.contains(*number))
        .max();
    let mut candidate = highest.map_or(range.min, |value| value.saturating_add(1));
    while existing.contains(format_record_id(candidate).as_str()) && candidate < u32::MAX {
        candidate += 1;
    }
    if !range.contains(candidate) {
        tracing::warn!(
            "Allocated id {} lies outside the canonical range {}..={}",
            format_record_id(candidate),
            range.min,
            range.max
        );
    }
    format_record_id(candidate)
}
