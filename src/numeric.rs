//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point and integer
//! domains and give processor priorities a total order.

use ordered_float::OrderedFloat;

/// Total-order key for a processor priority.
///
/// `NaN` sorts below every real priority so a misconfigured processor runs
/// last instead of jumping the queue.
#[must_use]
pub fn priority_key(priority: f32) -> OrderedFloat<f32> {
    if priority.is_nan() {
        OrderedFloat(f32::NEG_INFINITY)
    } else {
        OrderedFloat(priority)
    }
}

/// Convert a collection length into `u32`, saturating at `u32::MAX`.
#[must_use]
pub fn saturating_len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Convert a value drawn from `[0, len)` back into an index.
#[must_use]
pub fn index_from_u32(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
