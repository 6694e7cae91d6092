//! Utility helpers for tests.
//!
//! Builders for headless simulation apps plus assertions on positions.

pub mod sim;

use bevy::prelude::Vec3;

/// Assert that two vectors agree component-wise within `epsilon`.
///
/// # Panics
/// Panics with both vectors in the message if any component differs by more
/// than `epsilon`.
pub fn assert_vec3_near(actual: Vec3, expected: Vec3, epsilon: f32) {
    assert!(
        actual.abs_diff_eq(expected, epsilon),
        "expected {expected}, got {actual} (epsilon {epsilon})"
    );
}
