//! Basic vector math helper functions.
//! Small helpers for direction/length splits, planar projections and look angles.
use glam::{EulerRot, Quat, Vec3};

use crate::DISTANCE_EPSILON;

/// Splits `vector` into a unit direction and its length.
///
/// Non-finite or near-zero vectors yield `(Vec3::ZERO, 0.0)`, so callers can
/// treat "already there" and "garbage input" the same way.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use kcc_sim::vector_math::normalize_with_length;
/// let (dir, len) = normalize_with_length(Vec3::new(3.0, 0.0, 4.0));
/// assert!((len - 5.0).abs() < 1e-6);
/// assert!((dir.x - 0.6).abs() < 1e-6);
/// ```
#[must_use]
pub fn normalize_with_length(vector: Vec3) -> (Vec3, f32) {
    if !vector.is_finite() {
        return (Vec3::ZERO, 0.0);
    }
    let length = vector.length();
    if length <= DISTANCE_EPSILON {
        return (Vec3::ZERO, 0.0);
    }
    (vector / length, length)
}

/// Drops the vertical component of `vector`.
#[must_use]
pub const fn planar(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Extracts `(pitch, yaw)` in radians from a rotation.
///
/// Yaw is taken about +Y and pitch about the yawed X axis, matching the
/// look angles stored on [`crate::KinematicState`].
#[must_use]
pub fn look_angles(rotation: Quat) -> (f32, f32) {
    let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    (pitch, yaw)
}

/// Yaw that faces along the planar component of `direction`.
///
/// Returns `None` when the planar component is too small to define a facing.
#[must_use]
pub fn yaw_towards(direction: Vec3) -> Option<f32> {
    let flat = planar(direction);
    if flat.length_squared() <= DISTANCE_EPSILON * DISTANCE_EPSILON {
        return None;
    }
    // Forward is -Z, so yaw zero looks down -Z.
    Some((-flat.x).atan2(-flat.z))
}
