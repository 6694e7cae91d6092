//! Per-actor kinematic state mutated by processors and the movement
//! integrator.
//!
//! Velocities are split into two channels: the kinematic channel is driven
//! directly by input (`input_direction * kinematic_speed`), the dynamic
//! channel is physically integrated (gravity, impulses, launch velocities).
//! The `external_*` fields are one-tick accumulators that the dispatch phase
//! guarantees to be zero once `before_move` has finished.

use bevy::prelude::*;

use crate::vector_math::look_angles;
use crate::DEFAULT_GRAVITY;

/// Kinematic character controller state of a single actor.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct KinematicState {
    /// Input-driven velocity, derived by the environment processor and left
    /// untouched while it is suppressed.
    pub kinematic_velocity: Vec3,
    /// Physically integrated velocity.
    pub dynamic_velocity: Vec3,
    /// Target speed for the kinematic channel.
    pub kinematic_speed: f32,
    /// Desired world-space movement direction.
    pub input_direction: Vec3,
    /// One-tick translation to apply on top of velocities.
    pub external_delta: Vec3,
    /// One-tick force, integrated over the tick.
    pub external_force: Vec3,
    /// One-tick velocity change.
    pub external_impulse: Vec3,
    /// Gravity acceleration applied by gravity-aware processors.
    pub gravity: Vec3,
    /// Translation the integrator has not resolved yet. Teleports cancel it.
    pub pending_translation: Vec3,
    /// Grounded during the current tick.
    pub is_grounded: bool,
    /// Grounded during the previous tick.
    pub was_grounded: bool,
    /// Look yaw in radians.
    pub look_yaw: f32,
    /// Look pitch in radians.
    pub look_pitch: f32,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self {
            kinematic_velocity: Vec3::ZERO,
            dynamic_velocity: Vec3::ZERO,
            kinematic_speed: 0.0,
            input_direction: Vec3::ZERO,
            external_delta: Vec3::ZERO,
            external_force: Vec3::ZERO,
            external_impulse: Vec3::ZERO,
            gravity: Vec3::new(0.0, DEFAULT_GRAVITY, 0.0),
            pending_translation: Vec3::ZERO,
            is_grounded: false,
            was_grounded: false,
            look_yaw: 0.0,
            look_pitch: 0.0,
        }
    }
}

impl KinematicState {
    /// Creates a state with the given gravity.
    #[must_use]
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Replaces the kinematic velocity.
    pub const fn set_kinematic_velocity(&mut self, velocity: Vec3) {
        self.kinematic_velocity = velocity;
    }

    /// Replaces the dynamic velocity.
    pub const fn set_dynamic_velocity(&mut self, velocity: Vec3) {
        self.dynamic_velocity = velocity;
    }

    /// Adds an upward impulse and leaves the ground.
    pub fn jump(&mut self, impulse: Vec3) {
        self.dynamic_velocity += impulse;
        self.is_grounded = false;
    }

    /// Moves the actor to `position` without integration or collision, and
    /// drops any unresolved translation.
    pub fn teleport(&mut self, transform: &mut Transform, position: Vec3) {
        transform.translation = position;
        self.pending_translation = Vec3::ZERO;
    }

    /// Sets the look angles from a rotation.
    ///
    /// With `preserve_pitch` the current pitch is kept and only yaw follows
    /// the rotation.
    pub fn set_look_rotation(&mut self, rotation: Quat, preserve_pitch: bool) {
        let (pitch, yaw) = look_angles(rotation);
        self.look_yaw = yaw;
        if !preserve_pitch {
            self.look_pitch = pitch;
        }
    }

    /// Clears every one-tick accumulator.
    pub const fn clear_transients(&mut self) {
        self.external_delta = Vec3::ZERO;
        self.external_force = Vec3::ZERO;
        self.external_impulse = Vec3::ZERO;
    }

    /// Whether any one-tick accumulator still holds a value.
    #[must_use]
    pub fn has_transients(&self) -> bool {
        self.external_delta != Vec3::ZERO
            || self.external_force != Vec3::ZERO
            || self.external_impulse != Vec3::ZERO
    }
}
