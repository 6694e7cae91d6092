//! Stand-in movement integrator over a flat ground plane.
//!
//! Runs after the processor stage and applies the velocity channels it left
//! behind: both channels plus any pending translation are integrated, then
//! grounding is resolved against [`SimulationSettings::ground_height`].

use bevy::prelude::*;

use crate::kinematics::KinematicState;
use crate::settings::SimulationSettings;
use crate::GROUND_FRICTION;

/// Damps the horizontal part of a grounded actor's dynamic velocity.
#[must_use]
pub const fn apply_ground_friction(velocity: Vec3) -> Vec3 {
    let scale = 1.0 - GROUND_FRICTION;
    Vec3::new(velocity.x * scale, velocity.y, velocity.z * scale)
}

/// Integrates one tick of motion for a single actor.
pub fn integrate(
    kcc: &mut KinematicState,
    transform: &mut Transform,
    delta_time: f32,
    ground_height: f32,
) {
    kcc.was_grounded = kcc.is_grounded;
    if kcc.is_grounded {
        kcc.dynamic_velocity = apply_ground_friction(kcc.dynamic_velocity);
    }

    let step =
        (kcc.kinematic_velocity + kcc.dynamic_velocity) * delta_time + kcc.pending_translation;
    kcc.pending_translation = Vec3::ZERO;
    transform.translation += step;

    if transform.translation.y <= ground_height && kcc.dynamic_velocity.y <= 0.0 {
        transform.translation.y = ground_height;
        kcc.dynamic_velocity.y = 0.0;
        kcc.is_grounded = true;
    } else {
        kcc.is_grounded = false;
    }
}

/// Applies [`integrate`] to every actor.
pub fn movement_system(
    settings: Option<Res<SimulationSettings>>,
    mut actors: Query<(&mut KinematicState, &mut Transform)>,
) {
    let current = settings.map(|s| *s).unwrap_or_default();
    for (mut kcc, mut transform) in &mut actors {
        integrate(
            &mut kcc,
            &mut transform,
            current.tick_duration,
            current.ground_height,
        );
    }
}
