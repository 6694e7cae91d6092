//! Applies per-tick player input records to kinematic state.

use bevy::prelude::*;

use crate::components::PlayerInput;
use crate::kinematics::KinematicState;
use crate::{JUMP_IMPULSE, MAX_LOOK_PITCH, WALK_SPEED};

/// World-space movement direction for a planar input under `yaw`.
///
/// Input `y` moves forward (-Z at zero yaw) and `x` strafes right. The
/// result is never longer than one.
#[must_use]
pub fn world_direction(move_direction: Vec2, yaw: f32) -> Vec3 {
    let local = Vec3::new(move_direction.x, 0.0, -move_direction.y).clamp_length_max(1.0);
    Quat::from_rotation_y(yaw) * local
}

/// Updates look angles, movement direction and jumps for one actor.
pub fn apply_input(input: &PlayerInput, kcc: &mut KinematicState) {
    kcc.look_pitch = (kcc.look_pitch + input.look_delta.x).clamp(-MAX_LOOK_PITCH, MAX_LOOK_PITCH);
    kcc.look_yaw += input.look_delta.y;
    kcc.input_direction = world_direction(input.move_direction, kcc.look_yaw);
    // Sprint processors override this during the processor stage.
    kcc.kinematic_speed = WALK_SPEED;
    if input.jump && kcc.is_grounded {
        kcc.jump(Vec3::Y * JUMP_IMPULSE);
    }
}

/// Applies every player's input record.
pub fn player_input_system(mut actors: Query<(&PlayerInput, &mut KinematicState)>) {
    for (input, mut kcc) in &mut actors {
        apply_input(input, &mut kcc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    #[rstest]
    #[case(Vec2::new(0.0, 1.0), 0.0, Vec3::NEG_Z)]
    #[case(Vec2::new(1.0, 0.0), 0.0, Vec3::X)]
    #[case(Vec2::new(0.0, 1.0), FRAC_PI_2, Vec3::NEG_X)]
    fn direction_follows_yaw(#[case] input: Vec2, #[case] yaw: f32, #[case] expected: Vec3) {
        let direction = world_direction(input, yaw);
        assert_relative_eq!(direction.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(direction.y, expected.y, epsilon = 1e-6);
        assert_relative_eq!(direction.z, expected.z, epsilon = 1e-6);
    }

    #[rstest]
    fn diagonal_input_is_clamped() {
        assert_relative_eq!(world_direction(Vec2::ONE, 0.0).length(), 1.0, epsilon = 1e-6);
    }

    #[rstest]
    fn jump_requires_ground() {
        let input = PlayerInput {
            jump: true,
            ..PlayerInput::default()
        };
        let mut airborne = KinematicState::default();
        apply_input(&input, &mut airborne);
        assert_eq!(airborne.dynamic_velocity, Vec3::ZERO);

        let mut grounded = KinematicState {
            is_grounded: true,
            ..KinematicState::default()
        };
        apply_input(&input, &mut grounded);
        assert_relative_eq!(grounded.dynamic_velocity.y, JUMP_IMPULSE);
        assert!(!grounded.is_grounded);
    }

    #[rstest]
    fn pitch_is_clamped() {
        let input = PlayerInput {
            look_delta: Vec2::new(10.0, 0.5),
            ..PlayerInput::default()
        };
        let mut kcc = KinematicState::default();
        apply_input(&input, &mut kcc);
        assert_relative_eq!(kcc.look_pitch, MAX_LOOK_PITCH);
        assert_relative_eq!(kcc.look_yaw, 0.5);
    }
}
