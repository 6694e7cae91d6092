//! Roaming NPCs that walk between random waypoints.
//!
//! Each NPC keeps a stall timer: after [`NPC_JUMP_AFTER`] seconds without
//! progress it jumps whenever grounded, and after [`NPC_RETARGET_AFTER`]
//! seconds it gives up on its waypoint and picks another one.

use bevy::prelude::*;

use crate::components::Npc;
use crate::gameplay::GameplayData;
use crate::kinematics::KinematicState;
use crate::random::DeterministicRng;
use crate::settings::SimulationSettings;
use crate::vector_math::{planar, yaw_towards};
use crate::{
    DEFAULT_TICK_DURATION, NPC_ARRIVAL_DISTANCE_SQ, NPC_JUMP_AFTER, NPC_JUMP_IMPULSE,
    NPC_PROGRESS_DISTANCE_SQ, NPC_RETARGET_AFTER, NPC_SPEED,
};

/// Advances one NPC by a tick.
///
/// `pick_waypoint` is only called when the NPC needs a new destination.
pub fn steer_npc(
    npc: &mut Npc,
    kcc: &mut KinematicState,
    position: Vec3,
    delta_time: f32,
    pick_waypoint: impl FnOnce() -> Option<Vec3>,
) {
    npc.check_time += delta_time;
    if npc.check_time > NPC_JUMP_AFTER && kcc.is_grounded {
        kcc.jump(Vec3::Y * NPC_JUMP_IMPULSE);
    }

    if npc.target_position.is_none() || npc.check_time > NPC_RETARGET_AFTER {
        npc.check_time = 0.0;
        npc.target_position = pick_waypoint();
    }

    if planar(npc.check_position - position).length_squared() > NPC_PROGRESS_DISTANCE_SQ {
        npc.check_position = position;
        npc.check_time = 0.0;
    }

    let Some(target) = npc.target_position else {
        return;
    };
    let to_target = planar(target - position);
    if to_target.length_squared() < NPC_ARRIVAL_DISTANCE_SQ {
        npc.target_position = None;
        return;
    }
    if let Some(yaw) = yaw_towards(to_target) {
        kcc.look_yaw = yaw;
        kcc.look_pitch = 0.0;
    }
    kcc.input_direction = to_target;
    kcc.kinematic_speed = NPC_SPEED;
}

/// Steers every NPC in ascending entity order so waypoint draws are
/// reproducible.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn npc_system(
    settings: Option<Res<SimulationSettings>>,
    data: Option<Res<GameplayData>>,
    mut rng: ResMut<DeterministicRng>,
    mut npcs: Query<(Entity, &Transform, &mut Npc, &mut KinematicState)>,
) {
    let delta_time = settings
        .as_deref()
        .map_or(DEFAULT_TICK_DURATION, |s| s.tick_duration);
    let mut order: Vec<Entity> = npcs.iter().map(|(entity, ..)| entity).collect();
    order.sort_unstable();

    for entity in order {
        let Ok((_, transform, mut npc, mut kcc)) = npcs.get_mut(entity) else {
            continue;
        };
        let position = transform.translation;
        steer_npc(&mut npc, &mut kcc, position, delta_time, || {
            data.as_deref()
                .and_then(|gameplay| gameplay.random_waypoint(&mut rng))
                .map(|waypoint| waypoint.position)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const TARGET: Vec3 = Vec3::new(0.0, 0.0, -10.0);

    #[rstest]
    fn picks_waypoint_and_walks_towards_it() {
        let mut npc = Npc::default();
        let mut kcc = KinematicState::default();
        steer_npc(&mut npc, &mut kcc, Vec3::ZERO, 0.1, || Some(TARGET));

        assert_eq!(npc.target_position, Some(TARGET));
        assert_relative_eq!(kcc.kinematic_speed, NPC_SPEED);
        assert_eq!(kcc.input_direction, Vec3::new(0.0, 0.0, -10.0));
        assert_relative_eq!(kcc.look_yaw, 0.0);
    }

    #[rstest]
    fn arrival_clears_target() {
        let mut npc = Npc {
            target_position: Some(Vec3::new(0.5, 3.0, 0.0)),
            ..Npc::default()
        };
        let mut kcc = KinematicState::default();
        steer_npc(&mut npc, &mut kcc, Vec3::ZERO, 0.1, || None);
        assert_eq!(npc.target_position, None);
    }

    #[rstest]
    fn stalled_npc_jumps_then_retargets() {
        let mut npc = Npc {
            target_position: Some(TARGET),
            check_time: 1.0,
            ..Npc::default()
        };
        let mut kcc = KinematicState {
            is_grounded: true,
            ..KinematicState::default()
        };
        steer_npc(&mut npc, &mut kcc, Vec3::ZERO, 0.5, || None);
        assert_relative_eq!(kcc.dynamic_velocity.y, NPC_JUMP_IMPULSE);
        assert_eq!(npc.target_position, Some(TARGET));

        npc.check_time = NPC_RETARGET_AFTER;
        let replacement = Vec3::new(20.0, 0.0, 0.0);
        steer_npc(&mut npc, &mut kcc, Vec3::ZERO, 0.5, || Some(replacement));
        assert_eq!(npc.target_position, Some(replacement));
        assert_relative_eq!(npc.check_time, 0.0);
    }

    #[rstest]
    fn progress_resets_stall_timer() {
        let mut npc = Npc {
            target_position: Some(TARGET),
            check_time: 0.8,
            ..Npc::default()
        };
        let mut kcc = KinematicState::default();
        let moved = Vec3::new(0.0, 0.0, -2.0);
        steer_npc(&mut npc, &mut kcc, moved, 0.1, || None);
        assert_relative_eq!(npc.check_time, 0.0);
        assert_eq!(npc.check_position, moved);
    }
}
