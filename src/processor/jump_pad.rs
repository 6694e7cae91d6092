use bevy::prelude::*;
use log::debug;

use super::{OverlapHit, Processor, ProcessorContext, ProcessorInfo, StageInfo};
use crate::navigation::resolve_random_target;
use crate::JUMP_PAD_PRIORITY;

/// Launches the actor on a ballistic arc onto a random navigation target.
///
/// While the interaction lasts the pad owns the actor's movement: it applies
/// gravity itself and suppresses every other processor until the actor has
/// been grounded for two consecutive ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpPadProcessor;

/// Launch velocity that reaches the apex over `offset` when the horizontal
/// offset is covered.
///
/// `t = sqrt(-2 * dy / g) + dt / 2`; the half tick accounts for gravity
/// being applied before the first integration step. The radicand is clamped
/// at zero so targets below the pad (or zero gravity) still produce a finite
/// velocity.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use kcc_sim::processor::launch_velocity;
/// let v = launch_velocity(Vec3::new(0.0, 5.0, 10.0), Vec3::new(0.0, -20.0, 0.0), 0.0);
/// let t = 0.5_f32.sqrt();
/// assert!((v.z - 10.0 / t).abs() < 1e-4);
/// assert!((v.y - 20.0 * t).abs() < 1e-4);
/// ```
#[must_use]
pub fn launch_velocity(offset: Vec3, gravity: Vec3, delta_time: f32) -> Vec3 {
    let radicand = if gravity.y == 0.0 {
        0.0
    } else {
        (-2.0 * offset.y / gravity.y).max(0.0)
    };
    let apex_time = radicand.sqrt() + delta_time * 0.5;
    if apex_time <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(offset.x, 0.0, offset.z) / apex_time - Vec3::new(0.0, gravity.y, 0.0) * apex_time
}

impl Processor for JumpPadProcessor {
    fn priority(&self, _ctx: &ProcessorContext<'_>, _info: &ProcessorInfo) -> f32 {
        JUMP_PAD_PRIORITY
    }

    fn on_enter(
        &self,
        ctx: &mut ProcessorContext<'_>,
        info: &ProcessorInfo,
        _hit: &OverlapHit,
    ) -> bool {
        let Some(source) = info.source else {
            return false;
        };
        let Some(destination) = resolve_random_target(ctx.world_mut(), source) else {
            return false;
        };
        let Some(position) = ctx.position() else {
            return false;
        };
        let delta_time = ctx.delta_time();

        // Snapping to the current position cancels any leftover continuous
        // collision movement.
        if !ctx.teleport(position) {
            return false;
        }
        let Some(mut kcc) = ctx.kcc_mut() else {
            return false;
        };
        kcc.set_kinematic_velocity(Vec3::ZERO);
        kcc.is_grounded = false;
        let velocity = launch_velocity(destination.position - position, kcc.gravity, delta_time);
        kcc.set_dynamic_velocity(velocity);
        debug!("jump pad {source} launched actor with {velocity}");
        true
    }

    fn on_exit(&self, ctx: &mut ProcessorContext<'_>, _info: &ProcessorInfo) -> bool {
        ctx.kcc()
            .is_none_or(|kcc| kcc.is_grounded && kcc.was_grounded)
    }

    fn before_move(
        &self,
        ctx: &mut ProcessorContext<'_>,
        _info: &ProcessorInfo,
        stage: &mut StageInfo,
    ) {
        let delta_time = ctx.delta_time();
        if let Some(mut kcc) = ctx.kcc_mut() {
            let gravity = kcc.gravity;
            kcc.dynamic_velocity += gravity * delta_time;
            kcc.clear_transients();
        }
        stage.suppress_processors();
    }
}
