use bevy::prelude::*;
use log::debug;

use super::{OverlapHit, Processor, ProcessorContext, ProcessorInfo};
use crate::navigation::resolve_random_target;

/// Moves the actor to a random destination of the touched navigation source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeleportProcessor;

impl Processor for TeleportProcessor {
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
        if ctx.kcc().is_none() || !ctx.teleport(destination.position) {
            return false;
        }

        if let Some(mut kcc) = ctx.kcc_mut() {
            kcc.set_kinematic_velocity(Vec3::ZERO);
            kcc.set_dynamic_velocity(Vec3::ZERO);
            kcc.set_look_rotation(destination.rotation, true);
        }
        debug!(
            "teleported {} to {} via {source}",
            ctx.entity(),
            destination.entity
        );
        true
    }
}
