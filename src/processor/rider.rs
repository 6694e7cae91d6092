use bevy::prelude::*;
use log::debug;

use super::{OverlapHit, Processor, ProcessorContext, ProcessorInfo};
use crate::platform::Platform;

/// Registers the actor as a rider of the platform it stands on.
///
/// Carrying happens in the platform update; this processor only maintains
/// the rider set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformProcessor;

impl Processor for PlatformProcessor {
    fn on_enter(
        &self,
        ctx: &mut ProcessorContext<'_>,
        info: &ProcessorInfo,
        _hit: &OverlapHit,
    ) -> bool {
        let actor = ctx.entity();
        let Some(source) = info.source else {
            return false;
        };
        let Some(mut platform) = ctx.world_mut().get_mut::<Platform>(source) else {
            debug!("platform processor {source} has no platform component");
            return false;
        };
        platform.riders.insert(actor);
        debug!("{actor} boarded platform {source}");
        true
    }

    fn on_exit(&self, ctx: &mut ProcessorContext<'_>, info: &ProcessorInfo) -> bool {
        let actor = ctx.entity();
        let Some(source) = info.source else {
            return true;
        };
        if let Some(mut platform) = ctx.world_mut().get_mut::<Platform>(source) {
            platform.riders.remove(&actor);
            debug!("{actor} left platform {source}");
        }
        true
    }
}
