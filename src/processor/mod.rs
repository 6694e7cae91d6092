//! Processor dispatch contract.
//!
//! A processor is a behaviour bound to map geometry (teleporter, jump pad,
//! moving platform) or to the actor itself (sprint, gravity) that reacts to
//! the actor touching it and may rewrite the actor's velocities before the
//! movement integrator runs.
//!
//! Map-attached processors live on entities carrying [`MapProcessor`] and
//! [`crate::overlap::ProcessorVolume`]; they are driven through
//! [`Processor::on_enter`] / [`Processor::on_exit`] as overlaps begin and end.
//! Actor-attached processors live in [`ActorProcessors`] and only receive
//! [`Processor::before_move`].
//!
//! Within one tick `before_move` calls for an actor run in descending
//! priority. A processor may call [`StageInfo::suppress_processors`], after
//! which no lower-priority processor runs for the rest of the tick.

mod context;
pub mod dispatch;
mod environment;
mod jump_pad;
mod rider;
mod sprint;
mod teleport;

pub use context::{OverlapHit, ProcessorContext, ProcessorInfo, StageInfo};
pub use dispatch::{before_move_system, process_overlaps, run_before_move};
pub use environment::EnvironmentProcessor;
pub use jump_pad::{launch_velocity, JumpPadProcessor};
pub use rider::PlatformProcessor;
pub use sprint::SprintProcessor;
pub use teleport::TeleportProcessor;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_PRIORITY;

/// Capability every processor implements.
///
/// All hooks have defaults so a processor only overrides what it needs.
pub trait Processor {
    /// Ordering key for `before_move`; higher runs first. Must be pure.
    fn priority(&self, _ctx: &ProcessorContext<'_>, _info: &ProcessorInfo) -> f32 {
        DEFAULT_PRIORITY
    }

    /// Called once when the actor starts overlapping the processor.
    ///
    /// Returning `false` makes the processor transparent for this overlap:
    /// it is not tracked and `on_exit` is never delivered.
    fn on_enter(
        &self,
        _ctx: &mut ProcessorContext<'_>,
        _info: &ProcessorInfo,
        _hit: &OverlapHit,
    ) -> bool {
        true
    }

    /// Called once the overlap ended, then every tick until it returns
    /// `true` and the interaction closes.
    fn on_exit(&self, _ctx: &mut ProcessorContext<'_>, _info: &ProcessorInfo) -> bool {
        true
    }

    /// Called once per tick for every active processor before movement.
    fn before_move(
        &self,
        _ctx: &mut ProcessorContext<'_>,
        _info: &ProcessorInfo,
        _stage: &mut StageInfo,
    ) {
    }
}

/// Closed set of processors known to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessorKind {
    /// Moves the actor to a random navigation target.
    Teleport,
    /// Launches the actor ballistically onto a random navigation target.
    JumpPad,
    /// Registers the actor as a rider of the platform.
    Platform,
    /// Chooses walk or sprint speed from input.
    Sprint(SprintProcessor),
    /// Applies gravity and external accumulators, then derives the
    /// kinematic velocity from input.
    Environment,
}

impl ProcessorKind {
    fn as_processor(&self) -> &dyn Processor {
        match self {
            Self::Teleport => &TeleportProcessor,
            Self::JumpPad => &JumpPadProcessor,
            Self::Platform => &PlatformProcessor,
            Self::Sprint(sprint) => sprint,
            Self::Environment => &EnvironmentProcessor,
        }
    }
}

impl Processor for ProcessorKind {
    fn priority(&self, ctx: &ProcessorContext<'_>, info: &ProcessorInfo) -> f32 {
        self.as_processor().priority(ctx, info)
    }

    fn on_enter(
        &self,
        ctx: &mut ProcessorContext<'_>,
        info: &ProcessorInfo,
        hit: &OverlapHit,
    ) -> bool {
        self.as_processor().on_enter(ctx, info, hit)
    }

    fn on_exit(&self, ctx: &mut ProcessorContext<'_>, info: &ProcessorInfo) -> bool {
        self.as_processor().on_exit(ctx, info)
    }

    fn before_move(
        &self,
        ctx: &mut ProcessorContext<'_>,
        info: &ProcessorInfo,
        stage: &mut StageInfo,
    ) {
        self.as_processor().before_move(ctx, info, stage);
    }
}

/// Processor attached to a piece of map geometry.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deref)]
pub struct MapProcessor(pub ProcessorKind);

/// Processors that are always active for an actor, independent of collision.
#[derive(Component, Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct ActorProcessors(pub Vec<ProcessorKind>);

/// Active interaction between an actor and a map processor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Registration {
    /// Map entity carrying the processor.
    pub source: Entity,
    /// Processor captured when the interaction began.
    pub kind: ProcessorKind,
    /// Monotonic registration order, used to break priority ties.
    pub order: u64,
    /// Overlap ended and `on_exit` has not accepted closing yet.
    pub exiting: bool,
}

/// Per-actor bookkeeping of map processor interactions.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ProcessorRegistry {
    registrations: Vec<Registration>,
    declined: Vec<Entity>,
    next_order: u64,
}

impl ProcessorRegistry {
    /// Active registrations in registration order.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Whether the actor currently interacts with `source`.
    #[must_use]
    pub fn is_active(&self, source: Entity) -> bool {
        self.registrations.iter().any(|r| r.source == source)
    }

    /// Whether `on_enter` declined `source` for the ongoing overlap.
    #[must_use]
    pub fn is_declined(&self, source: Entity) -> bool {
        self.declined.contains(&source)
    }

    /// Drops the registration for `source` without running `on_exit`.
    ///
    /// Used when the source itself disappears.
    pub fn detach(&mut self, source: Entity) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.source != source);
        before != self.registrations.len()
    }

    fn register(&mut self, source: Entity, kind: ProcessorKind) {
        let order = self.next_order;
        self.next_order += 1;
        self.registrations.push(Registration {
            source,
            kind,
            order,
            exiting: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn registry_tracks_order_and_detach() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut registry = ProcessorRegistry::default();
        registry.register(a, ProcessorKind::Platform);
        registry.register(b, ProcessorKind::JumpPad);
        let orders: Vec<u64> = registry.registrations().iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert!(registry.detach(a));
        assert!(!registry.is_active(a));
        assert!(registry.is_active(b));
        assert!(!registry.detach(a));
    }

    #[rstest]
    fn processor_kinds_deserialize_from_tags() {
        let kinds: Vec<ProcessorKind> =
            serde_json::from_str(r#"[{"type":"teleport"},{"type":"jump_pad"}]"#)
                .unwrap_or_default();
        assert_eq!(kinds, vec![ProcessorKind::Teleport, ProcessorKind::JumpPad]);
    }
}
