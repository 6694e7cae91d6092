//! Data handed to processor hooks.

use bevy::prelude::*;

use crate::kinematics::KinematicState;
use crate::random::DeterministicRng;

/// Scoped access to the world on behalf of one actor during one tick.
///
/// Component data is borrowed through [`World`] for the duration of a single
/// hook; nothing here outlives the call.
pub struct ProcessorContext<'w> {
    world: &'w mut World,
    entity: Entity,
    delta_time: f32,
}

impl<'w> ProcessorContext<'w> {
    /// Creates a context for `entity` with the given tick duration.
    pub fn new(world: &'w mut World, entity: Entity, delta_time: f32) -> Self {
        Self {
            world,
            entity,
            delta_time,
        }
    }

    /// The actor the hooks act on.
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.entity
    }

    /// Tick duration in seconds.
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Shared view of the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &*self.world
    }

    /// Exclusive view of the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    /// The actor's kinematic state.
    #[must_use]
    pub fn kcc(&self) -> Option<&KinematicState> {
        self.world.get::<KinematicState>(self.entity)
    }

    /// Mutable access to the actor's kinematic state.
    pub fn kcc_mut(&mut self) -> Option<Mut<'_, KinematicState>> {
        self.world.get_mut::<KinematicState>(self.entity)
    }

    /// The actor's current position.
    #[must_use]
    pub fn position(&self) -> Option<Vec3> {
        self.world
            .get::<Transform>(self.entity)
            .map(|transform| transform.translation)
    }

    /// The tick-synchronised random source.
    pub fn rng(&mut self) -> Option<Mut<'_, DeterministicRng>> {
        self.world.get_resource_mut::<DeterministicRng>()
    }

    /// Places the actor at `position` bypassing integration and collision.
    ///
    /// Returns `false` when the actor lacks a transform or kinematic state.
    pub fn teleport(&mut self, position: Vec3) -> bool {
        let mut query = self
            .world
            .query::<(&mut KinematicState, &mut Transform)>();
        let Ok((mut kcc, mut transform)) = query.get_mut(&mut *self.world, self.entity) else {
            return false;
        };
        kcc.teleport(&mut transform, position);
        true
    }
}

/// Identifies the processor a hook is invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessorInfo {
    /// Map entity carrying the processor; `None` for actor-attached ones.
    pub source: Option<Entity>,
}

impl ProcessorInfo {
    /// Info for a map-attached processor.
    #[must_use]
    pub const fn from_source(source: Entity) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Whether the processor is backed by a map entity.
    #[must_use]
    pub const fn has_entity(&self) -> bool {
        self.source.is_some()
    }
}

/// Contact between an actor and a processor volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    /// Map entity that was touched.
    pub collider: Entity,
    /// Closest point on the volume to the actor's centre.
    pub point: Vec3,
    /// Direction pushing the actor out of the volume.
    pub normal: Vec3,
    /// Penetration depth along `normal`.
    pub penetration: f32,
}

/// Per-tick state of the `before_move` stage for one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageInfo {
    suppressed: bool,
}

impl StageInfo {
    /// Prevents every remaining (lower-priority) processor from running this
    /// tick.
    pub const fn suppress_processors(&mut self) {
        self.suppressed = true;
    }

    /// Whether a higher-priority processor suppressed the rest.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}
