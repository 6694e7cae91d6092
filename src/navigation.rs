//! Navigation target resolution shared by teleporters and jump pads.
//!
//! A navigation source owns an ordered list of destination entities. Consumers
//! pick one uniformly at random from the world's [`DeterministicRng`] and read
//! its transform.

use bevy::prelude::*;
use log::debug;

use crate::random::DeterministicRng;

/// Ordered list of destinations linked to a map entity.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationSource {
    /// Destination entities; read only to consumers.
    pub targets: Vec<Entity>,
}

impl NavigationSource {
    /// Creates a source linked to `targets`.
    #[must_use]
    pub const fn new(targets: Vec<Entity>) -> Self {
        Self { targets }
    }
}

/// Resolved destination pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationDestination {
    /// Chosen target entity.
    pub entity: Entity,
    /// Target position.
    pub position: Vec3,
    /// Target facing.
    pub rotation: Quat,
}

/// Picks a random destination from the [`NavigationSource`] on `source`.
///
/// Returns `None` when the source has no navigation component, its list is
/// empty, the RNG resource is missing, or the chosen target has no transform.
/// A draw is consumed whenever the list is non-empty so every peer advances
/// the random sequence identically.
pub fn resolve_random_target(world: &mut World, source: Entity) -> Option<NavigationDestination> {
    let Some(len) = world
        .get::<NavigationSource>(source)
        .map(|navigation| navigation.targets.len())
    else {
        debug!("entity {source} has no navigation source");
        return None;
    };
    if len == 0 {
        debug!("navigation source {source} has no targets");
        return None;
    }

    let index = world
        .get_resource_mut::<DeterministicRng>()?
        .next_index(len)?;
    let entity = *world.get::<NavigationSource>(source)?.targets.get(index)?;
    let Some(transform) = world.get::<Transform>(entity) else {
        debug!("navigation target {entity} has no transform");
        return None;
    };

    Some(NavigationDestination {
        entity,
        position: transform.translation,
        rotation: transform.rotation,
    })
}
