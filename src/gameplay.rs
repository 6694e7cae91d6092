//! Spawn points, roaming waypoints and the player avatar lifecycle.

use bevy::prelude::*;
use log::{info, warn};

use crate::components::{CollisionRadius, Player, PlayerInput, PlayerRef};
use crate::kinematics::KinematicState;
use crate::processor::{ActorProcessors, ProcessorKind, ProcessorRegistry, SprintProcessor};
use crate::random::DeterministicRng;
use crate::settings::SimulationSettings;

/// Pose at which a player avatar may appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPointData {
    /// Spawn position.
    pub position: Vec3,
    /// Spawn facing.
    pub rotation: Quat,
}

/// Point NPCs roam between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointData {
    /// Waypoint position.
    pub position: Vec3,
}

/// Map-level gameplay data.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct GameplayData {
    /// Candidate player spawn poses.
    pub spawn_points: Vec<SpawnPointData>,
    /// Candidate NPC destinations.
    pub waypoints: Vec<WaypointData>,
}

impl GameplayData {
    /// Uniformly chosen spawn point; `None` without drawing when there are
    /// none.
    pub fn random_spawn_point(&self, rng: &mut DeterministicRng) -> Option<SpawnPointData> {
        rng.pick(&self.spawn_points).copied()
    }

    /// Uniformly chosen waypoint; `None` without drawing when there are none.
    pub fn random_waypoint(&self, rng: &mut DeterministicRng) -> Option<WaypointData> {
        rng.pick(&self.waypoints).copied()
    }
}

/// Components every simulated actor carries.
///
/// `processors` become the actor-attached processors; map interactions start
/// empty.
#[must_use]
pub fn actor_bundle(
    transform: Transform,
    kcc: KinematicState,
    processors: Vec<ProcessorKind>,
) -> impl Bundle {
    (
        transform,
        kcc,
        ActorProcessors(processors),
        ProcessorRegistry::default(),
        CollisionRadius::default(),
    )
}

/// Avatar entity of `player_ref`, if spawned.
pub fn player_entity(world: &mut World, player_ref: PlayerRef) -> Option<Entity> {
    let mut query = world.query::<(Entity, &Player)>();
    query
        .iter(world)
        .find(|(_, player)| player.player_ref == player_ref)
        .map(|(entity, _)| entity)
}

fn pick_spawn_point(world: &mut World) -> Option<SpawnPointData> {
    let data = world.get_resource::<GameplayData>()?.clone();
    let mut rng = world.get_resource_mut::<DeterministicRng>()?;
    data.random_spawn_point(&mut rng)
}

/// Spawns the avatar of `player_ref` at a random spawn point.
///
/// Returns the existing avatar when the player already has one, and `None`
/// when no spawn point is available.
pub fn spawn_player(world: &mut World, player_ref: PlayerRef) -> Option<Entity> {
    if let Some(existing) = player_entity(world, player_ref) {
        warn!("player {} already has avatar {existing}", player_ref.0);
        return Some(existing);
    }
    let Some(spawn_point) = pick_spawn_point(world) else {
        warn!("no spawn point available for player {}", player_ref.0);
        return None;
    };
    let gravity = world
        .get_resource::<SimulationSettings>()
        .copied()
        .unwrap_or_default()
        .gravity_vector();

    let transform =
        Transform::from_translation(spawn_point.position).with_rotation(spawn_point.rotation);
    let mut kcc = KinematicState::with_gravity(gravity);
    kcc.set_look_rotation(spawn_point.rotation, false);
    let processors = vec![
        ProcessorKind::Sprint(SprintProcessor::default()),
        ProcessorKind::Environment,
    ];
    let entity = world
        .spawn((
            actor_bundle(transform, kcc, processors),
            Player { player_ref },
            PlayerInput::default(),
        ))
        .id();
    info!("spawned player {} as {entity}", player_ref.0);
    Some(entity)
}

/// Removes the avatar of `player_ref`.
///
/// Rider sets are cleaned up by [`crate::platform::forget_rider_on_remove`].
pub fn despawn_player(world: &mut World, player_ref: PlayerRef) -> bool {
    let Some(entity) = player_entity(world, player_ref) else {
        return false;
    };
    info!("despawned player {}", player_ref.0);
    world.despawn(entity)
}
