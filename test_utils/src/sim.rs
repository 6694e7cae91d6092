//! Headless simulation fixtures.

use bevy::prelude::*;
use kcc_sim::gameplay::actor_bundle;
use kcc_sim::{
    KccSimPlugin, KinematicState, MapProcessor, NavigationSource, Platform, PlatformMotion,
    ProcessorKind, ProcessorVolume, SimulationSettings,
};

/// App with [`KccSimPlugin`] and the given tick duration and seed.
///
/// Gravity and ground height keep their defaults.
pub fn sim_app(tick_duration: f32, seed: u32) -> App {
    let mut app = App::new();
    app.insert_resource(SimulationSettings {
        tick_duration,
        seed,
        ..SimulationSettings::default()
    });
    app.add_plugins(KccSimPlugin);
    app
}

/// World taken out of [`sim_app`], keeping its schedules and observers.
///
/// Unlike `App`, a bare `World` is `Send + Sync`, which shared behaviour-test
/// fixtures need.
pub fn sim_world(tick_duration: f32, seed: u32) -> World {
    let mut app = sim_app(tick_duration, seed);
    std::mem::take(app.world_mut())
}

/// Runs `ticks` fixed ticks.
pub fn run_ticks(world: &mut World, ticks: usize) {
    for _ in 0..ticks {
        world.run_schedule(FixedUpdate);
    }
}

/// Spawns an actor at `position` whose only actor processor is `processors`.
pub fn spawn_actor(world: &mut World, position: Vec3, processors: Vec<ProcessorKind>) -> Entity {
    let gravity = world
        .get_resource::<SimulationSettings>()
        .copied()
        .unwrap_or_default()
        .gravity_vector();
    world
        .spawn(actor_bundle(
            Transform::from_translation(position),
            KinematicState::with_gravity(gravity),
            processors,
        ))
        .id()
}

/// Spawns a platform at `position` following waypoints at `points`.
pub fn spawn_platform(
    world: &mut World,
    position: Vec3,
    points: &[Vec3],
    motion: PlatformMotion,
    half_extents: Vec3,
) -> Entity {
    let waypoints = points
        .iter()
        .map(|point| world.spawn(Transform::from_translation(*point)).id())
        .collect();
    world
        .spawn((
            Transform::from_translation(position),
            Platform::new(waypoints, motion),
            MapProcessor(ProcessorKind::Platform),
            ProcessorVolume::new(half_extents),
        ))
        .id()
}

/// Spawns a trigger volume running `kind` with navigation targets at
/// `targets`.
pub fn spawn_trigger(
    world: &mut World,
    kind: ProcessorKind,
    position: Vec3,
    half_extents: Vec3,
    targets: &[Transform],
) -> Entity {
    let target_entities = targets
        .iter()
        .map(|transform| world.spawn(*transform).id())
        .collect();
    world
        .spawn((
            Transform::from_translation(position),
            MapProcessor(kind),
            ProcessorVolume::new(half_extents),
            NavigationSource::new(target_entities),
        ))
        .id()
}

/// Translation of `entity`.
///
/// # Panics
/// Panics if the entity has no transform.
pub fn position(world: &World, entity: Entity) -> Vec3 {
    world
        .get::<Transform>(entity)
        .map(|transform| transform.translation)
        .expect("entity should have a Transform")
}

/// Kinematic state of `entity`.
///
/// # Panics
/// Panics if the entity has no kinematic state.
pub fn kcc(world: &World, entity: Entity) -> KinematicState {
    world
        .get::<KinematicState>(entity)
        .cloned()
        .expect("entity should have a KinematicState")
}
