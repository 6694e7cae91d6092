//! Integration tests for platform carrying through the full fixed tick.

use bevy::prelude::*;
use kcc_sim::{PlatformDirection, PlatformMotion, ProcessorKind, ProcessorRegistry};
use rstest::{fixture, rstest};
use test_utils::assert_vec3_near;
use test_utils::sim::{position, run_ticks, sim_world, spawn_actor, spawn_platform};

const TICK: f32 = 1.0 / 60.0;

struct Scene {
    world: World,
    platform: Entity,
    rider: Entity,
    bystander: Entity,
}

#[fixture]
fn scene() -> Scene {
    let mut world = sim_world(TICK, 7);
    let platform = spawn_platform(
        &mut world,
        Vec3::ZERO,
        &[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
        PlatformMotion {
            current_waypoint: 1,
            speed: 3.0,
            ..PlatformMotion::default()
        },
        Vec3::new(1.5, 0.5, 1.5),
    );
    let rider = spawn_actor(&mut world, Vec3::ZERO, vec![ProcessorKind::Environment]);
    let bystander = spawn_actor(
        &mut world,
        Vec3::new(0.0, 0.0, 20.0),
        vec![ProcessorKind::Environment],
    );
    Scene {
        world,
        platform,
        rider,
        bystander,
    }
}

fn is_rider(world: &World, platform: Entity, actor: Entity) -> bool {
    world
        .get::<ProcessorRegistry>(actor)
        .is_some_and(|registry| registry.is_active(platform))
}

#[rstest]
fn rider_moves_by_platform_delta_while_registered(mut scene: Scene) {
    let world = &mut scene.world;

    // First tick: the platform moves before the overlap registers the rider.
    run_ticks(world, 1);
    assert!(is_rider(world, scene.platform, scene.rider));
    assert_eq!(position(world, scene.rider).x, 0.0);

    for _ in 0..30 {
        let platform_before = position(world, scene.platform);
        let rider_before = position(world, scene.rider);
        run_ticks(world, 1);
        let platform_delta = position(world, scene.platform) - platform_before;
        let rider_delta = position(world, scene.rider) - rider_before;
        assert!(platform_delta.x > 0.0);
        assert_vec3_near(rider_delta, platform_delta, 1e-5);
    }
    assert_vec3_near(
        position(world, scene.bystander),
        Vec3::new(0.0, 0.0, 20.0),
        1e-6,
    );
}

#[rstest]
fn rider_stops_moving_after_leaving(mut scene: Scene) {
    let world = &mut scene.world;
    run_ticks(world, 5);
    assert!(is_rider(world, scene.platform, scene.rider));

    world
        .get_mut::<Transform>(scene.rider)
        .expect("rider has a transform")
        .translation = Vec3::new(-20.0, 0.0, 0.0);
    // Carried once more by the platform phase, then the overlap phase closes
    // the interaction.
    run_ticks(world, 1);
    assert!(!is_rider(world, scene.platform, scene.rider));

    let parked = position(world, scene.rider);
    run_ticks(world, 10);
    assert_vec3_near(position(world, scene.rider), parked, 1e-6);
}

#[rstest]
fn closed_loop_returns_platform_to_start() {
    let mut world = sim_world(1.0, 7);
    let a = Vec3::ZERO;
    let b = Vec3::new(4.0, 0.0, 0.0);
    let c = Vec3::new(4.0, 0.0, 6.0);
    let platform = spawn_platform(
        &mut world,
        a,
        &[a, b, c],
        PlatformMotion {
            current_waypoint: 1,
            speed: 2.0,
            ..PlatformMotion::default()
        },
        Vec3::splat(0.5),
    );

    let mut travelled = 0.0;
    for _ in 0..10 {
        let before = position(&world, platform);
        run_ticks(&mut world, 1);
        travelled += position(&world, platform).distance(before);
    }

    let motion = world
        .get::<kcc_sim::Platform>(platform)
        .map(|p| p.motion)
        .expect("platform survives");
    assert!((travelled - 2.0 * (a.distance(b) + b.distance(c))).abs() < 1e-4);
    assert_eq!(position(&world, platform), a);
    assert_eq!(motion.current_waypoint, 1);
    assert_eq!(motion.direction, PlatformDirection::Forward);
}

#[rstest]
fn removing_platform_detaches_riders(mut scene: Scene) {
    let world = &mut scene.world;
    run_ticks(world, 2);
    assert!(is_rider(world, scene.platform, scene.rider));

    world.entity_mut(scene.platform).remove::<kcc_sim::Platform>();
    assert!(!is_rider(world, scene.platform, scene.rider));
}
