//! Behaviour-driven tests using rust-rspec.
//!
//! These tests verify that riders follow their platform through a dwell
//! at the end of the path. rspec clones the environment for every example
//! but the world sits behind an `Arc`, so every example builds its own
//! scene before ticking.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use bevy::prelude::*;
use kcc_sim::{PlatformMotion, ProcessorKind};
use rspec_runner::run_serial;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use test_utils::sim::{position, run_ticks, sim_world, spawn_actor, spawn_platform};

#[derive(Clone, Debug)]
struct RideWorld {
    world: Arc<Mutex<World>>,
    platform: Option<Entity>,
    rider: Option<Entity>,
}

impl Default for RideWorld {
    fn default() -> Self {
        Self {
            world: Arc::new(Mutex::new(World::new())),
            platform: None,
            rider: None,
        }
    }
}

impl RideWorld {
    fn lock(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds a fresh scene and advances it by `ticks`.
    fn scene(&mut self, ticks: usize) {
        self.setup();
        self.tick(ticks);
    }

    fn setup(&mut self) {
        let mut world = sim_world(1.0, 11);
        let platform = spawn_platform(
            &mut world,
            Vec3::ZERO,
            &[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)],
            PlatformMotion {
                current_waypoint: 1,
                speed: 1.0,
                delay: 2.0,
                ..PlatformMotion::default()
            },
            Vec3::new(1.5, 0.5, 1.5),
        );
        let rider = spawn_actor(&mut world, Vec3::ZERO, vec![ProcessorKind::Environment]);
        self.world = Arc::new(Mutex::new(world));
        self.platform = Some(platform);
        self.rider = Some(rider);
    }

    fn tick(&mut self, ticks: usize) {
        run_ticks(&mut self.lock(), ticks);
    }

    fn positions(&self) -> (f32, f32) {
        let world = self.lock();
        let platform = self.platform.expect("platform not spawned");
        let rider = self.rider.expect("rider not spawned");
        (position(&world, platform).x, position(&world, rider).x)
    }
}

#[test]
fn rider_follows_platform_through_dwell() {
    run_serial(&rspec::given(
        "a platform with a two second dwell and an actor standing on it",
        RideWorld::default(),
        |ctx| {
            ctx.when("the platform reaches the end of its path", |ctx| {
                ctx.before_each(|world| world.scene(3));
                ctx.then("the platform sits on the last waypoint", |world| {
                    assert_eq!(world.positions().0, 3.0);
                });
                ctx.then("the rider has been carried two units", |world| {
                    // The first tick moved the platform before the rider registered.
                    assert!((world.positions().1 - 2.0).abs() < 1e-5);
                });
            });
            ctx.when("one more tick passes during the dwell", |ctx| {
                ctx.before_each(|world| world.scene(4));
                ctx.then("neither platform nor rider moves", |world| {
                    let (platform, rider) = world.positions();
                    assert_eq!(platform, 3.0);
                    assert!((rider - 2.0).abs() < 1e-5);
                });
            });
            ctx.when("the dwell has elapsed", |ctx| {
                ctx.before_each(|world| world.scene(5));
                ctx.then("both head back together", |world| {
                    let (platform, rider) = world.positions();
                    assert_eq!(platform, 2.0);
                    assert!((rider - 1.0).abs() < 1e-5);
                });
            });
        },
    ));
}
