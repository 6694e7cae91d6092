//! Waypoint-following platforms that carry their riders.
//!
//! Each tick a platform spends a distance budget of `speed * dt` walking
//! towards its current waypoint, bouncing at either end of the list. The
//! resulting displacement is copied to the visual twin and added to every
//! rider's translation. Riders are registered by
//! [`crate::processor::PlatformProcessor`].

use bevy::prelude::*;
use hashbrown::HashSet;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::processor::ProcessorRegistry;
use crate::settings::SimulationSettings;
use crate::vector_math::normalize_with_length;
use crate::{DEFAULT_TICK_DURATION, DISTANCE_EPSILON};

/// Travel direction along the waypoint list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformDirection {
    /// Towards higher indices.
    #[default]
    Forward,
    /// Towards lower indices.
    Backward,
}

/// Traversal state of one platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformMotion {
    /// Index of the waypoint being approached.
    pub current_waypoint: usize,
    /// Direction of travel along the list.
    pub direction: PlatformDirection,
    /// Units per second.
    pub speed: f32,
    /// Dwell time after each reversal.
    pub delay: f32,
    /// Remaining dwell time.
    pub current_delay: f32,
}

impl Default for PlatformMotion {
    fn default() -> Self {
        Self {
            current_waypoint: 0,
            direction: PlatformDirection::Forward,
            speed: 1.0,
            delay: 0.0,
            current_delay: 0.0,
        }
    }
}

impl PlatformMotion {
    /// Moves to the next waypoint index, bouncing at either end.
    ///
    /// Returns `true` when the direction reversed. Requires `count >= 2`.
    pub const fn advance_waypoint(&mut self, count: usize) -> bool {
        match self.direction {
            PlatformDirection::Forward => {
                self.current_waypoint += 1;
                if self.current_waypoint >= count {
                    self.current_waypoint = count.saturating_sub(2);
                    self.direction = PlatformDirection::Backward;
                    return true;
                }
            }
            PlatformDirection::Backward => {
                if self.current_waypoint == 0 {
                    self.current_waypoint = 1;
                    self.direction = PlatformDirection::Forward;
                    return true;
                }
                self.current_waypoint -= 1;
            }
        }
        false
    }

    /// Advances the platform by one tick from `position` and returns the new
    /// position.
    ///
    /// At most `waypoints.len()` legs are walked per tick so a degenerate
    /// path of coincident waypoints cannot stall the tick.
    pub fn advance(&mut self, position: Vec3, waypoints: &[Vec3], delta_time: f32) -> Vec3 {
        self.current_delay = (self.current_delay - delta_time).max(0.0);
        if self.current_delay > 0.0 || waypoints.len() < 2 {
            return position;
        }
        debug_assert!(
            self.current_waypoint < waypoints.len(),
            "waypoint index {} out of range",
            self.current_waypoint
        );

        let mut current = position;
        let mut budget = self.speed * delta_time;
        for _ in 0..waypoints.len() {
            if budget <= 0.0 {
                break;
            }
            let Some(target) = waypoints.get(self.current_waypoint).copied() else {
                break;
            };
            let (direction, distance) = normalize_with_length(target - current);
            if distance > budget {
                current += direction * budget;
                break;
            }
            if distance > DISTANCE_EPSILON {
                current = target;
                budget -= distance;
            }
            if self.advance_waypoint(waypoints.len()) && self.delay > 0.0 {
                self.current_delay = self.delay;
                break;
            }
        }
        current
    }
}

/// Unique set of actors standing on a platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Riders(pub HashSet<Entity>);

/// Moving platform driven along `waypoints`.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Platform {
    /// Waypoint entities, read through their transforms.
    pub waypoints: Vec<Entity>,
    /// Traversal state.
    pub motion: PlatformMotion,
    /// Actors carried by the platform.
    pub riders: Riders,
    /// Render-only twin kept at the platform's position.
    pub visual: Option<Entity>,
}

impl Platform {
    /// Creates a platform following `waypoints` with the given motion.
    #[must_use]
    pub fn new(waypoints: Vec<Entity>, motion: PlatformMotion) -> Self {
        Self {
            waypoints,
            motion,
            ..Self::default()
        }
    }
}

/// Moves every platform one tick and carries its riders.
///
/// Platforms are processed in ascending entity order. A platform whose
/// waypoints lack transforms still counts down its dwell delay but does not
/// move.
pub fn platform_update_system(
    settings: Option<Res<SimulationSettings>>,
    mut platforms: Query<(Entity, &mut Platform)>,
    mut transforms: Query<&mut Transform>,
) {
    let delta_time = settings.map_or(DEFAULT_TICK_DURATION, |s| s.tick_duration);
    let mut order: Vec<Entity> = platforms.iter().map(|(entity, _)| entity).collect();
    order.sort_unstable();

    for entity in order {
        let Ok((_, mut platform)) = platforms.get_mut(entity) else {
            continue;
        };
        let Ok(base) = transforms.get(entity).map(|t| t.translation) else {
            continue;
        };
        let points: Vec<Vec3> = platform
            .waypoints
            .iter()
            .map(|waypoint| transforms.get(*waypoint).map(|t| t.translation))
            .collect::<Result<_, _>>()
            .unwrap_or_default();

        let moved = platform.motion.advance(base, &points, delta_time);
        if let Ok(mut transform) = transforms.get_mut(entity) {
            transform.translation = moved;
        }
        if let Some(visual) = platform.visual {
            if let Ok(mut transform) = transforms.get_mut(visual) {
                transform.translation = moved;
            }
        }

        let delta = moved - base;
        if delta == Vec3::ZERO {
            continue;
        }
        for rider in platform.riders.iter() {
            if let Ok(mut transform) = transforms.get_mut(*rider) {
                transform.translation += delta;
            }
        }
    }
}

/// Starts every newly attached platform with an empty rider set.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub fn reset_riders_on_add(event: On<Add, Platform>, mut platforms: Query<&mut Platform>) {
    if let Ok(mut platform) = platforms.get_mut(event.event().entity) {
        platform.riders.clear();
    }
}

/// Releases the rider set of a removed platform and detaches every rider's
/// registration with it.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub fn detach_riders_on_remove(
    event: On<Remove, Platform>,
    mut platforms: Query<&mut Platform>,
    mut registries: Query<&mut ProcessorRegistry>,
) {
    let source = event.event().entity;
    let Ok(mut platform) = platforms.get_mut(source) else {
        return;
    };
    for rider in platform.riders.drain() {
        let detached = registries
            .get_mut(rider)
            .is_ok_and(|mut registry| registry.detach(source));
        if detached {
            debug!("{rider} detached from removed platform {source}");
        }
    }
}

/// Drops an actor from every rider set once its registry goes away, which
/// includes despawning.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub fn forget_rider_on_remove(
    event: On<Remove, ProcessorRegistry>,
    mut platforms: Query<&mut Platform>,
) {
    let rider = event.event().entity;
    for mut platform in &mut platforms {
        if platform.riders.remove(&rider) {
            debug!("{rider} left platform rider sets");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::processor::{process_overlaps, MapProcessor, OverlapHit, ProcessorKind};
    use bevy::ecs::system::RunSystemOnce;
    use rstest::rstest;

    const A: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    const B: Vec3 = Vec3::new(4.0, 0.0, 0.0);
    const C: Vec3 = Vec3::new(4.0, 0.0, 6.0);

    fn motion(current_waypoint: usize, speed: f32, delay: f32) -> PlatformMotion {
        PlatformMotion {
            current_waypoint,
            speed,
            delay,
            ..PlatformMotion::default()
        }
    }

    #[rstest]
    #[case(0.5, 0.5)]
    #[case(1.0, 2.0)]
    #[case(1.0, 4.0)]
    fn distance_is_budget_or_remaining(#[case] dt: f32, #[case] speed: f32) {
        let mut state = motion(1, speed, 0.0);
        let moved = state.advance(A, &[A, B], dt);
        let expected = (speed * dt).min(A.distance(B));
        assert_relative_eq!(moved.distance(A), expected, epsilon = 1e-5);
    }

    #[rstest]
    fn two_waypoints_oscillate() {
        let mut state = motion(1, 4.0, 0.0);
        let mut position = A;
        let mut indices = Vec::new();
        let mut directions = Vec::new();
        for _ in 0..4 {
            position = state.advance(position, &[A, B], 1.0);
            indices.push(state.current_waypoint);
            directions.push(state.direction);
        }
        assert_eq!(indices, vec![0, 1, 0, 1]);
        assert_eq!(
            directions,
            vec![
                PlatformDirection::Backward,
                PlatformDirection::Forward,
                PlatformDirection::Backward,
                PlatformDirection::Forward,
            ]
        );
        assert_eq!(position, A);
    }

    #[rstest]
    fn reversal_arms_dwell_delay() {
        let end = Vec3::new(3.0, 0.0, 0.0);
        let mut state = motion(1, 1.0, 2.0);
        let mut positions = Vec::new();
        let mut position = A;
        for _ in 0..5 {
            position = state.advance(position, &[A, end], 1.0);
            positions.push(position.x);
        }
        // Reversal on tick 3, held on tick 4, moving again on tick 5.
        assert_eq!(positions, vec![1.0, 2.0, 3.0, 3.0, 2.0]);
    }

    #[rstest]
    fn reversal_discards_leftover_budget() {
        let mut state = motion(1, 3.0, 0.5);
        let moved = state.advance(A, &[A, Vec3::X], 1.0);
        assert_eq!(moved, Vec3::X);
        assert_relative_eq!(state.current_delay, 0.5);
    }

    #[rstest]
    fn closed_loop_returns_to_start() {
        let waypoints = [A, B, C];
        let mut state = motion(1, 2.0, 0.0);
        let initial = state;
        let mut position = A;
        let mut travelled = 0.0;
        for _ in 0..10 {
            let next = state.advance(position, &waypoints, 1.0);
            travelled += next.distance(position);
            position = next;
        }
        assert_relative_eq!(travelled, 2.0 * (A.distance(B) + B.distance(C)), epsilon = 1e-4);
        assert_eq!(position, A);
        assert_eq!(state.current_waypoint, initial.current_waypoint);
        assert_eq!(state.direction, initial.direction);
    }

    #[rstest]
    fn starting_on_waypoint_advances_without_budget() {
        let mut state = motion(0, 2.0, 0.0);
        let moved = state.advance(A, &[A, B, C], 1.0);
        assert_relative_eq!(moved.x, 2.0);
        assert_eq!(state.current_waypoint, 1);
    }

    #[rstest]
    fn coincident_waypoints_stop_after_bounded_legs() {
        let mut state = motion(0, 5.0, 0.0);
        let moved = state.advance(A, &[A, A, A], 1.0);
        assert_eq!(moved, A);
        assert!(state.current_waypoint < 3);
    }

    #[rstest]
    fn fewer_than_two_waypoints_do_not_move() {
        let mut state = motion(0, 5.0, 0.0);
        assert_eq!(state.advance(B, &[A], 1.0), B);
        assert_eq!(state.advance(B, &[], 1.0), B);
    }

    #[rstest]
    fn system_syncs_visual_and_carries_riders() {
        let mut world = World::new();
        world.insert_resource(SimulationSettings {
            tick_duration: 1.0,
            ..SimulationSettings::default()
        });
        let a = world.spawn(Transform::from_translation(A)).id();
        let b = world.spawn(Transform::from_translation(B)).id();
        let visual = world.spawn(Transform::default()).id();
        let rider = world.spawn(Transform::from_xyz(0.0, 1.0, 0.0)).id();
        let bystander = world.spawn(Transform::from_xyz(0.0, 1.0, 0.0)).id();
        let mut platform = Platform::new(vec![a, b], motion(1, 1.0, 0.0));
        platform.visual = Some(visual);
        let entity = world.spawn((Transform::from_translation(A), platform)).id();
        world
            .get_mut::<Platform>(entity)
            .expect("platform should exist")
            .riders
            .insert(rider);

        world
            .run_system_once(platform_update_system)
            .expect("platform update should run");

        let at = |e: Entity| world.get::<Transform>(e).map(|t| t.translation);
        assert_eq!(at(entity), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(at(visual), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(at(rider), Some(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(at(bystander), Some(Vec3::new(0.0, 1.0, 0.0)));
    }

    #[rstest]
    fn lifecycle_observers_manage_riders() {
        let mut world = World::new();
        world.add_observer(reset_riders_on_add);
        world.add_observer(detach_riders_on_remove);

        let mut stale = Platform::default();
        stale.riders.insert(world.spawn_empty().id());
        let platform = world
            .spawn((stale, MapProcessor(ProcessorKind::Platform)))
            .id();
        assert!(world
            .get::<Platform>(platform)
            .is_some_and(|p| p.riders.is_empty()));

        let rider = world.spawn(ProcessorRegistry::default()).id();
        let hit = OverlapHit {
            collider: platform,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            penetration: 0.0,
        };
        process_overlaps(&mut world, rider, &[hit], 1.0 / 60.0);
        assert!(world
            .get::<Platform>(platform)
            .is_some_and(|p| p.riders.contains(&rider)));

        world.entity_mut(platform).remove::<Platform>();
        assert!(world
            .get::<ProcessorRegistry>(rider)
            .is_some_and(|r| !r.is_active(platform)));
    }

    #[rstest]
    fn despawned_actor_leaves_every_rider_set() {
        let mut world = World::new();
        world.add_observer(forget_rider_on_remove);
        let npc = world.spawn(ProcessorRegistry::default()).id();
        let other = world.spawn(ProcessorRegistry::default()).id();
        let platforms: Vec<Entity> = (0..2)
            .map(|_| {
                let mut platform = Platform::default();
                platform.riders.insert(npc);
                platform.riders.insert(other);
                world.spawn(platform).id()
            })
            .collect();

        assert!(world.despawn(npc));

        for platform in platforms {
            let riders = world
                .get::<Platform>(platform)
                .map(|p| p.riders.clone())
                .expect("platform should exist");
            assert!(!riders.contains(&npc));
            assert!(riders.contains(&other));
        }
    }
}
