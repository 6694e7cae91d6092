//! Minimal overlap detection between actor spheres and processor volumes.
//!
//! Volumes are axis-aligned boxes centred on their entity's translation;
//! rotation and scale are ignored. Hits are produced in ascending collider
//! order and routed to [`process_overlaps`] once per actor per tick.

use bevy::prelude::*;

use crate::components::CollisionRadius;
use crate::kinematics::KinematicState;
use crate::processor::{process_overlaps, MapProcessor, OverlapHit};
use crate::settings::tick_duration;
use crate::DEFAULT_ACTOR_RADIUS;

/// Box-shaped trigger volume of a map processor.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ProcessorVolume {
    /// Half size along each axis.
    pub half_extents: Vec3,
}

impl ProcessorVolume {
    /// Volume with the given half extents.
    #[must_use]
    pub const fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

#[derive(Debug, Clone, Copy)]
struct VolumeSnapshot {
    entity: Entity,
    centre: Vec3,
    half_extents: Vec3,
}

/// Reusable buffers for [`overlap_system`].
#[derive(Debug, Default)]
pub struct OverlapScratch {
    volumes: Vec<VolumeSnapshot>,
    actors: Vec<(Entity, Vec3, f32)>,
    hits: Vec<OverlapHit>,
}

/// Contact between a sphere and an axis-aligned box, if they touch.
///
/// The normal points from the box towards the sphere centre. A centre inside
/// the box is pushed out through the nearest face.
#[must_use]
pub fn sphere_box_hit(
    collider: Entity,
    centre: Vec3,
    radius: f32,
    box_centre: Vec3,
    half_extents: Vec3,
) -> Option<OverlapHit> {
    let min = box_centre - half_extents;
    let max = box_centre + half_extents;
    let point = centre.clamp(min, max);
    let offset = centre - point;
    let distance_sq = offset.length_squared();
    if distance_sq > radius * radius {
        return None;
    }
    if distance_sq > 0.0 {
        let distance = distance_sq.sqrt();
        return Some(OverlapHit {
            collider,
            point,
            normal: offset / distance,
            penetration: radius - distance,
        });
    }

    // Inside: exit through the face with the smallest clearance.
    let below = centre - min;
    let above = max - centre;
    let faces = [
        (above.x, Vec3::X),
        (below.x, Vec3::NEG_X),
        (above.y, Vec3::Y),
        (below.y, Vec3::NEG_Y),
        (above.z, Vec3::Z),
        (below.z, Vec3::NEG_Z),
    ];
    let (clearance, normal) = faces
        .into_iter()
        .fold((f32::INFINITY, Vec3::Y), |best, face| {
            if face.0 < best.0 {
                face
            } else {
                best
            }
        });
    Some(OverlapHit {
        collider,
        point: centre + normal * clearance,
        normal,
        penetration: radius + clearance,
    })
}

/// Exclusive system feeding every actor's overlaps to the dispatcher.
///
/// Positions are sampled once before any hook runs, so a teleport during one
/// actor's dispatch does not change what other actors touch this tick.
pub fn overlap_system(world: &mut World, mut scratch: Local<OverlapScratch>) {
    let delta_time = tick_duration(world);
    let OverlapScratch {
        volumes,
        actors,
        hits,
    } = &mut *scratch;

    volumes.clear();
    let mut volume_query =
        world.query_filtered::<(Entity, &Transform, &ProcessorVolume), With<MapProcessor>>();
    volumes.extend(
        volume_query
            .iter(world)
            .map(|(entity, transform, volume)| VolumeSnapshot {
                entity,
                centre: transform.translation,
                half_extents: volume.half_extents,
            }),
    );
    volumes.sort_unstable_by_key(|volume| volume.entity);

    actors.clear();
    let mut actor_query = world
        .query_filtered::<(Entity, &Transform, Option<&CollisionRadius>), With<KinematicState>>();
    actors.extend(actor_query.iter(world).map(|(entity, transform, radius)| {
        (
            entity,
            transform.translation,
            radius.map_or(DEFAULT_ACTOR_RADIUS, |r| **r),
        )
    }));
    actors.sort_unstable_by_key(|(entity, ..)| *entity);

    for (actor, centre, radius) in actors.iter().copied() {
        hits.clear();
        hits.extend(volumes.iter().filter_map(|volume| {
            sphere_box_hit(
                volume.entity,
                centre,
                radius,
                volume.centre,
                volume.half_extents,
            )
        }));
        process_overlaps(world, actor, hits, delta_time);
    }
}
