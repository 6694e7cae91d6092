//! Routes overlap changes and the `before_move` stage to processors.
//!
//! Both entry points operate on one actor at a time with exclusive world
//! access. The actor's [`ProcessorRegistry`] is moved out of the world while
//! hooks run so processors can freely borrow other components.

use std::cmp::Reverse;

use bevy::prelude::*;
use log::debug;

use super::{
    ActorProcessors, MapProcessor, OverlapHit, Processor, ProcessorContext, ProcessorInfo,
    ProcessorKind, ProcessorRegistry, StageInfo,
};
use crate::kinematics::KinematicState;
use crate::numeric::priority_key;
use crate::settings::tick_duration;

fn take_registry(world: &mut World, actor: Entity) -> ProcessorRegistry {
    world
        .get_mut::<ProcessorRegistry>(actor)
        .map(|mut registry| std::mem::take(&mut *registry))
        .unwrap_or_default()
}

fn restore_registry(world: &mut World, actor: Entity, registry: ProcessorRegistry) {
    if let Some(mut slot) = world.get_mut::<ProcessorRegistry>(actor) {
        *slot = registry;
    } else if let Ok(mut entity) = world.get_entity_mut(actor) {
        entity.insert(registry);
    }
}

fn sort_by_priority(
    world: &mut World,
    actor: Entity,
    delta_time: f32,
    entries: &mut [(ProcessorKind, ProcessorInfo)],
) {
    let ctx = ProcessorContext::new(world, actor, delta_time);
    // Stable sort keeps insertion order for equal priorities.
    entries.sort_by_cached_key(|(kind, info)| Reverse(priority_key(kind.priority(&ctx, info))));
}

/// Applies this tick's overlap set for `actor`.
///
/// Registrations whose source is no longer touched receive `on_exit` and
/// are closed once it returns `true`. Newly touched sources receive
/// `on_enter` in descending priority; a declined source is not retried
/// until its overlap ends.
pub fn process_overlaps(world: &mut World, actor: Entity, hits: &[OverlapHit], delta_time: f32) {
    let mut registry = take_registry(world, actor);
    let touching: Vec<Entity> = hits.iter().map(|hit| hit.collider).collect();

    let previous = std::mem::take(&mut registry.registrations);
    for mut registration in previous {
        if touching.contains(&registration.source) {
            registration.exiting = false;
            registry.registrations.push(registration);
            continue;
        }
        let info = ProcessorInfo::from_source(registration.source);
        let mut ctx = ProcessorContext::new(world, actor, delta_time);
        if registration.kind.on_exit(&mut ctx, &info) {
            debug!("{actor} closed interaction with {}", registration.source);
        } else {
            registration.exiting = true;
            registry.registrations.push(registration);
        }
    }
    registry.declined.retain(|source| touching.contains(source));

    let mut entering: Vec<(ProcessorKind, ProcessorInfo)> = Vec::new();
    let mut hits_by_source: Vec<(Entity, OverlapHit)> = Vec::new();
    for hit in hits {
        let source = hit.collider;
        if registry.is_active(source)
            || registry.is_declined(source)
            || hits_by_source.iter().any(|(seen, _)| *seen == source)
        {
            continue;
        }
        let Some(kind) = world.get::<MapProcessor>(source).map(|processor| **processor) else {
            continue;
        };
        hits_by_source.push((source, *hit));
        entering.push((kind, ProcessorInfo::from_source(source)));
    }
    sort_by_priority(world, actor, delta_time, &mut entering);

    for (kind, info) in entering {
        let Some(source) = info.source else {
            continue;
        };
        let Some(hit) = hits_by_source
            .iter()
            .find(|(seen, _)| *seen == source)
            .map(|(_, hit)| *hit)
        else {
            continue;
        };
        let mut ctx = ProcessorContext::new(world, actor, delta_time);
        if kind.on_enter(&mut ctx, &info, &hit) {
            debug!("{actor} entered {kind:?} at {source}");
            registry.register(source, kind);
        } else {
            debug!("{kind:?} at {source} declined {actor}");
            registry.declined.push(source);
        }
    }

    restore_registry(world, actor, registry);
}

/// Runs `before_move` for every active processor of `actor`.
///
/// Actor-attached processors come first, then map registrations in
/// registration order; the combined list is then ordered by descending
/// priority. Once a processor suppresses the stage no further hooks run.
/// The transient accumulators are zero afterwards whichever processors ran.
pub fn run_before_move(world: &mut World, actor: Entity, delta_time: f32) -> StageInfo {
    let mut entries: Vec<(ProcessorKind, ProcessorInfo)> = world
        .get::<ActorProcessors>(actor)
        .map(|processors| {
            processors
                .iter()
                .map(|kind| (*kind, ProcessorInfo::default()))
                .collect()
        })
        .unwrap_or_default();
    if let Some(registry) = world.get::<ProcessorRegistry>(actor) {
        entries.extend(
            registry
                .registrations()
                .iter()
                .map(|r| (r.kind, ProcessorInfo::from_source(r.source))),
        );
    }
    sort_by_priority(world, actor, delta_time, &mut entries);

    let mut stage = StageInfo::default();
    for (kind, info) in entries {
        if stage.is_suppressed() {
            break;
        }
        let mut ctx = ProcessorContext::new(world, actor, delta_time);
        kind.before_move(&mut ctx, &info, &mut stage);
    }

    if let Some(mut kcc) = world.get_mut::<KinematicState>(actor) {
        kcc.clear_transients();
    }
    stage
}

/// Exclusive system running [`run_before_move`] for every actor in
/// ascending entity order.
pub fn before_move_system(world: &mut World) {
    let delta_time = tick_duration(world);
    let mut query = world.query_filtered::<Entity, With<KinematicState>>();
    let mut actors: Vec<Entity> = query.iter(world).collect();
    actors.sort_unstable();
    for actor in actors {
        run_before_move(world, actor, delta_time);
    }
}
