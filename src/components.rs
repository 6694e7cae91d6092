//! ECS component types used by the simulation.
//! Includes player ownership, per-tick input records, NPC navigation state and
//! collision sizes shared between systems.
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_ACTOR_RADIUS;

/// Identifier of a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerRef(pub u32);

/// Marks the avatar entity controlled by a player.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    /// Owning player.
    pub player_ref: PlayerRef,
}

/// Per-tick input record delivered by the input collection layer.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Planar move direction; x strafes right, y moves forward.
    pub move_direction: Vec2,
    /// Look change this tick as (pitch, yaw) in radians.
    pub look_delta: Vec2,
    /// Jump held.
    pub jump: bool,
    /// Sprint held.
    pub sprint: bool,
}

/// Roaming NPC navigation state.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Npc {
    /// Waypoint the NPC walks to, if any.
    pub target_position: Option<Vec3>,
    /// Position recorded at the last progress check.
    pub check_position: Vec3,
    /// Seconds since the last observed progress.
    pub check_time: f32,
}

/// Radius of an actor's collision sphere used by overlap queries.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct CollisionRadius(pub f32);

impl Default for CollisionRadius {
    fn default() -> Self {
        Self(DEFAULT_ACTOR_RADIUS)
    }
}

/// Destination marker carrying no data beyond its `Transform`.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct NavigationTarget;

/// Marker for map waypoints that platforms travel between.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct Waypoint;

/// Marker for the render-only twin of a platform.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct PlatformVisual;
