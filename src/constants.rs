//! Simulation constants shared across systems.
//!
//! Defaults for [`crate::SimulationSettings`] and the processor tuning values
//! live here so tests and the scenario loader agree on the same numbers.

/// Fixed tick duration in seconds (60 ticks per second).
pub const DEFAULT_TICK_DURATION: f32 = 1.0 / 60.0;
/// Default gravity acceleration along the Y axis.
pub const DEFAULT_GRAVITY: f32 = -20.0;
/// Seed used when a scenario does not provide one.
pub const DEFAULT_RNG_SEED: u32 = 0x5EED_1234;

/// Priority given to processors that do not override it.
pub const DEFAULT_PRIORITY: f32 = 0.0;
/// Jump pads run before everything else so they can suppress gravity.
pub const JUMP_PAD_PRIORITY: f32 = 1000.0;

/// Normal walking speed.
pub const WALK_SPEED: f32 = 8.0;
/// Speed while sprinting on the ground.
pub const SPRINT_SPEED: f32 = 12.0;
/// Scale applied to sprint speed while airborne.
pub const AIR_SPRINT_MULTIPLIER: f32 = 0.5;
/// Minimum input magnitude required to sprint.
pub const MIN_SPRINT_INPUT_MAGNITUDE: f32 = 0.5;
/// Upward impulse applied when a grounded actor jumps.
pub const JUMP_IMPULSE: f32 = 6.0;

/// Default collision radius for actors without an explicit one.
pub const DEFAULT_ACTOR_RADIUS: f32 = 0.5;

/// Seconds an NPC may be stalled before it tries jumping.
pub const NPC_JUMP_AFTER: f32 = 1.0;
/// Seconds an NPC may be stalled before it picks a new waypoint.
pub const NPC_RETARGET_AFTER: f32 = 5.0;
/// Planar squared distance that counts as progress for stuck detection.
pub const NPC_PROGRESS_DISTANCE_SQ: f32 = 1.0;
/// Planar squared distance at which an NPC considers its waypoint reached.
pub const NPC_ARRIVAL_DISTANCE_SQ: f32 = 1.0;
/// Kinematic speed used by roaming NPCs.
pub const NPC_SPEED: f32 = 4.0;
/// Vertical impulse of an NPC unstick jump.
pub const NPC_JUMP_IMPULSE: f32 = 5.0;

/// Distances at or below this are treated as zero by the platform traversal.
pub const DISTANCE_EPSILON: f32 = 1e-6;

/// Fraction of horizontal dynamic velocity lost per tick while grounded.
pub const GROUND_FRICTION: f32 = 0.1;
/// Look pitch is clamped to this magnitude (just under straight up/down).
pub const MAX_LOOK_PITCH: f32 = 1.553_343;
