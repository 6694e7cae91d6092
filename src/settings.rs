//! Simulation-wide tuning stored as a world resource.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_GRAVITY, DEFAULT_RNG_SEED, DEFAULT_TICK_DURATION};

/// Fixed-tick parameters shared by every system.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Seconds per tick.
    pub tick_duration: f32,
    /// Gravity along Y for newly spawned actors.
    pub gravity: f32,
    /// Seed for [`crate::DeterministicRng`].
    pub seed: u32,
    /// Height of the flat ground used by the movement integrator.
    pub ground_height: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_duration: DEFAULT_TICK_DURATION,
            gravity: DEFAULT_GRAVITY,
            seed: DEFAULT_RNG_SEED,
            ground_height: 0.0,
        }
    }
}

impl SimulationSettings {
    /// Gravity as an acceleration vector.
    #[must_use]
    pub const fn gravity_vector(&self) -> Vec3 {
        Vec3::new(0.0, self.gravity, 0.0)
    }
}

/// Tick duration from [`SimulationSettings`], falling back to the default.
#[must_use]
pub fn tick_duration(world: &World) -> f32 {
    world
        .get_resource::<SimulationSettings>()
        .map_or(DEFAULT_TICK_DURATION, |settings| settings.tick_duration)
}
