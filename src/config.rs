//! Scenario files describing a map and its actors.
//!
//! A scenario is a JSON document with simulation settings, spawn points,
//! NPC waypoints, moving platforms, trigger volumes (teleporters, jump pads)
//! and the actors to create. Vectors are `[x, y, z]` arrays and facings are
//! yaw angles in degrees.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{NavigationTarget, Npc, PlatformVisual, PlayerRef, Waypoint};
use crate::gameplay::{actor_bundle, spawn_player, GameplayData, SpawnPointData, WaypointData};
use crate::kinematics::KinematicState;
use crate::navigation::NavigationSource;
use crate::overlap::ProcessorVolume;
use crate::platform::{Platform, PlatformDirection, PlatformMotion};
use crate::processor::{MapProcessor, ProcessorKind};
use crate::random::DeterministicRng;
use crate::settings::SimulationSettings;

/// Errors raised while loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The document is not valid scenario JSON.
    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The tick duration is zero, negative or not finite.
    #[error("tick duration must be positive, got {0}")]
    TickDuration(f32),
    /// A platform starts at a waypoint it does not have.
    #[error("platform {platform} starts at waypoint {index} but has {count}")]
    StartWaypoint {
        /// Index of the platform in the scenario.
        platform: usize,
        /// Configured starting index.
        index: usize,
        /// Number of waypoints.
        count: usize,
    },
    /// A platform speed or delay is negative or not finite.
    #[error("platform {platform} has invalid {field} {value}")]
    PlatformValue {
        /// Index of the platform in the scenario.
        platform: usize,
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A trigger uses a processor that needs a platform.
    #[error("trigger {trigger} uses a platform processor; declare it under `platforms`")]
    PlatformTrigger {
        /// Index of the trigger in the scenario.
        trigger: usize,
    },
}

/// Pose with a facing given as yaw in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Position.
    pub position: [f32; 3],
    /// Facing about +Y, degrees.
    pub yaw: f32,
}

impl PoseConfig {
    fn transform(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.position))
            .with_rotation(Quat::from_rotation_y(self.yaw.to_radians()))
    }
}

/// Moving platform description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Initial position.
    pub position: [f32; 3],
    /// Waypoint positions in travel order.
    pub waypoints: Vec<[f32; 3]>,
    /// Index of the first waypoint approached.
    pub start_waypoint: usize,
    /// Initial travel direction.
    pub direction: PlatformDirection,
    /// Units per second.
    pub speed: f32,
    /// Dwell time at each reversal.
    pub delay: f32,
    /// Half size of the rider trigger volume.
    pub half_extents: [f32; 3],
    /// Spawn a render-only twin.
    pub visual: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            waypoints: Vec::new(),
            start_waypoint: 0,
            direction: PlatformDirection::Forward,
            speed: 1.0,
            delay: 0.0,
            half_extents: [1.0, 0.5, 1.0],
            visual: false,
        }
    }
}

/// Trigger volume bound to a processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Processor run when an actor touches the volume.
    pub processor: ProcessorKind,
    /// Volume centre.
    pub position: [f32; 3],
    /// Half size of the volume.
    #[serde(default = "default_half_extents")]
    pub half_extents: [f32; 3],
    /// Navigation destinations.
    #[serde(default)]
    pub targets: Vec<PoseConfig>,
}

const fn default_half_extents() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

/// Complete scenario document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Tick and world parameters.
    pub settings: SimulationSettings,
    /// Player spawn poses.
    pub spawn_points: Vec<PoseConfig>,
    /// NPC roaming destinations.
    pub waypoints: Vec<[f32; 3]>,
    /// Moving platforms.
    pub platforms: Vec<PlatformConfig>,
    /// Teleporters, jump pads and other trigger volumes.
    pub triggers: Vec<TriggerConfig>,
    /// Players to spawn at random spawn points.
    pub players: Vec<u32>,
    /// Starting positions of roaming NPCs.
    pub npcs: Vec<[f32; 3]>,
}

impl Scenario {
    /// Reads and validates a scenario file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, parsed or
    /// validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_json(&text)?;
        info!("loaded scenario {}", path.display());
        Ok(scenario)
    }

    /// Parses and validates a scenario document.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the document is malformed or invalid.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Checks the invariants the simulation relies on.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tick = self.settings.tick_duration;
        if !(tick.is_finite() && tick > 0.0) {
            return Err(ConfigError::TickDuration(tick));
        }
        for (platform, config) in self.platforms.iter().enumerate() {
            for (field, value) in [("speed", config.speed), ("delay", config.delay)] {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(ConfigError::PlatformValue {
                        platform,
                        field,
                        value,
                    });
                }
            }
            let count = config.waypoints.len();
            if count > 0 && config.start_waypoint >= count {
                return Err(ConfigError::StartWaypoint {
                    platform,
                    index: config.start_waypoint,
                    count,
                });
            }
            if count < 2 {
                warn!("platform {platform} has {count} waypoints and will not move");
            }
        }
        for (trigger, config) in self.triggers.iter().enumerate() {
            if config.processor == ProcessorKind::Platform {
                return Err(ConfigError::PlatformTrigger { trigger });
            }
            if config.targets.is_empty() {
                warn!("trigger {trigger} has no targets and will decline every actor");
            }
        }
        Ok(())
    }

    /// Populates `world` with the scenario's resources and entities.
    pub fn spawn(&self, world: &mut World) {
        world.insert_resource(self.settings);
        world.insert_resource(DeterministicRng::new(self.settings.seed));
        world.insert_resource(GameplayData {
            spawn_points: self
                .spawn_points
                .iter()
                .map(|pose| {
                    let transform = pose.transform();
                    SpawnPointData {
                        position: transform.translation,
                        rotation: transform.rotation,
                    }
                })
                .collect(),
            waypoints: self
                .waypoints
                .iter()
                .map(|position| WaypointData {
                    position: Vec3::from_array(*position),
                })
                .collect(),
        });

        for config in &self.platforms {
            spawn_platform(world, config);
        }
        for config in &self.triggers {
            spawn_trigger(world, config);
        }

        let gravity = self.settings.gravity_vector();
        for position in &self.npcs {
            world.spawn((
                actor_bundle(
                    Transform::from_translation(Vec3::from_array(*position)),
                    KinematicState::with_gravity(gravity),
                    vec![ProcessorKind::Environment],
                ),
                Npc::default(),
            ));
        }
        for player in &self.players {
            spawn_player(world, PlayerRef(*player));
        }
    }
}

fn spawn_platform(world: &mut World, config: &PlatformConfig) -> Entity {
    let waypoints: Vec<Entity> = config
        .waypoints
        .iter()
        .map(|position| {
            world
                .spawn((Transform::from_translation(Vec3::from_array(*position)), Waypoint))
                .id()
        })
        .collect();
    let position = Vec3::from_array(config.position);
    let visual = config.visual.then(|| {
        world
            .spawn((Transform::from_translation(position), PlatformVisual))
            .id()
    });
    let motion = PlatformMotion {
        current_waypoint: config.start_waypoint,
        direction: config.direction,
        speed: config.speed,
        delay: config.delay,
        current_delay: 0.0,
    };
    let mut platform = Platform::new(waypoints, motion);
    platform.visual = visual;
    world
        .spawn((
            Transform::from_translation(position),
            platform,
            MapProcessor(ProcessorKind::Platform),
            ProcessorVolume::new(Vec3::from_array(config.half_extents)),
        ))
        .id()
}

fn spawn_trigger(world: &mut World, config: &TriggerConfig) -> Entity {
    let targets: Vec<Entity> = config
        .targets
        .iter()
        .map(|pose| world.spawn((pose.transform(), NavigationTarget)).id())
        .collect();
    world
        .spawn((
            Transform::from_translation(Vec3::from_array(config.position)),
            MapProcessor(config.processor),
            ProcessorVolume::new(Vec3::from_array(config.half_extents)),
            NavigationSource::new(targets),
        ))
        .id()
}
