//! Deterministic character-controller processors and moving platforms.
//!
//! Map geometry carries processors (teleporters, jump pads, platforms) that
//! react when an actor touches them and may rewrite its velocities before
//! movement. Platforms follow waypoints on a fixed tick and carry the actors
//! registered as riders. [`KccSimPlugin`] wires everything into Bevy's
//! `FixedUpdate` schedule.
pub mod components;
pub mod config;
pub mod constants;
pub mod gameplay;
pub mod input;
pub mod kinematics;
pub mod logging;
pub mod movement;
pub mod navigation;
pub mod npc;
pub mod numeric;
pub mod overlap;
pub mod platform;
pub mod plugin;
pub mod processor;
pub mod random;
pub mod settings;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use components::{CollisionRadius, Npc, Player, PlayerInput, PlayerRef};
pub use config::{ConfigError, Scenario};
pub use gameplay::{despawn_player, player_entity, spawn_player, GameplayData};
pub use kinematics::KinematicState;
pub use logging::init as init_logging;
pub use navigation::{resolve_random_target, NavigationSource};
pub use overlap::ProcessorVolume;
pub use platform::{Platform, PlatformDirection, PlatformMotion, Riders};
pub use plugin::{KccSimPlugin, SimulationSet};
pub use processor::{
    ActorProcessors, MapProcessor, Processor, ProcessorKind, ProcessorRegistry, StageInfo,
};
pub use random::DeterministicRng;
pub use settings::SimulationSettings;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use kcc_sim::prelude::*;
    //! ```

    pub use crate::processor::{OverlapHit, ProcessorContext, ProcessorInfo};
    pub use crate::ActorProcessors;
    pub use crate::DeterministicRng;
    pub use crate::KccSimPlugin;
    pub use crate::KinematicState;
    pub use crate::MapProcessor;
    pub use crate::Platform;
    pub use crate::PlatformMotion;
    pub use crate::Processor;
    pub use crate::ProcessorKind;
    pub use crate::ProcessorRegistry;
    pub use crate::Scenario;
    pub use crate::SimulationSet;
    pub use crate::SimulationSettings;
}
