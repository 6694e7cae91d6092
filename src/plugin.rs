//! Bevy plugin wiring the simulation into the fixed-tick schedule.

use bevy::prelude::*;
use log::info;

use crate::gameplay::GameplayData;
use crate::input::player_input_system;
use crate::movement::movement_system;
use crate::npc::npc_system;
use crate::overlap::overlap_system;
use crate::platform::{
    detach_riders_on_remove, forget_rider_on_remove, platform_update_system, reset_riders_on_add,
};
use crate::processor::before_move_system;
use crate::random::DeterministicRng;
use crate::settings::SimulationSettings;

/// Ordered phases of one simulation tick in [`FixedUpdate`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Player input and NPC steering.
    Input,
    /// Platform motion and rider carry.
    Platforms,
    /// Overlap detection and enter/exit dispatch.
    Overlaps,
    /// Processor `before_move` stage.
    BeforeMove,
    /// Movement integration.
    Movement,
}

/// Installs the simulation resources, observers and systems.
///
/// Resources already present in the app (for example settings inserted
/// before the plugin) are kept.
#[derive(Debug, Default)]
pub struct KccSimPlugin;

impl Plugin for KccSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationSettings>();
        let seed = app.world().resource::<SimulationSettings>().seed;
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(seed));
        }
        app.init_resource::<GameplayData>();

        app.add_observer(reset_riders_on_add);
        app.add_observer(detach_riders_on_remove);
        app.add_observer(forget_rider_on_remove);

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Input,
                SimulationSet::Platforms,
                SimulationSet::Overlaps,
                SimulationSet::BeforeMove,
                SimulationSet::Movement,
            )
                .chain(),
        );
        app.add_systems(
            FixedUpdate,
            (
                (player_input_system, npc_system)
                    .chain()
                    .in_set(SimulationSet::Input),
                platform_update_system.in_set(SimulationSet::Platforms),
                overlap_system.in_set(SimulationSet::Overlaps),
                before_move_system.in_set(SimulationSet::BeforeMove),
                movement_system.in_set(SimulationSet::Movement),
            ),
        );
        info!("simulation plugin installed with seed {seed}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::KinematicState;
    use rstest::rstest;

    #[rstest]
    fn preinserted_settings_seed_the_rng() {
        let mut app = App::new();
        app.insert_resource(SimulationSettings {
            seed: 42,
            ..SimulationSettings::default()
        });
        app.add_plugins(KccSimPlugin);
        assert_eq!(
            app.world().resource::<DeterministicRng>(),
            &DeterministicRng::new(42)
        );
    }

    #[rstest]
    fn fixed_tick_moves_falling_actor() {
        let mut app = App::new();
        app.add_plugins(KccSimPlugin);
        let actor = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 10.0, 0.0),
                KinematicState::default(),
                crate::processor::ActorProcessors(vec![crate::processor::ProcessorKind::Environment]),
            ))
            .id();
        app.world_mut().run_schedule(FixedUpdate);
        let height = app
            .world()
            .get::<Transform>(actor)
            .map(|t| t.translation.y)
            .expect("actor keeps its transform");
        assert!(height < 10.0);
    }
}
