use serde::{Deserialize, Serialize};

use super::{Processor, ProcessorContext, ProcessorInfo, StageInfo};
use crate::components::PlayerInput;
use crate::{AIR_SPRINT_MULTIPLIER, MIN_SPRINT_INPUT_MAGNITUDE, SPRINT_SPEED, WALK_SPEED};

/// Chooses the actor's kinematic speed from its sprint input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintProcessor {
    /// Speed without sprint.
    pub walk_speed: f32,
    /// Speed with sprint held on the ground.
    pub sprint_speed: f32,
    /// Scale applied to `sprint_speed` while airborne.
    pub air_multiplier: f32,
    /// Minimum input length for sprint to take effect.
    pub min_input_magnitude: f32,
}

impl Default for SprintProcessor {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            sprint_speed: SPRINT_SPEED,
            air_multiplier: AIR_SPRINT_MULTIPLIER,
            min_input_magnitude: MIN_SPRINT_INPUT_MAGNITUDE,
        }
    }
}

impl SprintProcessor {
    /// Target speed for the given input state.
    #[must_use]
    pub const fn target_speed(&self, sprint: bool, input_magnitude: f32, grounded: bool) -> f32 {
        if !sprint || input_magnitude < self.min_input_magnitude {
            return self.walk_speed;
        }
        if grounded {
            self.sprint_speed
        } else {
            self.sprint_speed * self.air_multiplier
        }
    }
}

impl Processor for SprintProcessor {
    fn before_move(
        &self,
        ctx: &mut ProcessorContext<'_>,
        _info: &ProcessorInfo,
        _stage: &mut StageInfo,
    ) {
        let Some(sprint) = ctx
            .world()
            .get::<PlayerInput>(ctx.entity())
            .map(|input| input.sprint)
        else {
            return;
        };
        if let Some(mut kcc) = ctx.kcc_mut() {
            let speed = self.target_speed(sprint, kcc.input_direction.length(), kcc.is_grounded);
            kcc.kinematic_speed = speed;
        }
    }
}
