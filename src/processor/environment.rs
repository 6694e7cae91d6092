use super::{Processor, ProcessorContext, ProcessorInfo, StageInfo};

/// Applies gravity and the external accumulators, then derives the
/// kinematic velocity from the input direction.
///
/// Attach it to an actor's [`super::ActorProcessors`]; higher-priority
/// processors such as jump pads suppress it while they own the motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentProcessor;

impl Processor for EnvironmentProcessor {
    fn before_move(
        &self,
        ctx: &mut ProcessorContext<'_>,
        _info: &ProcessorInfo,
        _stage: &mut StageInfo,
    ) {
        let delta_time = ctx.delta_time();
        let Some(mut kcc) = ctx.kcc_mut() else {
            return;
        };
        if kcc.is_grounded && kcc.dynamic_velocity.y < 0.0 {
            kcc.dynamic_velocity.y = 0.0;
        }
        let acceleration = kcc.gravity + kcc.external_force;
        let impulse = kcc.external_impulse;
        let delta = kcc.external_delta;
        kcc.dynamic_velocity += acceleration * delta_time + impulse;
        kcc.pending_translation += delta;
        kcc.kinematic_velocity = kcc.input_direction.normalize_or_zero() * kcc.kinematic_speed;
        kcc.clear_transients();
    }
}
