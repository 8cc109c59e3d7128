//! The runner state set: IDLE, WALK, RUN, DANCE and DEAD.
//!
//! Each state couples an animation clip to movement semantics. Transitions
//! driven by the input snapshot only apply to the human runner; AI runners
//! ignore input entirely and are moved between states by their steering
//! strategy or by elimination messages.

use bevy_ecs::system::{Query, Res};
use glam::Vec3;
use strum_macros::{Display, EnumIter};
use tracing::error;

use crate::animation::{AnimationSet, LoopMode};
use crate::constants::{BLEND_DURATION, DOLL_RED_FOCUS};
use crate::error::GameResult;
use crate::fsm::{State, StateMachine};
use crate::systems::components::{Orientation, PlayerControlled, Position, Velocity};
use crate::systems::input::{InputFlags, InputState};

/// The view of a runner a state is allowed to touch.
pub struct PlayerCtx<'a> {
    pub position: Vec3,
    pub velocity: &'a mut Velocity,
    pub orientation: &'a mut Orientation,
    pub animations: &'a mut AnimationSet,
    /// Input snapshot; empty for AI runners.
    pub input: InputFlags,
    /// Whether this runner is the human-controlled one.
    pub controlled: bool,
}

#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerState {
    Idle,
    Walk,
    Run,
    Dance,
    Dead,
}

impl State for PlayerState {
    type Ctx<'a> = PlayerCtx<'a>;

    fn enter(&self, ctx: &mut Self::Ctx<'_>, previous: Option<Self>) -> GameResult<()> {
        match self {
            PlayerState::Idle => {
                if let Some(previous) = previous {
                    ctx.animations.cross_fade(previous, *self, BLEND_DURATION, false)?;
                }
                ctx.animations.clip_mut(*self)?.enabled = true;
            }
            PlayerState::Walk => {
                if let Some(previous) = previous {
                    let sync = previous == PlayerState::Run;
                    ctx.animations.cross_fade(previous, *self, BLEND_DURATION, sync)?;
                }
            }
            PlayerState::Run => {
                if let Some(previous) = previous {
                    let sync = previous == PlayerState::Walk;
                    ctx.animations.cross_fade(previous, *self, BLEND_DURATION, sync)?;
                }
            }
            PlayerState::Dance => {
                ctx.velocity.0 = Vec3::ZERO;
                ctx.orientation.face_toward(ctx.position, DOLL_RED_FOCUS);
                if let Some(previous) = previous {
                    let sync = matches!(previous, PlayerState::Walk | PlayerState::Run);
                    ctx.animations.cross_fade(previous, *self, BLEND_DURATION, sync)?;
                }
            }
            PlayerState::Dead => {
                ctx.velocity.0 = Vec3::ZERO;
                if let Some(previous) = previous {
                    ctx.animations.cross_fade(previous, *self, BLEND_DURATION, false)?;
                }
                let clip = ctx.animations.clip_mut(*self)?;
                clip.loop_mode = LoopMode::Once;
                clip.clamp_when_finished = true;
            }
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut Self::Ctx<'_>) -> GameResult<Option<Self>> {
        // DANCE and DEAD are terminal; AI runners ignore the input snapshot
        // entirely and stay where their steering strategy put them.
        if !ctx.controlled {
            return Ok(None);
        }
        let next = match self {
            PlayerState::Idle if ctx.input.any_direction() => Some(PlayerState::Walk),
            PlayerState::Walk => {
                if ctx.input.any_direction() {
                    ctx.input.contains(InputFlags::SHIFT).then_some(PlayerState::Run)
                } else {
                    Some(PlayerState::Idle)
                }
            }
            PlayerState::Run => {
                if ctx.input.any_direction() {
                    (!ctx.input.contains(InputFlags::SHIFT)).then_some(PlayerState::Walk)
                } else {
                    Some(PlayerState::Idle)
                }
            }
            _ => None,
        };
        Ok(next)
    }
}

/// Runs every runner's (and soldier's) state machine once per tick.
pub fn player_state_system(
    input: Res<InputState>,
    mut agents: Query<(
        &mut StateMachine<PlayerState>,
        &mut Velocity,
        &mut Orientation,
        &mut AnimationSet,
        &Position,
        Option<&PlayerControlled>,
    )>,
) {
    for (mut machine, mut velocity, mut orientation, mut animations, position, controlled) in agents.iter_mut() {
        let controlled = controlled.is_some();
        let mut ctx = PlayerCtx {
            position: position.0,
            velocity: &mut *velocity,
            orientation: &mut *orientation,
            animations: &mut *animations,
            input: if controlled { input.flags } else { InputFlags::empty() },
            controlled,
        };
        if let Err(err) = machine.update(&mut ctx) {
            error!(%err, "Runner state update failed");
        }
    }
}
