//! AI steering strategies and their random assignment.
//!
//! Each AI runner is given exactly one strategy at spawn: seek the finish
//! head-down, seek it only while the light allows, or wander obliviously.
//! A session-wide counter caps the wander strategy at five runners; once
//! saturated, the draw is restricted to the two seek strategies.
//! Strategies are inert until the session starts and activation puts every
//! owner into RUN at once.

use bevy_ecs::component::Component;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::error;

use crate::constants::{CAUTION_TICK, PHASE_PERIOD, SEEK_TARGET_Z, WANDER_JITTER};
use crate::fsm::StateMachine;
use crate::session::SessionContext;
use crate::systems::components::{DeltaTime, Doll, MaxSpeed, Npc, Orientation, Position, SessionRng, Velocity};
use crate::systems::doll::DollState;
use crate::systems::input::InputFlags;
use crate::systems::player::{PlayerCtx, PlayerState};

/// A movement strategy. The wander variant carries its heading angle; the
/// seek variants are stateless beyond their target.
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Seeks the target regardless of phase. Dies at the first red light.
    DirectSeek { target: Vec3 },
    /// Seeks only while the doll shows green and the countdown is not one
    /// tick from a possible flip; otherwise halts and idles.
    ConditionalSeek { target: Vec3 },
    /// Wanders with a jittered heading, ignoring the light entirely.
    SuicideWander { heading: f32 },
}

/// Steering slot of an AI runner: one strategy, active or not. Inactive
/// steering contributes no velocity.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Steering {
    pub behavior: Behavior,
    pub active: bool,
}

impl Steering {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            active: false,
        }
    }

    /// Drops the strategy from consideration; used on elimination and on
    /// crossing the finish line.
    pub fn clear(&mut self) {
        self.active = false;
    }
}

/// Draws a strategy for a runner spawned at `spawn`, uniformly over the
/// variants still allowed by the suicide cap.
pub fn assign_behavior(rng: &mut SmallRng, session: &mut SessionContext, spawn: Vec3) -> Behavior {
    let target = Vec3::new(spawn.x, spawn.y, SEEK_TARGET_Z);
    let upper = if session.suiciders < crate::constants::MAX_SUICIDERS {
        2
    } else {
        1
    };
    match rng.random_range(0..=upper) {
        0 => Behavior::DirectSeek { target },
        1 => Behavior::ConditionalSeek { target },
        _ => {
            session.suiciders += 1;
            Behavior::SuicideWander {
                heading: rng.random_range(0.0..std::f32::consts::TAU),
            }
        }
    }
}

/// Classic seek: steer toward the velocity that points straight at the
/// target at full speed.
fn seek_force(position: Vec3, velocity: Vec3, target: Vec3, max_speed: f32) -> Vec3 {
    let desired = (target - position).normalize_or_zero() * max_speed;
    desired - velocity
}

/// The doll phase data the conditional strategy reads.
#[derive(Debug, Clone, Copy)]
struct PhaseView {
    phase: Option<DollState>,
    timer: Option<i32>,
}

impl PhaseView {
    /// Whether a careful runner considers movement safe right now. A
    /// missing timer value counts as safe, matching the consumed-slot
    /// behavior of the phase toggle.
    fn safe_to_move(&self) -> bool {
        self.phase == Some(DollState::GreenLight) && self.timer.map_or(true, |t| t % PHASE_PERIOD != CAUTION_TICK)
    }
}

/// Applies every active strategy's velocity contribution, conditioned on
/// the doll's phase and the shared countdown.
pub fn steering_system(
    time: Res<DeltaTime>,
    session: Res<SessionContext>,
    mut rng: ResMut<SessionRng>,
    dolls: Query<&StateMachine<DollState>, With<Doll>>,
    mut npcs: Query<
        (
            &mut Steering,
            &mut StateMachine<PlayerState>,
            &mut Velocity,
            &mut Orientation,
            &mut crate::animation::AnimationSet,
            &Position,
            &MaxSpeed,
        ),
        (With<Npc>, Without<Doll>),
    >,
) {
    let view = PhaseView {
        phase: dolls.single().ok().and_then(|machine| machine.current()),
        timer: session.doll_timer,
    };

    for (mut steering, mut machine, mut velocity, mut orientation, mut animations, position, max_speed) in npcs.iter_mut() {
        if !steering.active {
            continue;
        }

        let force = match &mut steering.behavior {
            Behavior::DirectSeek { target } => seek_force(position.0, velocity.0, *target, max_speed.0),
            Behavior::ConditionalSeek { target } => {
                let mut ctx = PlayerCtx {
                    position: position.0,
                    velocity: &mut *velocity,
                    orientation: &mut *orientation,
                    animations: &mut *animations,
                    input: InputFlags::empty(),
                    controlled: false,
                };
                if view.safe_to_move() {
                    if !machine.is_in(PlayerState::Run) {
                        if let Err(err) = machine.change_to(PlayerState::Run, &mut ctx) {
                            error!(%err, "Conditional seeker failed to resume running");
                        }
                    }
                    seek_force(position.0, ctx.velocity.0, *target, max_speed.0)
                } else {
                    if !machine.is_in(PlayerState::Idle) {
                        if let Err(err) = machine.change_to(PlayerState::Idle, &mut ctx) {
                            error!(%err, "Conditional seeker failed to halt");
                        }
                        ctx.velocity.0 = Vec3::ZERO;
                    }
                    Vec3::ZERO
                }
            }
            Behavior::SuicideWander { heading } => {
                *heading += rng.0.random_range(-1.0..=1.0) * WANDER_JITTER * time.seconds;
                let direction = Vec3::new(heading.sin(), 0.0, heading.cos());
                direction * max_speed.0 - velocity.0
            }
        };

        velocity.0 += force * time.seconds;
    }
}
