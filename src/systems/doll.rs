//! The doll's phase controller: GREEN_LIGHT, RED_LIGHT and ELIMINATE_ALL.
//!
//! The doll never self-schedules. The session driver writes the shared
//! countdown once per simulated second; every multiple of the phase period
//! toggles green and red, and countdown expiry is the sole, one-way
//! trigger into the final sweep.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::With;
use bevy_ecs::system::{Query, ResMut};
use glam::Vec3;
use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};
use tracing::{debug, error, info};

use crate::audio::AudioEvent;
use crate::constants::{DOLL_GREEN_FOCUS, DOLL_RED_FOCUS, PHASE_PERIOD};
use crate::error::GameResult;
use crate::fsm::{State, StateMachine};
use crate::session::{SessionContext, SessionEvent};
use crate::systems::components::{Doll, Orientation, Position};
use crate::systems::messaging::{self, Message, RunnerData, RunnerFilter};
use crate::systems::player::PlayerState;

/// One runner as seen by a sweep: a snapshot taken at the start of the
/// doll's update, not a live view.
#[derive(Debug, Clone, Copy)]
pub struct RosterEntry {
    pub entity: Entity,
    pub state: Option<PlayerState>,
}

/// The view of the world a doll state is allowed to touch: its own
/// orientation, the runner snapshot, and an outbox for hit messages.
pub struct DollCtx<'a> {
    pub doll: Entity,
    pub position: Vec3,
    pub orientation: &'a mut Orientation,
    pub roster: &'a [RosterEntry],
    pub outbox: &'a mut SmallVec<[Message; 16]>,
}

#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DollState {
    GreenLight,
    RedLight,
    EliminateAll,
}

/// Queues a hit for every runner caught in WALK or RUN.
fn scan_for_moving(ctx: &mut DollCtx<'_>) {
    for entry in ctx.roster {
        if matches!(entry.state, Some(PlayerState::Walk | PlayerState::Run)) {
            ctx.outbox.push(Message::hit(ctx.doll, entry.entity));
        }
    }
}

/// Queues a hit for every runner that has neither died nor finished.
fn scan_for_survivors(ctx: &mut DollCtx<'_>) {
    for entry in ctx.roster {
        if !matches!(entry.state, Some(PlayerState::Dead | PlayerState::Dance)) {
            ctx.outbox.push(Message::hit(ctx.doll, entry.entity));
        }
    }
}

impl State for DollState {
    type Ctx<'a> = DollCtx<'a>;

    fn enter(&self, ctx: &mut Self::Ctx<'_>, _previous: Option<Self>) -> GameResult<()> {
        match self {
            DollState::GreenLight => {
                ctx.orientation.face_toward(ctx.position, DOLL_GREEN_FOCUS);
            }
            DollState::RedLight => {
                ctx.orientation.face_toward(ctx.position, DOLL_RED_FOCUS);
                scan_for_moving(ctx);
            }
            DollState::EliminateAll => {
                ctx.orientation.face_toward(ctx.position, DOLL_RED_FOCUS);
                scan_for_survivors(ctx);
            }
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut Self::Ctx<'_>) -> GameResult<Option<Self>> {
        match self {
            DollState::GreenLight => {}
            DollState::RedLight => scan_for_moving(ctx),
            DollState::EliminateAll => scan_for_survivors(ctx),
        }
        Ok(None)
    }
}

/// Advances the doll: applies the timer-driven phase toggle (consuming the
/// timer slot so one countdown value toggles at most once), runs the
/// machine, and delivers any queued hits synchronously.
pub fn doll_system(
    mut session: ResMut<SessionContext>,
    mut dolls: Query<(Entity, &mut StateMachine<DollState>, &mut Orientation, &Position), With<Doll>>,
    mut runners: Query<RunnerData, RunnerFilter>,
    mut audio: EventWriter<AudioEvent>,
    mut session_events: EventWriter<SessionEvent>,
) {
    let Ok((doll, mut machine, mut orientation, position)) = dolls.single_mut() else {
        return;
    };

    let roster: Vec<RosterEntry> = runners
        .iter()
        .map(|(entity, machine, ..)| RosterEntry {
            entity,
            state: machine.current(),
        })
        .collect();

    let mut outbox: SmallVec<[Message; 16]> = SmallVec::new();
    {
        let mut ctx = DollCtx {
            doll,
            position: position.0,
            orientation: &mut orientation,
            roster: &roster,
            outbox: &mut outbox,
        };

        let result = if session.countdown_expired && !machine.is_in(DollState::EliminateAll) {
            info!("Countdown expired, doll eliminating all remaining runners");
            machine.change_to(DollState::EliminateAll, &mut ctx)
        } else {
            match (machine.current(), session.doll_timer) {
                (Some(state @ (DollState::GreenLight | DollState::RedLight)), Some(timer))
                    if timer % PHASE_PERIOD == 0 =>
                {
                    session.doll_timer = None;
                    let next = match state {
                        DollState::GreenLight => DollState::RedLight,
                        _ => DollState::GreenLight,
                    };
                    debug!(timer, from = %state, to = %next, "Doll phase toggled");
                    machine.change_to(next, &mut ctx)
                }
                _ => Ok(()),
            }
        };
        if let Err(err) = result {
            error!(%err, "Doll transition failed");
        }

        if let Err(err) = machine.update(&mut ctx) {
            error!(%err, "Doll state update failed");
        }
    }

    // A toggle tick scans on both enter and execute, so the same receiver
    // can be queued twice. Each runner takes at most one hit.
    let mut hit: SmallVec<[Entity; 16]> = SmallVec::new();
    for message in outbox.drain(..) {
        if hit.contains(&message.receiver) {
            continue;
        }
        hit.push(message.receiver);
        messaging::deliver(&message, &mut runners, &mut *session, &mut audio, &mut session_events);
    }
}
