//! Session lifecycle: the shared countdown, start and expiry signals.
//!
//! One session context lives exactly as long as a game session and
//! replaces the globals the page layer would otherwise hold: the countdown
//! clock, the doll-visible timer slot, and the suicide-strategy counter.

use bevy_ecs::event::{Event, EventWriter};
use bevy_ecs::query::With;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use bevy_ecs::world::World;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::audio::{AudioEvent, Sound};
use crate::constants::COUNTDOWN_START;
use crate::error::GameResult;
use crate::fsm::StateMachine;
use crate::systems::behavior::Steering;
use crate::systems::components::{DeltaTime, Doll, Npc, Orientation, Position, Velocity};
use crate::systems::doll::{DollCtx, DollState};
use crate::systems::input::InputFlags;
use crate::systems::player::{PlayerCtx, PlayerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Entities are spawned but the countdown has not begun.
    Pending,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The countdown ran out.
    TimeUp,
    /// The human runner was eliminated.
    PlayerEliminated,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Ended(SessionOutcome),
}

/// Session-wide shared state, owned by the game and passed to the systems
/// that need it.
#[derive(Resource, Debug)]
pub struct SessionContext {
    pub phase: SessionPhase,
    /// Seconds remaining; runs from the start value down through -1.
    pub countdown: i32,
    /// The value the doll and careful seekers read; written once per
    /// simulated second, consumed by the doll when a phase toggle fires.
    pub doll_timer: Option<i32>,
    /// Sticky flag set when the countdown passes below zero.
    pub countdown_expired: bool,
    /// How many runners drew the wander-to-death strategy.
    pub suiciders: u8,
    accumulator: f32,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Pending,
            countdown: COUNTDOWN_START,
            doll_timer: None,
            countdown_expired: false,
            suiciders: 0,
            accumulator: 0.0,
        }
    }
}

/// Advances the session clock: accumulates tick time and, once per
/// simulated second, publishes the countdown to the doll-visible slot and
/// decrements it. Passing below zero stops the song and ends the session.
///
/// Ticks are expected to stay under one simulated second. A longer tick
/// writes each elapsed value in turn and only the last one stays visible
/// to the doll, so intermediate toggles collapse into at most one.
pub fn session_system(
    time: Res<DeltaTime>,
    mut session: ResMut<SessionContext>,
    mut events: EventWriter<SessionEvent>,
    mut audio: EventWriter<AudioEvent>,
) {
    if session.phase != SessionPhase::Running {
        return;
    }

    session.accumulator += time.seconds;
    while session.accumulator >= 1.0 {
        session.accumulator -= 1.0;
        session.doll_timer = Some(session.countdown);
        debug!(countdown = session.countdown, "Countdown tick");
        session.countdown -= 1;
        if session.countdown < 0 {
            session.countdown_expired = true;
            session.phase = SessionPhase::Ended;
            audio.write(AudioEvent::Stop(Sound::Song));
            events.write(SessionEvent::Ended(SessionOutcome::TimeUp));
            info!("Countdown finished");
            break;
        }
    }
}

/// Starts a pending session: the countdown begins, the doll shows green,
/// every AI runner's strategy activates simultaneously, and the song
/// plays.
pub fn start_session(world: &mut World) -> GameResult<()> {
    {
        let mut session = world.resource_mut::<SessionContext>();
        if session.phase != SessionPhase::Pending {
            return Ok(());
        }
        session.phase = SessionPhase::Running;
    }

    let mut dolls = world.query_filtered::<(
        bevy_ecs::entity::Entity,
        &mut StateMachine<DollState>,
        &mut Orientation,
        &Position,
    ), With<Doll>>();
    if let Ok((doll, mut machine, mut orientation, position)) = dolls.single_mut(world) {
        let mut outbox = SmallVec::new();
        let mut ctx = DollCtx {
            doll,
            position: position.0,
            orientation: &mut orientation,
            roster: &[],
            outbox: &mut outbox,
        };
        machine.change_to(DollState::GreenLight, &mut ctx)?;
    }

    let mut npcs = world.query_filtered::<(
        &mut Steering,
        &mut StateMachine<PlayerState>,
        &mut Velocity,
        &mut Orientation,
        &mut crate::animation::AnimationSet,
        &Position,
    ), With<Npc>>();
    let mut activated = 0usize;
    for (mut steering, mut machine, mut velocity, mut orientation, mut animations, position) in npcs.iter_mut(world) {
        steering.active = true;
        let mut ctx = PlayerCtx {
            position: position.0,
            velocity: &mut *velocity,
            orientation: &mut *orientation,
            animations: &mut *animations,
            input: InputFlags::empty(),
            controlled: false,
        };
        machine.change_to(PlayerState::Run, &mut ctx)?;
        activated += 1;
    }

    world.send_event(AudioEvent::Play(Sound::Song));
    world.send_event(SessionEvent::Started);
    info!(activated, "Session started");
    Ok(())
}
