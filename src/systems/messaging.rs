//! Directed message delivery between entities.
//!
//! Delivery is synchronous and same-tick: [`deliver`] mutates the receiver
//! immediately, with no queue and no cross-tick delay. Only the "hit"
//! elimination tag exists. A message addressed to an entity that is no
//! longer in the population is dropped silently; sweeps operate on
//! population snapshots that can never name a non-member.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::Query;
use strum_macros::Display;
use tracing::{debug, error, trace};

use crate::animation::AnimationSet;
use crate::audio::{AudioEvent, Sound};
use crate::fsm::StateMachine;
use crate::session::{SessionContext, SessionEvent, SessionOutcome, SessionPhase};
use crate::systems::behavior::Steering;
use crate::systems::components::{Doll, Orientation, PlayerControlled, Position, Runner, Velocity};
use crate::systems::input::InputFlags;
use crate::systems::player::{PlayerCtx, PlayerState};

/// Message tags. Only elimination exists today.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum MessageTag {
    Hit,
}

/// A directed, payload-free message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub sender: Entity,
    pub receiver: Entity,
    pub tag: MessageTag,
}

impl Message {
    pub fn hit(sender: Entity, receiver: Entity) -> Self {
        Self {
            sender,
            receiver,
            tag: MessageTag::Hit,
        }
    }
}

/// Query data for the runner population as seen by message delivery.
pub type RunnerData = (
    Entity,
    &'static mut StateMachine<PlayerState>,
    &'static mut Velocity,
    &'static mut Orientation,
    &'static mut AnimationSet,
    &'static Position,
    Option<&'static mut Steering>,
    Option<&'static PlayerControlled>,
);

/// Filter for the runner population (the doll is never a receiver).
pub type RunnerFilter = (With<Runner>, Without<Doll>);

/// Delivers a message to its receiver, synchronously.
///
/// Receiving "hit" moves the runner to DEAD and deactivates its steering
/// strategy; for the human runner it additionally ends the session. Each
/// delivered hit fires one gunfire cue.
pub fn deliver(
    message: &Message,
    runners: &mut Query<RunnerData, RunnerFilter>,
    session: &mut SessionContext,
    audio: &mut EventWriter<AudioEvent>,
    session_events: &mut EventWriter<SessionEvent>,
) {
    let Ok((entity, mut machine, mut velocity, mut orientation, mut animations, position, steering, controlled)) =
        runners.get_mut(message.receiver)
    else {
        trace!(receiver = ?message.receiver, tag = %message.tag, "Receiver not in population, dropping message");
        return;
    };

    match message.tag {
        MessageTag::Hit => {
            let controlled = controlled.is_some();
            let mut ctx = PlayerCtx {
                position: position.0,
                velocity: &mut *velocity,
                orientation: &mut *orientation,
                animations: &mut *animations,
                input: InputFlags::empty(),
                controlled,
            };
            if let Err(err) = machine.change_to(PlayerState::Dead, &mut ctx) {
                error!(%err, ?entity, "Hit transition failed");
                return;
            }
            if let Some(mut steering) = steering {
                steering.clear();
            }
            audio.write(AudioEvent::Play(Sound::Gunfire));
            if controlled && session.phase != SessionPhase::Ended {
                session.phase = SessionPhase::Ended;
                session_events.write(SessionEvent::Ended(SessionOutcome::PlayerEliminated));
            }
            debug!(?entity, controlled, "Runner eliminated");
        }
    }
}
