//! Generic finite-state machine owned by simulated entities.
//!
//! States are closed enums dispatched through the [`State`] trait rather
//! than an inheritance chain; the machine tracks which variants have been
//! registered so that requesting an unregistered state is a configuration
//! error, not a silent no-op.

use std::fmt;

use bevy_ecs::component::Component;
use smallvec::SmallVec;

use crate::error::{ConfigurationError, GameResult};

/// Behavior contract shared by every state a machine can hold.
///
/// `Ctx` is the view of the owning entity a state is allowed to touch.
/// `execute` returns the successor state it wants, if any; the machine
/// applies it through [`StateMachine::change_to`], so requesting the state
/// that is already current remains an idempotent no-op and transitions
/// cannot re-enter themselves.
pub trait State: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    type Ctx<'a>;

    fn enter(&self, _ctx: &mut Self::Ctx<'_>, _previous: Option<Self>) -> GameResult<()> {
        Ok(())
    }

    fn execute(&self, _ctx: &mut Self::Ctx<'_>) -> GameResult<Option<Self>> {
        Ok(None)
    }

    fn exit(&self, _ctx: &mut Self::Ctx<'_>) -> GameResult<()> {
        Ok(())
    }
}

/// Per-entity state container: a registered set of states plus the current
/// and previous selections. Transitions are the only way either changes.
#[derive(Component, Debug, Clone)]
pub struct StateMachine<S: State> {
    states: SmallVec<[S; 5]>,
    current: Option<S>,
    previous: Option<S>,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateMachine<S> {
    pub fn new() -> Self {
        Self {
            states: SmallVec::new(),
            current: None,
            previous: None,
        }
    }

    /// Registers a state. Registering the same state twice is an error;
    /// surfacing the mistake during setup beats silently overwriting.
    pub fn add(&mut self, state: S) -> GameResult<()> {
        if self.states.contains(&state) {
            return Err(ConfigurationError::DuplicateState(state.to_string()).into());
        }
        self.states.push(state);
        Ok(())
    }

    /// Transitions to `target`, running `exit` on the current state and
    /// `enter` on the new one. A transition to the state that is already
    /// current is an idempotent no-op: no callbacks fire and `previous`
    /// is left untouched.
    pub fn change_to(&mut self, target: S, ctx: &mut S::Ctx<'_>) -> GameResult<()> {
        if !self.states.contains(&target) {
            return Err(ConfigurationError::UnknownState(target.to_string()).into());
        }
        if self.current == Some(target) {
            return Ok(());
        }
        if let Some(current) = self.current {
            current.exit(ctx)?;
        }
        self.previous = self.current;
        self.current = Some(target);
        target.enter(ctx, self.previous)
    }

    /// Runs the current state's `execute`, applying any requested
    /// transition. No-op while no state has been entered yet.
    pub fn update(&mut self, ctx: &mut S::Ctx<'_>) -> GameResult<()> {
        if let Some(current) = self.current {
            if let Some(next) = current.execute(ctx)? {
                self.change_to(next, ctx)?;
            }
        }
        Ok(())
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    /// Whether the machine is currently in `state`.
    pub fn is_in(&self, state: S) -> bool {
        self.current == Some(state)
    }
}
