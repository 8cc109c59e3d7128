//! Simulation systems and their components.

pub mod behavior;
pub mod components;
pub mod doll;
pub mod finish_line;
pub mod input;
pub mod messaging;
pub mod movement;
pub mod player;

pub use behavior::{assign_behavior, steering_system, Behavior, Steering};
pub use components::{
    DeltaTime, Doll, MaxSpeed, Name, Npc, NpcBundle, Orientation, PlayerControlled, Position, Runner, RunnerBundle,
    SessionRng, Soldier, SoldierBundle, Velocity,
};
pub use doll::{doll_system, DollCtx, DollState, RosterEntry};
pub use finish_line::{finish_line_system, FinishLine, TriggerRegion};
pub use input::{player_control_system, InputFlags, InputState};
pub use messaging::{deliver, Message, MessageTag};
pub use movement::movement_system;
pub use player::{player_state_system, PlayerCtx, PlayerState};
