//! Red-light-green-light simulation library crate.

pub mod animation;
pub mod audio;
pub mod constants;
pub mod error;
pub mod fsm;
pub mod game;
pub mod session;
pub mod systems;
