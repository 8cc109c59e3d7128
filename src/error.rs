//! Centralized error types for the simulation core.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

/// Main error type for the simulation core.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur while the simulation runs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),
}

/// Errors raised by state machine setup and transitions.
///
/// These are fatal to the offending machine and should surface during
/// setup or testing rather than be absorbed at runtime.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("State already registered: {0}")]
    DuplicateState(String),

    #[error("Unknown state: {0}")]
    UnknownState(String),
}

/// Errors related to the animation playback surface.
#[derive(thiserror::Error, Debug)]
pub enum AnimationError {
    // A missing clip means asset loading finished without resolving every
    // clip a state requires, which is a precondition violation.
    #[error("Missing animation clip: {0}")]
    MissingClip(String),
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
