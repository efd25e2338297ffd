//! Engine error taxonomy.
//!
//! Every error is returned to the caller; the engine never partially applies
//! a transition that fails.

use thiserror::Error;

use super::intent::Intent;
use super::state::GameState;
use crate::cards::CardId;
use crate::zones::Location;

/// Errors returned by the engine and its card model.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The intent is not a valid edge from the current state.
    #[error("{intent:?} is not legal in {state:?}")]
    IllegalTransition { state: GameState, intent: Intent },

    /// A pile ran out while dealing or drawing.
    #[error("requested {requested} cards but only {available} remain")]
    InsufficientCards { requested: usize, available: usize },

    /// An intent referenced a card that is not where the rules require it.
    #[error("{card} is not in {expected}")]
    CardNotInSource { card: CardId, expected: Location },

    /// Registration or dealing with too few or too many players.
    #[error("{count} players registered, expected {min}..={max}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },

    /// The engine configuration cannot produce a playable round.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// True for errors that leave the round playable (the caller may retry
    /// with a different intent).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EngineError::InvalidConfig(_))
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
