//! Core engine types: players, intents, state, errors, RNG, configuration.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod intent;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use intent::{Intent, IntentRecord, InteractionKind, PileId};
pub use state::{CardAction, GameState, InGameState, Interaction, PreGameState};
