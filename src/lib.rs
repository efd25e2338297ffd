//! # cabo-engine
//!
//! Rules engine for Cabo-style card games: every player holds a row of
//! face-down cards, draws from a shared pile, and tries to end the round with
//! the lowest total.
//!
//! ## Design Principles
//!
//! 1. **Intents In, Transitions Out**: The presentation layer reports discrete
//!    intents (`Intent`). The engine answers with a new `GameState` and the
//!    card relocations it caused. It never renders, animates or waits.
//!
//! 2. **Exactly-Once Transitions**: Each intent is applied to an O(1) clone of
//!    the table and committed only if every step succeeds. A rejected intent
//!    leaves state, cards and history untouched.
//!
//! 3. **Explicit Ownership**: Every card is in exactly one container (a pile,
//!    a hand slot, or a player's drawn slot), tracked by an id → location
//!    index.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im` vectors and maps for piles, hands
//!   and the location index, so snapshots are cheap.
//!
//! - **Deterministic Randomness**: A seeded ChaCha8 RNG shuffles the deck
//!   and picks the first player. A seed plus `history()` replays a game.
//!
//! ## Modules
//!
//! - `core`: Players, intents, state, errors, RNG, configuration
//! - `cards`: Card identity, rank, point value, deck
//! - `zones`: Piles, hands and card movement
//! - `rules`: Action table, interaction resolution, scoring
//! - `engine`: The state machine and observers

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    GameRng, GameRngState,
    EngineConfig, EngineError, Result,
    Intent, IntentRecord, InteractionKind, PileId,
    GameState, PreGameState, InGameState, Interaction, CardAction,
};

pub use crate::cards::{rank_to_points, Card, CardId, Deck, Rank};

pub use crate::zones::{CardMove, Hand, Location, Visibility, ZoneManager};

pub use crate::rules::{ActionKind, ActionTable, GameResult, PlayerResult};

pub use crate::engine::{Engine, ObserverId, StateChange, StateObserver, Table};
