//! The state machine and its observer surface.
//!
//! ## Key Types
//!
//! - `Engine`: Owns the game state and applies intents
//! - `Table`: Cards, seats and last-round progress, cloned per transition
//! - `StateObserver`: Receives each committed transition

pub mod machine;
pub mod observer;
pub mod table;

pub use machine::Engine;
pub use observer::{ObserverId, ObserverList, StateChange, StateObserver};
pub use table::{LastRound, Table};
