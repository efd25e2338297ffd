//! Card model: identity, rank, point value, and the deck.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for a physical card
//! - `Rank`: Ace..King with a fixed point table
//! - `Card`: Immutable id + rank pair
//! - `Deck`: Every card used in a round, indexed by id

pub mod card;
pub mod deck;

pub use card::{rank_to_points, Card, CardId, Rank};
pub use deck::Deck;
