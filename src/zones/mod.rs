//! Card containers: piles, hands, and the location index.
//!
//! ## Key Types
//!
//! - `Location`: The container a card belongs to
//! - `ZoneManager`: Card location tracking and movement
//! - `Hand`: A player's slots, drawn card and pending-match buffer
//! - `CardMove`: Relocation command emitted for every move

pub mod hand;
pub mod manager;

pub use hand::{Hand, MatchBuffer, Slot, Visibility};
pub use manager::{CardMove, Location, MoveJournal, ZoneManager};
