//! Card identity, rank and point value.
//!
//! A `Card` never changes after the deck is built. Where a card currently
//! lives is tracked separately by the zone manager.

use serde::{Deserialize, Serialize};

/// Unique identifier for a physical card in the deck.
///
/// Ids are dense, `0..deck_size`, allocated when the deck is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// One of the 13 card ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks, Ace first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Point value of this rank. Ace scores 0, court cards 11-13.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Rank::Ace => 0,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
        }
    }

    /// Short face label ("A", "2".."10", "J", "Q", "K").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Point value for a rank. Total and pure.
///
/// ```
/// use cabo_engine::cards::{rank_to_points, Rank};
///
/// assert_eq!(rank_to_points(Rank::Ace), 0);
/// assert_eq!(rank_to_points(Rank::Seven), 7);
/// assert_eq!(rank_to_points(Rank::King), 13);
/// ```
#[must_use]
pub const fn rank_to_points(rank: Rank) -> u32 {
    rank.points()
}

/// An immutable physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub rank: Rank,
}

impl Card {
    #[must_use]
    pub const fn new(id: CardId, rank: Rank) -> Self {
        Self { id, rank }
    }

    #[must_use]
    pub const fn point_value(&self) -> u32 {
        self.rank.points()
    }
}
