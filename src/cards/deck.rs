//! The deck: every physical card in play for a round.
//!
//! Card ids are dense, so lookups are a plain index into a `Vec`.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, Rank};

/// Immutable set of cards used for a round.
///
/// ## Example
///
/// ```
/// use cabo_engine::cards::{Deck, Rank, CardId};
///
/// let deck = Deck::standard(4);
/// assert_eq!(deck.len(), 52);
/// assert_eq!(deck.rank(CardId::new(0)), Some(Rank::Ace));
///
/// let stacked = Deck::from_ranks(&[Rank::King, Rank::Seven]);
/// assert_eq!(stacked.rank(CardId::new(1)), Some(Rank::Seven));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// `copies_per_rank` copies of each of the 13 ranks, Ace first.
    #[must_use]
    pub fn standard(copies_per_rank: usize) -> Self {
        let ranks: Vec<Rank> = Rank::ALL
            .iter()
            .flat_map(|&rank| std::iter::repeat(rank).take(copies_per_rank))
            .collect();
        Self::from_ranks(&ranks)
    }

    /// A deck with exactly these ranks, ids assigned in order.
    ///
    /// The draw pile is built bottom to top in id order, so the last rank
    /// here is the first card dealt when the deck is not shuffled.
    #[must_use]
    pub fn from_ranks(ranks: &[Rank]) -> Self {
        let cards = ranks
            .iter()
            .enumerate()
            .map(|(i, &rank)| Card::new(CardId::new(i as u32), rank))
            .collect();
        Self { cards }
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.raw() as usize)
    }

    /// Rank of a card, or `None` for an id outside this deck.
    #[must_use]
    pub fn rank(&self, id: CardId) -> Option<Rank> {
        self.get(id).map(|c| c.rank)
    }

    /// Point value of a card; unknown ids score 0.
    #[must_use]
    pub fn points(&self, id: CardId) -> u32 {
        self.get(id).map_or(0, Card::point_value)
    }

    /// Check if a card ID belongs to this deck.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        (id.raw() as usize) < self.cards.len()
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All card ids in id order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|c| c.id)
    }

    /// Iterate over all cards.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
