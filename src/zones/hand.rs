//! Per-player hand: covered slots, the drawn card, and the pending-match buffer.
//!
//! Slots keep their order for the whole round. Cards that leave a hand
//! (matched discards) close the gap; cards that are exchanged (swaps) take
//! over the slot of the card they replace.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::PlayerId;

/// Who can currently see a slot's rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Hidden from everyone, owner included.
    Covered,
    /// Shown to one player only (peek, spy, regard).
    RevealedTo(PlayerId),
    /// Flipped face up for everyone (pending matched discard).
    FaceUp,
}

impl Visibility {
    /// Can `viewer` see the rank?
    #[must_use]
    pub fn visible_to(self, viewer: PlayerId) -> bool {
        match self {
            Visibility::Covered => false,
            Visibility::RevealedTo(p) => p == viewer,
            Visibility::FaceUp => true,
        }
    }
}

/// One card position in a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub card: CardId,
    pub visibility: Visibility,
}

impl Slot {
    #[must_use]
    pub const fn covered(card: CardId) -> Self {
        Self {
            card,
            visibility: Visibility::Covered,
        }
    }

    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.visibility == Visibility::Covered
    }
}

/// Pending-match buffer. Rarely more than a handful of cards.
pub type MatchBuffer = SmallVec<[CardId; 4]>;

/// A player's hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    slots: Vector<Slot>,
    drawn: Option<CardId>,
    pending_match: MatchBuffer,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Slots ===

    /// All slots in table order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Card ids in slot order.
    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.slots.iter().map(|s| s.card)
    }

    /// Number of cards held in slots (the drawn card is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots currently covered.
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_covered()).count()
    }

    /// Slot index of a card, if held here.
    #[must_use]
    pub fn position(&self, card: CardId) -> Option<usize> {
        self.slots.iter().position(|s| s.card == card)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.position(card).is_some()
    }

    #[must_use]
    pub fn slot(&self, card: CardId) -> Option<&Slot> {
        self.position(card).and_then(|i| self.slots.get(i))
    }

    /// Append a covered card.
    pub fn push(&mut self, card: CardId) {
        self.slots.push_back(Slot::covered(card));
    }

    /// Remove a card, closing the gap. Returns its former slot index.
    pub fn remove(&mut self, card: CardId) -> Option<usize> {
        let index = self.position(card)?;
        self.slots.remove(index);
        Some(index)
    }

    /// Put `new` in the slot held by `old`, covered. Returns the slot index.
    pub fn replace(&mut self, old: CardId, new: CardId) -> Option<usize> {
        let index = self.position(old)?;
        self.replace_at(index, new);
        Some(index)
    }

    /// Put `card` in slot `index`, covered. Out-of-range indices are ignored.
    pub fn replace_at(&mut self, index: usize, card: CardId) {
        if index < self.slots.len() {
            self.slots.set(index, Slot::covered(card));
        }
    }

    /// Change the visibility of a held card. Returns false if not held.
    pub fn set_visibility(&mut self, card: CardId, visibility: Visibility) -> bool {
        match self.position(card) {
            Some(index) => {
                self.slots.set(
                    index,
                    Slot {
                        card,
                        visibility,
                    },
                );
                true
            }
            None => false,
        }
    }

    /// Cover every slot.
    pub fn cover_all(&mut self) {
        self.slots = self.slots.iter().map(|s| Slot::covered(s.card)).collect();
    }

    // === Drawn card ===

    #[must_use]
    pub fn drawn(&self) -> Option<CardId> {
        self.drawn
    }

    pub fn set_drawn(&mut self, card: Option<CardId>) {
        self.drawn = card;
    }

    pub fn take_drawn(&mut self) -> Option<CardId> {
        self.drawn.take()
    }

    // === Pending-match buffer ===

    /// Cards flipped so far in a matched-discard attempt, in tap order.
    #[must_use]
    pub fn pending_match(&self) -> &[CardId] {
        &self.pending_match
    }

    pub fn push_pending(&mut self, card: CardId) {
        self.pending_match.push(card);
    }

    pub fn take_pending(&mut self) -> MatchBuffer {
        std::mem::take(&mut self.pending_match)
    }
}
