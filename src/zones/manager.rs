//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` is the owning-container index for every card in play:
//! - Two ordered piles (draw, discard), top = last element
//! - One `Hand` per seat (slots + drawn card)
//! - A card → `Location` map for O(1) membership lookup
//!
//! Every successful move is appended to a journal of `CardMove`s. The engine
//! drains it after each committed transition and hands the moves to
//! observers as relocation commands.
//!
//! All containers are `im` persistent structures, so cloning the manager is
//! O(1). The engine applies each transition to a clone and keeps it only if
//! the transition succeeds.

use std::hash::BuildHasherDefault;

use im::{HashMap as ImHashMap, Vector};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::hand::{Hand, Visibility};
use crate::cards::{CardId, Deck};
use crate::core::{EngineError, GameRng, PileId, PlayerId, PlayerMap, Result};

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// The container a card currently belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    DrawPile,
    DiscardPile,
    /// A covered slot in a player's hand.
    Hand(PlayerId),
    /// Held as a player's drawn card.
    Drawn(PlayerId),
}

impl From<PileId> for Location {
    fn from(pile: PileId) -> Self {
        match pile {
            PileId::Draw => Location::DrawPile,
            PileId::Discard => Location::DiscardPile,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::DrawPile => f.write_str("draw pile"),
            Location::DiscardPile => f.write_str("discard pile"),
            Location::Hand(p) => write!(f, "hand of {p}"),
            Location::Drawn(p) => write!(f, "drawn slot of {p}"),
        }
    }
}

/// A relocation command for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardMove {
    pub card: CardId,
    /// `None` when the card enters play (stocking the draw pile).
    pub from: Option<Location>,
    pub to: Location,
}

/// Moves made during one transition.
pub type MoveJournal = SmallVec<[CardMove; 4]>;

/// Tracks where every card is and moves cards between containers.
///
/// ## Usage
///
/// ```
/// use cabo_engine::cards::Deck;
/// use cabo_engine::core::{PileId, PlayerId};
/// use cabo_engine::zones::{Location, ZoneManager};
///
/// let deck = Deck::standard(4);
/// let mut zones = ZoneManager::new();
/// zones.stock(&deck);
/// zones.seat_players(2);
///
/// let p0 = PlayerId::new(0);
/// zones.deal_into_hand(p0, 4).unwrap();
/// assert_eq!(zones.hand(p0).map(|h| h.len()), Some(4));
///
/// let drawn = zones.draw(p0, PileId::Draw).unwrap();
/// assert_eq!(zones.location(drawn), Some(Location::Drawn(p0)));
/// assert!(zones.check_conservation(&deck));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    /// Card locations: card_id -> container
    locations: ImHashMap<CardId, Location, FxBuildHasher>,

    /// Draw pile, bottom to top.
    draw_pile: Vector<CardId>,

    /// Discard pile, bottom to top.
    discard_pile: Vector<CardId>,

    hands: PlayerMap<Hand>,

    journal: MoveJournal,
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every card and hand.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Put every card of `deck` into the draw pile in id order.
    ///
    /// Cards already tracked are left where they are.
    pub fn stock(&mut self, deck: &Deck) {
        for id in deck.ids() {
            if self.locations.contains_key(&id) {
                continue;
            }
            self.locations.insert(id, Location::DrawPile);
            self.draw_pile.push_back(id);
            self.journal.push(CardMove {
                card: id,
                from: None,
                to: Location::DrawPile,
            });
        }
    }

    /// Create one empty hand per seat, discarding any previous hands.
    pub fn seat_players(&mut self, player_count: usize) {
        self.hands = PlayerMap::with_default(player_count);
    }

    /// Number of seated hands.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.player_count()
    }

    /// Shuffle the draw pile.
    pub fn shuffle_draw_pile(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<CardId> = self.draw_pile.iter().copied().collect();
        rng.shuffle(&mut cards);
        self.draw_pile = cards.into_iter().collect();
    }

    // === Queries ===

    /// Get the container a card is in.
    #[must_use]
    pub fn location(&self, card: CardId) -> Option<Location> {
        self.locations.get(&card).copied()
    }

    /// Check if a card is in a specific container.
    #[must_use]
    pub fn is_in(&self, card: CardId, location: Location) -> bool {
        self.location(card) == Some(location)
    }

    /// Cards of a pile, bottom to top.
    #[must_use]
    pub fn pile(&self, pile: PileId) -> &Vector<CardId> {
        match pile {
            PileId::Draw => &self.draw_pile,
            PileId::Discard => &self.discard_pile,
        }
    }

    /// Top card of a pile.
    #[must_use]
    pub fn top(&self, pile: PileId) -> Option<CardId> {
        self.pile(pile).back().copied()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Option<&Hand> {
        self.hands.get(player)
    }

    pub fn hand_mut(&mut self, player: PlayerId) -> Option<&mut Hand> {
        self.hands.get_mut(player)
    }

    /// All hands in seat order.
    pub fn hands(&self) -> impl Iterator<Item = (PlayerId, &Hand)> {
        self.hands.iter()
    }

    /// Get total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    /// Visibility of a card held in a hand slot.
    #[must_use]
    pub fn visibility(&self, card: CardId) -> Option<Visibility> {
        match self.location(card)? {
            Location::Hand(owner) => self.hand(owner)?.slot(card).map(|s| s.visibility),
            _ => None,
        }
    }

    // === Movement ===

    /// Remove and return the top `n` cards of a pile, top first.
    ///
    /// The returned cards are untracked until placed again; callers place
    /// them before the transition ends. Nothing is removed on error.
    pub fn deal(&mut self, pile: PileId, n: usize) -> Result<Vec<CardId>> {
        let source = match pile {
            PileId::Draw => &mut self.draw_pile,
            PileId::Discard => &mut self.discard_pile,
        };
        if source.len() < n {
            return Err(EngineError::InsufficientCards {
                requested: n,
                available: source.len(),
            });
        }
        let mut dealt = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(card) = source.pop_back() {
                self.locations.remove(&card);
                dealt.push(card);
            }
        }
        Ok(dealt)
    }

    /// Deal `n` covered cards from the draw pile into a player's hand.
    pub fn deal_into_hand(&mut self, player: PlayerId, n: usize) -> Result<Vec<CardId>> {
        if !self.hands.contains(player) {
            return Err(EngineError::InvalidPlayerCount {
                count: self.hands.player_count(),
                min: player.index() + 1,
                max: usize::from(u8::MAX),
            });
        }
        let dealt = self.deal(PileId::Draw, n)?;
        for &card in &dealt {
            self.place(card, Location::Hand(player));
            self.journal.push(CardMove {
                card,
                from: Some(Location::DrawPile),
                to: Location::Hand(player),
            });
        }
        Ok(dealt)
    }

    /// Draw the top card of `pile` into a player's drawn slot.
    pub fn draw(&mut self, player: PlayerId, pile: PileId) -> Result<CardId> {
        let Some(card) = self.top(pile) else {
            return Err(EngineError::InsufficientCards {
                requested: 1,
                available: 0,
            });
        };
        self.move_card(card, pile.into(), Location::Drawn(player))?;
        Ok(card)
    }

    /// Refill an empty draw pile with every discard but the top one, shuffled.
    ///
    /// Returns the number of cards moved. Does nothing while the draw pile
    /// still holds cards.
    pub fn recycle_discard(&mut self, rng: &mut GameRng) -> usize {
        if !self.draw_pile.is_empty() || self.discard_pile.len() < 2 {
            return 0;
        }
        let top = self.discard_pile.len() - 1;
        // `slice` splits the range off the discard pile.
        let mut recycled: Vec<CardId> = self.discard_pile.slice(..top).into_iter().collect();
        rng.shuffle(&mut recycled);
        for &card in &recycled {
            self.place(card, Location::DrawPile);
            self.journal.push(CardMove {
                card,
                from: Some(Location::DiscardPile),
                to: Location::DrawPile,
            });
        }
        recycled.len()
    }

    /// Move a card from one container to another.
    ///
    /// Fails with `CardNotInSource` if the card is not in `from`.
    /// Cards entering a hand take a new covered slot at the end; cards
    /// entering a pile go on top.
    pub fn move_card(&mut self, card: CardId, from: Location, to: Location) -> Result<()> {
        if !self.is_in(card, from) {
            return Err(EngineError::CardNotInSource {
                card,
                expected: from,
            });
        }
        match to {
            Location::Hand(p) | Location::Drawn(p) if !self.hands.contains(p) => {
                return Err(EngineError::InvalidPlayerCount {
                    count: self.hands.player_count(),
                    min: p.index() + 1,
                    max: usize::from(u8::MAX),
                });
            }
            // One drawn card per player.
            Location::Drawn(p) if self.hand(p).and_then(Hand::drawn).is_some() => {
                return Err(EngineError::CardNotInSource {
                    card,
                    expected: Location::Drawn(p),
                });
            }
            _ => {}
        }
        self.unplace(card, from)?;
        self.place(card, to);
        self.journal.push(CardMove {
            card,
            from: Some(from),
            to,
        });
        Ok(())
    }

    /// Exchange the drawn card with a card in the same player's hand.
    ///
    /// The drawn card takes over the slot (covered); the hand card becomes
    /// the drawn card.
    pub fn swap_with_drawn(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        let index = self.slot_index(player, card)?;
        let hand = &mut self.hands[player];
        let Some(drawn) = hand.drawn() else {
            return Err(EngineError::CardNotInSource {
                card,
                expected: Location::Drawn(player),
            });
        };
        hand.replace_at(index, drawn);
        hand.set_drawn(Some(card));

        self.locations.insert(drawn, Location::Hand(player));
        self.locations.insert(card, Location::Drawn(player));
        self.journal.push(CardMove {
            card: drawn,
            from: Some(Location::Drawn(player)),
            to: Location::Hand(player),
        });
        self.journal.push(CardMove {
            card,
            from: Some(Location::Hand(player)),
            to: Location::Drawn(player),
        });
        Ok(())
    }

    /// Exchange two hand cards in place; each takes the other's slot, covered.
    ///
    /// Works across hands and within one hand.
    pub fn exchange(
        &mut self,
        (owner_a, a): (PlayerId, CardId),
        (owner_b, b): (PlayerId, CardId),
    ) -> Result<()> {
        let index_a = self.slot_index(owner_a, a)?;
        let index_b = self.slot_index(owner_b, b)?;

        self.hands[owner_a].replace_at(index_a, b);
        self.hands[owner_b].replace_at(index_b, a);

        self.locations.insert(a, Location::Hand(owner_b));
        self.locations.insert(b, Location::Hand(owner_a));
        self.journal.push(CardMove {
            card: a,
            from: Some(Location::Hand(owner_a)),
            to: Location::Hand(owner_b),
        });
        self.journal.push(CardMove {
            card: b,
            from: Some(Location::Hand(owner_b)),
            to: Location::Hand(owner_a),
        });
        Ok(())
    }

    /// Change the visibility of a card in `owner`'s hand.
    pub fn set_visibility(
        &mut self,
        owner: PlayerId,
        card: CardId,
        visibility: Visibility,
    ) -> Result<()> {
        self.slot_index(owner, card)?;
        self.hands[owner].set_visibility(card, visibility);
        Ok(())
    }

    /// Drain the moves recorded since the last call.
    pub fn take_journal(&mut self) -> MoveJournal {
        std::mem::take(&mut self.journal)
    }

    // === Invariants ===

    /// Check that every deck card is in exactly one container and that the
    /// location index agrees with the containers.
    #[must_use]
    pub fn check_conservation(&self, deck: &Deck) -> bool {
        let mut seen = vec![0u8; deck.len()];
        let mut count = |card: CardId, expected: Location| -> bool {
            let Some(slot) = seen.get_mut(card.raw() as usize) else {
                return false;
            };
            *slot += 1;
            self.location(card) == Some(expected)
        };

        for &card in &self.draw_pile {
            if !count(card, Location::DrawPile) {
                return false;
            }
        }
        for &card in &self.discard_pile {
            if !count(card, Location::DiscardPile) {
                return false;
            }
        }
        for (player, hand) in self.hands.iter() {
            for card in hand.cards() {
                if !count(card, Location::Hand(player)) {
                    return false;
                }
            }
            if let Some(card) = hand.drawn() {
                if !count(card, Location::Drawn(player)) {
                    return false;
                }
            }
        }

        self.locations.len() == deck.len() && seen.iter().all(|&n| n == 1)
    }

    // === Internals ===

    fn slot_index(&self, owner: PlayerId, card: CardId) -> Result<usize> {
        let not_here = EngineError::CardNotInSource {
            card,
            expected: Location::Hand(owner),
        };
        if !self.is_in(card, Location::Hand(owner)) {
            return Err(not_here);
        }
        self.hand(owner).and_then(|h| h.position(card)).ok_or(not_here)
    }

    fn unplace(&mut self, card: CardId, from: Location) -> Result<()> {
        let removed = match from {
            Location::DrawPile => remove_from_pile(&mut self.draw_pile, card),
            Location::DiscardPile => remove_from_pile(&mut self.discard_pile, card),
            Location::Hand(p) => self.hands.get_mut(p).and_then(|h| h.remove(card)).is_some(),
            Location::Drawn(p) => match self.hands.get_mut(p) {
                Some(hand) if hand.drawn() == Some(card) => hand.take_drawn().is_some(),
                _ => false,
            },
        };
        if removed {
            self.locations.remove(&card);
            Ok(())
        } else {
            Err(EngineError::CardNotInSource {
                card,
                expected: from,
            })
        }
    }

    fn place(&mut self, card: CardId, to: Location) {
        match to {
            Location::DrawPile => self.draw_pile.push_back(card),
            Location::DiscardPile => self.discard_pile.push_back(card),
            Location::Hand(p) => {
                if let Some(hand) = self.hands.get_mut(p) {
                    hand.push(card);
                }
            }
            Location::Drawn(p) => {
                if let Some(hand) = self.hands.get_mut(p) {
                    hand.set_drawn(Some(card));
                }
            }
        }
        self.locations.insert(card, to);
    }
}

fn remove_from_pile(pile: &mut Vector<CardId>, card: CardId) -> bool {
    match pile.iter().position(|&c| c == card) {
        Some(index) => {
            pile.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;

    fn setup(players: usize) -> (Deck, ZoneManager) {
        let deck = Deck::standard(4);
        let mut zones = ZoneManager::new();
        zones.stock(&deck);
        zones.seat_players(players);
        zones.take_journal();
        (deck, zones)
    }

    #[test]
    fn test_stock_fills_draw_pile() {
        let (deck, zones) = setup(2);
        assert_eq!(zones.pile(PileId::Draw).len(), 52);
        assert_eq!(zones.top(PileId::Draw), Some(CardId::new(51)));
        assert_eq!(zones.total_cards(), deck.len());
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_deal_takes_from_top() {
        let (deck, mut zones) = setup(2);
        let p1 = PlayerId::new(1);

        let dealt = zones.deal_into_hand(p1, 3).unwrap();
        assert_eq!(dealt, vec![CardId::new(51), CardId::new(50), CardId::new(49)]);

        let hand: Vec<_> = zones.hand(p1).unwrap().cards().collect();
        assert_eq!(hand, dealt);
        assert_eq!(zones.location(CardId::new(50)), Some(Location::Hand(p1)));
        assert_eq!(zones.take_journal().len(), 3);
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_deal_insufficient_leaves_pile_untouched() {
        let deck = Deck::from_ranks(&[Rank::Ace, Rank::Two]);
        let mut zones = ZoneManager::new();
        zones.stock(&deck);
        zones.seat_players(2);

        let err = zones.deal_into_hand(PlayerId::new(0), 3).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientCards {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(zones.pile(PileId::Draw).len(), 2);
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_move_requires_source() {
        let (deck, mut zones) = setup(2);
        let card = CardId::new(10);

        let err = zones
            .move_card(card, Location::DiscardPile, Location::DrawPile)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::CardNotInSource {
                card,
                expected: Location::DiscardPile
            }
        );

        zones
            .move_card(card, Location::DrawPile, Location::DiscardPile)
            .unwrap();
        assert_eq!(zones.top(PileId::Discard), Some(card));
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_single_drawn_card() {
        let (_, mut zones) = setup(2);
        let p0 = PlayerId::new(0);

        zones.draw(p0, PileId::Draw).unwrap();
        assert!(zones.draw(p0, PileId::Draw).is_err());
        assert_eq!(zones.pile(PileId::Draw).len(), 51);
    }

    #[test]
    fn test_draw_from_empty_pile() {
        let (_, mut zones) = setup(2);
        let err = zones.draw(PlayerId::new(0), PileId::Discard).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientCards { .. }));
    }

    #[test]
    fn test_swap_with_drawn_keeps_slot() {
        let (deck, mut zones) = setup(2);
        let p0 = PlayerId::new(0);
        let dealt = zones.deal_into_hand(p0, 4).unwrap();
        let drawn = zones.draw(p0, PileId::Draw).unwrap();

        zones.swap_with_drawn(p0, dealt[2]).unwrap();

        let hand = zones.hand(p0).unwrap();
        assert_eq!(hand.position(drawn), Some(2));
        assert_eq!(hand.drawn(), Some(dealt[2]));
        assert_eq!(zones.location(dealt[2]), Some(Location::Drawn(p0)));
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_exchange_across_hands() {
        let (deck, mut zones) = setup(2);
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let h0 = zones.deal_into_hand(p0, 4).unwrap();
        let h1 = zones.deal_into_hand(p1, 4).unwrap();

        zones.exchange((p0, h0[1]), (p1, h1[3])).unwrap();

        assert_eq!(zones.hand(p0).unwrap().position(h1[3]), Some(1));
        assert_eq!(zones.hand(p1).unwrap().position(h0[1]), Some(3));
        assert_eq!(zones.location(h0[1]), Some(Location::Hand(p1)));
        assert!(zones.check_conservation(&deck));

        let err = zones.exchange((p0, h0[1]), (p1, h1[0])).unwrap_err();
        assert!(matches!(err, EngineError::CardNotInSource { .. }));
    }

    #[test]
    fn test_visibility() {
        let (_, mut zones) = setup(2);
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let dealt = zones.deal_into_hand(p0, 2).unwrap();

        zones
            .set_visibility(p0, dealt[0], Visibility::RevealedTo(p0))
            .unwrap();
        assert_eq!(zones.visibility(dealt[0]), Some(Visibility::RevealedTo(p0)));
        assert!(zones
            .set_visibility(p1, dealt[0], Visibility::FaceUp)
            .is_err());
        assert_eq!(zones.visibility(CardId::new(0)), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let (deck, mut zones) = setup(2);
        let snapshot = zones.clone();

        zones.deal_into_hand(PlayerId::new(0), 4).unwrap();

        assert_eq!(snapshot.pile(PileId::Draw).len(), 52);
        assert_eq!(zones.pile(PileId::Draw).len(), 48);
        assert!(snapshot.check_conservation(&deck));
    }

    #[test]
    fn test_recycle_discard_keeps_top() {
        let deck = Deck::from_ranks(&[Rank::Ace, Rank::Two, Rank::Three, Rank::Four]);
        let mut zones = ZoneManager::new();
        zones.stock(&deck);
        zones.seat_players(2);
        let mut rng = GameRng::new(3);

        assert_eq!(zones.recycle_discard(&mut rng), 0);
        for id in (0..4).rev() {
            zones
                .move_card(CardId::new(id), Location::DrawPile, Location::DiscardPile)
                .unwrap();
        }
        zones.take_journal();

        assert_eq!(zones.recycle_discard(&mut rng), 3);
        assert_eq!(zones.pile(PileId::Discard).len(), 1);
        assert_eq!(zones.top(PileId::Discard), Some(CardId::new(0)));
        assert_eq!(zones.pile(PileId::Draw).len(), 3);
        assert_eq!(zones.take_journal().len(), 3);
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_clear() {
        let (deck, mut zones) = setup(2);
        zones.clear();
        assert_eq!(zones.total_cards(), 0);
        assert_eq!(zones.player_count(), 0);
        assert!(!zones.check_conservation(&deck));
    }
}
