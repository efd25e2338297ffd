//! Interaction resolution.
//!
//! The `InteractionResolver` applies one tap (or reveal end, or undo) of the
//! selected interaction to the zone manager. It never looks at the phase: the
//! state machine only calls it while a player is in
//! `SelectedInteractionType`, and turns `Resolution::Rejected` into an
//! `IllegalTransition` for that state.
//!
//! Cards that are in the wrong container are reported as `CardNotInSource`.
//! Taps that are well-formed but not an edge of the interaction (tapping a
//! flipped card twice, a second swap pick on the same side) are `Rejected`.

use crate::cards::{CardId, Deck};
use crate::core::{CardAction, EngineError, Interaction, PlayerId, Result};
use crate::zones::{Location, Visibility, ZoneManager};

/// Outcome of feeding one input to an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The interaction continues with updated progress.
    Pending(Interaction),
    /// The interaction resolved; the drawn card is gone and the turn is over.
    TurnComplete,
    /// Partial progress was rolled back.
    RolledBack,
    /// The input is not an edge of this interaction. Nothing was changed.
    Rejected,
}

/// Resolves interactions against the zone manager.
pub struct InteractionResolver;

impl InteractionResolver {
    /// Apply a tap on `card` by `player` to `interaction`.
    pub fn tap(
        zones: &mut ZoneManager,
        deck: &Deck,
        player: PlayerId,
        interaction: Interaction,
        card: CardId,
    ) -> Result<Resolution> {
        match interaction {
            Interaction::Discard => Self::tap_discard(zones, deck, player, card),

            Interaction::SwapWithOwnCard => {
                zones.swap_with_drawn(player, card)?;
                Self::discard_drawn(zones, player, card)?;
                Ok(Resolution::TurnComplete)
            }

            Interaction::PerformAction(CardAction::Peek { revealed: None }) => {
                if !Self::is_covered(zones, card) {
                    return Ok(Resolution::Rejected);
                }
                zones.set_visibility(player, card, Visibility::RevealedTo(player))?;
                Ok(Resolution::Pending(Interaction::PerformAction(
                    CardAction::Peek {
                        revealed: Some(card),
                    },
                )))
            }

            Interaction::PerformAction(CardAction::Spy { revealed: None }) => {
                let owner = Self::hand_owner(zones, card, player)?;
                if owner == player || !Self::is_covered(zones, card) {
                    return Ok(Resolution::Rejected);
                }
                zones.set_visibility(owner, card, Visibility::RevealedTo(player))?;
                Ok(Resolution::Pending(Interaction::PerformAction(
                    CardAction::Spy {
                        revealed: Some(card),
                    },
                )))
            }

            // A revealed card stays up until the reveal ends.
            Interaction::PerformAction(CardAction::Peek { revealed: Some(_) })
            | Interaction::PerformAction(CardAction::Spy { revealed: Some(_) }) => {
                Ok(Resolution::Rejected)
            }

            Interaction::PerformAction(CardAction::Swap { picked: None }) => {
                Self::hand_owner(zones, card, player)?;
                if !Self::is_covered(zones, card) {
                    return Ok(Resolution::Rejected);
                }
                Ok(Resolution::Pending(Interaction::PerformAction(
                    CardAction::Swap { picked: Some(card) },
                )))
            }

            Interaction::PerformAction(CardAction::Swap {
                picked: Some(first),
            }) => {
                let first_owner = Self::hand_owner(zones, first, player)?;
                let second_owner = Self::hand_owner(zones, card, player)?;
                // One card from each side of the table.
                if (first_owner == player) == (second_owner == player)
                    || !Self::is_covered(zones, card)
                {
                    return Ok(Resolution::Rejected);
                }
                zones.exchange((first_owner, first), (second_owner, card))?;
                Self::discard_drawn(zones, player, card)?;
                Ok(Resolution::TurnComplete)
            }
        }
    }

    /// End the reveal of a peek or spy: cover the card and finish the turn.
    pub fn end_reveal(
        zones: &mut ZoneManager,
        player: PlayerId,
        interaction: Interaction,
    ) -> Result<Resolution> {
        let card = match interaction {
            Interaction::PerformAction(CardAction::Peek {
                revealed: Some(card),
            })
            | Interaction::PerformAction(CardAction::Spy {
                revealed: Some(card),
            }) => card,
            _ => return Ok(Resolution::Rejected),
        };
        let owner = Self::hand_owner(zones, card, player)?;
        zones.set_visibility(owner, card, Visibility::Covered)?;
        Self::discard_drawn(zones, player, card)?;
        Ok(Resolution::TurnComplete)
    }

    /// Roll back partial progress of `interaction`.
    ///
    /// Flipped match candidates are covered again. A peek or spy whose card
    /// has already been shown cannot be undone.
    pub fn undo(
        zones: &mut ZoneManager,
        player: PlayerId,
        interaction: Interaction,
    ) -> Result<Resolution> {
        match interaction {
            Interaction::PerformAction(CardAction::Peek { revealed: Some(_) })
            | Interaction::PerformAction(CardAction::Spy { revealed: Some(_) }) => {
                Ok(Resolution::Rejected)
            }
            Interaction::Discard => {
                Self::cover_pending(zones, player)?;
                Ok(Resolution::RolledBack)
            }
            _ => Ok(Resolution::RolledBack),
        }
    }

    // === Discard ===

    fn tap_discard(
        zones: &mut ZoneManager,
        deck: &Deck,
        player: PlayerId,
        card: CardId,
    ) -> Result<Resolution> {
        if zones.is_in(card, Location::Drawn(player)) {
            return Self::resolve_discard(zones, deck, player, card);
        }

        let owner = Self::hand_owner(zones, card, player)?;
        if !Self::is_covered(zones, card) {
            return Ok(Resolution::Rejected);
        }
        zones.set_visibility(owner, card, Visibility::FaceUp)?;
        if let Some(hand) = zones.hand_mut(player) {
            hand.push_pending(card);
        }
        Ok(Resolution::Pending(Interaction::Discard))
    }

    fn resolve_discard(
        zones: &mut ZoneManager,
        deck: &Deck,
        player: PlayerId,
        drawn: CardId,
    ) -> Result<Resolution> {
        let pending = zones
            .hand(player)
            .map(|h| h.pending_match().to_vec())
            .unwrap_or_default();
        let drawn_rank = deck.rank(drawn);
        let matched = pending.iter().all(|&c| deck.rank(c) == drawn_rank);

        if matched {
            for &card in &pending {
                let owner = Self::hand_owner(zones, card, player)?;
                zones.move_card(card, Location::Hand(owner), Location::DiscardPile)?;
            }
            if let Some(hand) = zones.hand_mut(player) {
                hand.take_pending();
            }
        } else {
            Self::cover_pending(zones, player)?;
        }
        zones.move_card(drawn, Location::Drawn(player), Location::DiscardPile)?;
        Ok(Resolution::TurnComplete)
    }

    fn cover_pending(zones: &mut ZoneManager, player: PlayerId) -> Result<()> {
        let pending = match zones.hand_mut(player) {
            Some(hand) => hand.take_pending(),
            None => return Ok(()),
        };
        for card in pending {
            let owner = Self::hand_owner(zones, card, player)?;
            zones.set_visibility(owner, card, Visibility::Covered)?;
        }
        Ok(())
    }

    // === Helpers ===

    /// Discard the drawn card that paid for `target`'s interaction.
    fn discard_drawn(zones: &mut ZoneManager, player: PlayerId, target: CardId) -> Result<()> {
        let drawn = zones.hand(player).and_then(|h| h.drawn());
        let Some(card) = drawn else {
            return Err(EngineError::CardNotInSource {
                card: target,
                expected: Location::Drawn(player),
            });
        };
        zones.move_card(card, Location::Drawn(player), Location::DiscardPile)
    }

    /// Owner of a card held in a hand slot.
    fn hand_owner(zones: &ZoneManager, card: CardId, player: PlayerId) -> Result<PlayerId> {
        match zones.location(card) {
            Some(Location::Hand(owner)) => Ok(owner),
            _ => Err(EngineError::CardNotInSource {
                card,
                expected: Location::Hand(player),
            }),
        }
    }

    fn is_covered(zones: &ZoneManager, card: CardId) -> bool {
        zones.visibility(card) == Some(Visibility::Covered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;
    use crate::core::PileId;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    /// Two players, four cards each, p0 holding a drawn card.
    ///
    /// Dealing pops from the top, so with ranks listed bottom to top:
    /// p0 gets ids 11, 10, 9, 8; p1 gets 7, 6, 5, 4; p0 draws 3.
    fn table(ranks: [Rank; 12]) -> (Deck, ZoneManager, Vec<CardId>, Vec<CardId>, CardId) {
        let deck = Deck::from_ranks(&ranks);
        let mut zones = ZoneManager::new();
        zones.stock(&deck);
        zones.seat_players(2);
        let h0 = zones.deal_into_hand(P0, 4).unwrap();
        let h1 = zones.deal_into_hand(P1, 4).unwrap();
        let drawn = zones.draw(P0, PileId::Draw).unwrap();
        zones.take_journal();
        (deck, zones, h0, h1, drawn)
    }

    fn ranks() -> [Rank; 12] {
        use Rank::*;
        // ids:  0     1     2     3(drawn) 4     5     6     7     8     9     10    11
        [Ace, Two, Three, Five, Six, Five, Four, Nine, King, Five, Jack, Queen]
    }

    fn hand_size(zones: &ZoneManager, player: PlayerId) -> usize {
        zones.hand(player).map_or(0, |h| h.len())
    }

    #[test]
    fn test_discard_without_buffer() {
        let (deck, mut zones, _, _, drawn) = table(ranks());

        let res = InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, drawn);
        assert_eq!(res, Ok(Resolution::TurnComplete));
        assert_eq!(zones.top(PileId::Discard), Some(drawn));
        assert_eq!(hand_size(&zones, P0), 4);
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_matched_discard_across_hands() {
        let (deck, mut zones, h0, h1, drawn) = table(ranks());
        // drawn is a Five; h0[2] (id 9) and h1[2] (id 5) are Fives.
        let own = h0[2];
        let other = h1[2];

        for card in [own, other] {
            let res = InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, card);
            assert_eq!(res, Ok(Resolution::Pending(Interaction::Discard)));
            assert_eq!(zones.visibility(card), Some(Visibility::FaceUp));
        }

        let res = InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, drawn);
        assert_eq!(res, Ok(Resolution::TurnComplete));

        let discard: Vec<_> = zones.pile(PileId::Discard).iter().copied().collect();
        assert_eq!(discard, vec![own, other, drawn]);
        assert_eq!(hand_size(&zones, P0), 3);
        assert_eq!(hand_size(&zones, P1), 3);
        assert!(zones.hand(P0).unwrap().pending_match().is_empty());
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_mismatched_discard_recovers_buffer() {
        let (deck, mut zones, h0, _, drawn) = table(ranks());
        let wrong = h0[0]; // Queen

        InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, wrong).unwrap();
        let res = InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, drawn);
        assert_eq!(res, Ok(Resolution::TurnComplete));

        let discard: Vec<_> = zones.pile(PileId::Discard).iter().copied().collect();
        assert_eq!(discard, vec![drawn]);
        assert_eq!(hand_size(&zones, P0), 4);
        assert_eq!(zones.hand(P0).unwrap().position(wrong), Some(0));
        assert_eq!(zones.visibility(wrong), Some(Visibility::Covered));
        assert!(zones.hand(P0).unwrap().pending_match().is_empty());
    }

    #[test]
    fn test_discard_rejects_double_flip() {
        let (deck, mut zones, h0, _, _) = table(ranks());
        InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, h0[1]).unwrap();
        let res = InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, h0[1]);
        assert_eq!(res, Ok(Resolution::Rejected));
        assert_eq!(zones.hand(P0).unwrap().pending_match().len(), 1);
    }

    #[test]
    fn test_undo_discard_covers_buffer() {
        let (deck, mut zones, h0, h1, _) = table(ranks());
        InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, h0[1]).unwrap();
        InteractionResolver::tap(&mut zones, &deck, P0, Interaction::Discard, h1[0]).unwrap();

        let res = InteractionResolver::undo(&mut zones, P0, Interaction::Discard);
        assert_eq!(res, Ok(Resolution::RolledBack));
        assert_eq!(zones.visibility(h0[1]), Some(Visibility::Covered));
        assert_eq!(zones.visibility(h1[0]), Some(Visibility::Covered));
        assert!(zones.hand(P0).unwrap().pending_match().is_empty());
    }

    #[test]
    fn test_swap_with_own_card() {
        let (deck, mut zones, h0, _, drawn) = table(ranks());

        let res = InteractionResolver::tap(
            &mut zones,
            &deck,
            P0,
            Interaction::SwapWithOwnCard,
            h0[1],
        );
        assert_eq!(res, Ok(Resolution::TurnComplete));
        assert_eq!(zones.hand(P0).unwrap().position(drawn), Some(1));
        assert_eq!(zones.top(PileId::Discard), Some(h0[1]));
        assert_eq!(zones.hand(P0).unwrap().drawn(), None);
        assert!(zones.check_conservation(&deck));
    }

    #[test]
    fn test_swap_with_opponent_card_fails() {
        let (deck, mut zones, _, h1, _) = table(ranks());
        let res = InteractionResolver::tap(
            &mut zones,
            &deck,
            P0,
            Interaction::SwapWithOwnCard,
            h1[0],
        );
        assert_eq!(
            res,
            Err(EngineError::CardNotInSource {
                card: h1[0],
                expected: Location::Hand(P0),
            })
        );
    }

    #[test]
    fn test_peek_and_end_reveal() {
        let (deck, mut zones, h0, _, drawn) = table(ranks());
        let peek = Interaction::PerformAction(CardAction::Peek { revealed: None });

        let res = InteractionResolver::tap(&mut zones, &deck, P0, peek, h0[3]).unwrap();
        let Resolution::Pending(revealed) = res else {
            panic!("expected pending peek, got {res:?}");
        };
        assert_eq!(zones.visibility(h0[3]), Some(Visibility::RevealedTo(P0)));
        assert_eq!(
            InteractionResolver::undo(&mut zones, P0, revealed),
            Ok(Resolution::Rejected)
        );

        let res = InteractionResolver::end_reveal(&mut zones, P0, revealed);
        assert_eq!(res, Ok(Resolution::TurnComplete));
        assert_eq!(zones.visibility(h0[3]), Some(Visibility::Covered));
        assert_eq!(zones.top(PileId::Discard), Some(drawn));
    }

    #[test]
    fn test_peek_requires_own_card() {
        let (deck, mut zones, _, h1, _) = table(ranks());
        let peek = Interaction::PerformAction(CardAction::Peek { revealed: None });
        let res = InteractionResolver::tap(&mut zones, &deck, P0, peek, h1[0]);
        assert!(matches!(res, Err(EngineError::CardNotInSource { .. })));
    }

    #[test]
    fn test_spy_requires_opponent_card() {
        let (deck, mut zones, h0, h1, _) = table(ranks());
        let spy = Interaction::PerformAction(CardAction::Spy { revealed: None });

        let res = InteractionResolver::tap(&mut zones, &deck, P0, spy, h0[0]);
        assert_eq!(res, Ok(Resolution::Rejected));

        let res = InteractionResolver::tap(&mut zones, &deck, P0, spy, h1[2]).unwrap();
        assert_eq!(
            res,
            Resolution::Pending(Interaction::PerformAction(CardAction::Spy {
                revealed: Some(h1[2])
            }))
        );
        assert_eq!(zones.visibility(h1[2]), Some(Visibility::RevealedTo(P0)));
    }

    #[test]
    fn test_swap_either_order() {
        for own_first in [true, false] {
            let (deck, mut zones, h0, h1, drawn) = table(ranks());
            let (first, second) = if own_first { (h0[0], h1[3]) } else { (h1[3], h0[0]) };
            let swap = Interaction::PerformAction(CardAction::Swap { picked: None });

            let res = InteractionResolver::tap(&mut zones, &deck, P0, swap, first).unwrap();
            let Resolution::Pending(picked) = res else {
                panic!("expected pending swap, got {res:?}");
            };
            let res = InteractionResolver::tap(&mut zones, &deck, P0, picked, second);
            assert_eq!(res, Ok(Resolution::TurnComplete));

            assert_eq!(zones.hand(P0).unwrap().position(h1[3]), Some(0));
            assert_eq!(zones.hand(P1).unwrap().position(h0[0]), Some(3));
            assert_eq!(zones.visibility(h1[3]), Some(Visibility::Covered));
            assert_eq!(zones.top(PileId::Discard), Some(drawn));
            assert!(zones.check_conservation(&deck));
        }
    }

    #[test]
    fn test_swap_rejects_same_side() {
        let (deck, mut zones, h0, _, _) = table(ranks());
        let picked = Interaction::PerformAction(CardAction::Swap {
            picked: Some(h0[0]),
        });
        let res = InteractionResolver::tap(&mut zones, &deck, P0, picked, h0[1]);
        assert_eq!(res, Ok(Resolution::Rejected));
        assert_eq!(zones.hand(P0).unwrap().position(h0[0]), Some(0));
    }

    #[test]
    fn test_missing_drawn_card_is_not_in_source() {
        let (deck, mut zones, h0, _, drawn) = table(ranks());
        let peek = Interaction::PerformAction(CardAction::Peek { revealed: None });
        let res = InteractionResolver::tap(&mut zones, &deck, P0, peek, h0[0]).unwrap();
        let Resolution::Pending(revealed) = res else {
            panic!("expected pending peek, got {res:?}");
        };
        zones
            .move_card(drawn, Location::Drawn(P0), Location::DiscardPile)
            .unwrap();

        let res = InteractionResolver::end_reveal(&mut zones, P0, revealed);
        assert_eq!(
            res,
            Err(EngineError::CardNotInSource {
                card: h0[0],
                expected: Location::Drawn(P0),
            })
        );
    }

    #[test]
    fn test_end_reveal_without_reveal() {
        let (_, mut zones, _, _, _) = table(ranks());
        let res = InteractionResolver::end_reveal(&mut zones, P0, Interaction::Discard);
        assert_eq!(res, Ok(Resolution::Rejected));
    }
}
