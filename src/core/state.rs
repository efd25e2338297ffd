//! The canonical game state.
//!
//! `GameState` is a small tagged value: the phase, its sub-state, and the
//! partial progress of the interaction being resolved. Card locations live in
//! the zone manager and change only as a side effect of a transition on this
//! value. Each transition produces a new `GameState`; the old one is never
//! edited in place.

use serde::{Deserialize, Serialize};

use super::intent::InteractionKind;
use super::player::PlayerId;
use crate::cards::{CardId, Rank};
use crate::rules::{ActionKind, PlayerResult};

/// Setup sub-states before any card is dealt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreGameState {
    LoadingAssets,
    PlaceDrawPile,
    SetPlayerPositions,
    RegardCards,
}

/// Progress of a special action.
///
/// `Peek`/`Spy` hold the card currently revealed to the acting player.
/// `Swap` holds the first of its two picks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardAction {
    Peek { revealed: Option<CardId> },
    Spy { revealed: Option<CardId> },
    Swap { picked: Option<CardId> },
}

impl CardAction {
    /// A fresh action with no progress.
    #[must_use]
    pub const fn start(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Peek => CardAction::Peek { revealed: None },
            ActionKind::Spy => CardAction::Spy { revealed: None },
            ActionKind::Swap => CardAction::Swap { picked: None },
        }
    }

    #[must_use]
    pub const fn kind(self) -> ActionKind {
        match self {
            CardAction::Peek { .. } => ActionKind::Peek,
            CardAction::Spy { .. } => ActionKind::Spy,
            CardAction::Swap { .. } => ActionKind::Swap,
        }
    }

    /// How many target picks are complete (0 or 1; a second pick resolves
    /// the action).
    #[must_use]
    pub const fn memorized(self) -> u8 {
        match self {
            CardAction::Peek { revealed: Some(_) }
            | CardAction::Spy { revealed: Some(_) }
            | CardAction::Swap { picked: Some(_) } => 1,
            _ => 0,
        }
    }
}

/// The interaction a player has selected for the drawn card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interaction {
    Discard,
    SwapWithOwnCard,
    PerformAction(CardAction),
}

impl Interaction {
    /// A fresh interaction of the given kind.
    #[must_use]
    pub const fn start(kind: InteractionKind) -> Self {
        match kind {
            InteractionKind::Discard => Interaction::Discard,
            InteractionKind::SwapWithOwnCard => Interaction::SwapWithOwnCard,
            InteractionKind::Peek => Interaction::PerformAction(CardAction::start(ActionKind::Peek)),
            InteractionKind::Spy => Interaction::PerformAction(CardAction::start(ActionKind::Spy)),
            InteractionKind::Swap => Interaction::PerformAction(CardAction::start(ActionKind::Swap)),
        }
    }

    #[must_use]
    pub const fn kind(self) -> InteractionKind {
        match self {
            Interaction::Discard => InteractionKind::Discard,
            Interaction::SwapWithOwnCard => InteractionKind::SwapWithOwnCard,
            Interaction::PerformAction(action) => match action.kind() {
                ActionKind::Peek => InteractionKind::Peek,
                ActionKind::Spy => InteractionKind::Spy,
                ActionKind::Swap => InteractionKind::Swap,
            },
        }
    }
}

/// Sub-states of a round in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InGameState {
    /// Cards are dealt; waiting for the presentation layer to finish placing them.
    DealingCards,
    /// `player` must draw from a pile.
    CurrentTurn(PlayerId),
    /// `player` holds a drawn card of `rank` and must pick an interaction.
    WaitForInteractionTypeSelection { player: PlayerId, rank: Rank },
    /// `player` is resolving `interaction` for a drawn card of `rank`.
    SelectedInteractionType {
        player: PlayerId,
        interaction: Interaction,
        rank: Rank,
    },
}

/// Phase-tagged game state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    PreGame(PreGameState),
    InGame(InGameState),
    /// Final results, ranked ascending by points.
    PostGame(Vec<PlayerResult>),
}

impl Default for GameState {
    fn default() -> Self {
        GameState::PreGame(PreGameState::LoadingAssets)
    }
}

impl GameState {
    /// The player whose turn it is, if a turn is in progress.
    #[must_use]
    pub fn acting_player(&self) -> Option<PlayerId> {
        match self {
            GameState::InGame(InGameState::CurrentTurn(player))
            | GameState::InGame(InGameState::WaitForInteractionTypeSelection { player, .. })
            | GameState::InGame(InGameState::SelectedInteractionType { player, .. }) => {
                Some(*player)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pre_game(&self) -> bool {
        matches!(self, GameState::PreGame(_))
    }

    #[must_use]
    pub fn is_in_game(&self) -> bool {
        matches!(self, GameState::InGame(_))
    }

    #[must_use]
    pub fn is_post_game(&self) -> bool {
        matches!(self, GameState::PostGame(_))
    }

    /// Final results, once the game is over.
    #[must_use]
    pub fn results(&self) -> Option<&[PlayerResult]> {
        match self {
            GameState::PostGame(results) => Some(results),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        assert_eq!(
            GameState::default(),
            GameState::PreGame(PreGameState::LoadingAssets)
        );
        assert!(GameState::default().is_pre_game());
    }

    #[test]
    fn test_acting_player() {
        let p = PlayerId::new(2);
        assert_eq!(
            GameState::InGame(InGameState::CurrentTurn(p)).acting_player(),
            Some(p)
        );
        assert_eq!(
            GameState::InGame(InGameState::SelectedInteractionType {
                player: p,
                interaction: Interaction::Discard,
                rank: Rank::Five,
            })
            .acting_player(),
            Some(p)
        );
        assert_eq!(GameState::InGame(InGameState::DealingCards).acting_player(), None);
        assert_eq!(GameState::PostGame(vec![]).acting_player(), None);
    }

    #[test]
    fn test_interaction_kind_round_trip() {
        for kind in [
            InteractionKind::Discard,
            InteractionKind::SwapWithOwnCard,
            InteractionKind::Peek,
            InteractionKind::Spy,
            InteractionKind::Swap,
        ] {
            assert_eq!(Interaction::start(kind).kind(), kind);
        }
    }

    #[test]
    fn test_memorized() {
        assert_eq!(CardAction::Swap { picked: None }.memorized(), 0);
        assert_eq!(
            CardAction::Swap {
                picked: Some(CardId::new(3))
            }
            .memorized(),
            1
        );
        assert_eq!(CardAction::start(ActionKind::Peek).memorized(), 0);
    }

    #[test]
    fn test_state_serialization() {
        let state = GameState::InGame(InGameState::SelectedInteractionType {
            player: PlayerId::new(1),
            interaction: Interaction::PerformAction(CardAction::Swap {
                picked: Some(CardId::new(9)),
            }),
            rank: Rank::Jack,
        });
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
