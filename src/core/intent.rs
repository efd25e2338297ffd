//! Player intents: the only input the engine accepts.
//!
//! The presentation layer translates taps and gestures into these discrete
//! intents. The acting player is implied by the current state, so intents
//! carry only the "noun" they need (a pile, a kind, a card).

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::CardId;
use crate::rules::ActionKind;

/// The two shared piles a player may draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileId {
    Draw,
    Discard,
}

impl std::fmt::Display for PileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PileId::Draw => f.write_str("draw pile"),
            PileId::Discard => f.write_str("discard pile"),
        }
    }
}

/// Interaction a player picks after drawing.
///
/// `Discard` and `SwapWithOwnCard` are always available; the three special
/// actions only when the drawn rank unlocks them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Discard,
    SwapWithOwnCard,
    Peek,
    Spy,
    Swap,
}

impl InteractionKind {
    /// The special action this kind performs, if any.
    #[must_use]
    pub const fn action(self) -> Option<ActionKind> {
        match self {
            InteractionKind::Peek => Some(ActionKind::Peek),
            InteractionKind::Spy => Some(ActionKind::Spy),
            InteractionKind::Swap => Some(ActionKind::Swap),
            InteractionKind::Discard | InteractionKind::SwapWithOwnCard => None,
        }
    }
}

impl From<ActionKind> for InteractionKind {
    fn from(action: ActionKind) -> Self {
        match action {
            ActionKind::Peek => InteractionKind::Peek,
            ActionKind::Spy => InteractionKind::Spy,
            ActionKind::Swap => InteractionKind::Swap,
        }
    }
}

/// A discrete input from the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Card assets finished loading.
    AssetsLoaded,
    /// The draw pile was placed on the table.
    PlaceDrawPile,
    /// A new seat was placed at the table.
    RegisterPlayer,
    /// A placed seat was removed again.
    RemovePlayer(PlayerId),
    /// The draw pile was tapped to deal (or to start after regarding cards).
    StartDeal,
    /// The presentation layer finished placing the dealt cards.
    DealingComplete,
    /// The acting player draws the top card of a pile.
    DrawCard(PileId),
    /// The acting player chooses what to do with the drawn card.
    SelectInteraction(InteractionKind),
    /// Roll back the selected interaction.
    Undo,
    /// The acting player tapped a card.
    TapTarget(CardId),
    /// The reveal interval of a peek or spy elapsed.
    EndReveal,
    /// The acting player calls the last round.
    CallLastRound,
    /// Start over after a finished game.
    Reset,
}

/// A committed intent, recorded in engine history for replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// The player acting when the intent was applied, if any.
    pub player: Option<PlayerId>,

    /// The intent applied.
    pub intent: Intent,

    /// Turn number when it was applied (0 before the first turn).
    pub turn: u32,

    /// Global sequence number.
    pub sequence: u32,
}

impl IntentRecord {
    #[must_use]
    pub fn new(player: Option<PlayerId>, intent: Intent, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            intent,
            turn,
            sequence,
        }
    }
}
