//! Rank → special action table.
//!
//! A drawn card may unlock one special action depending on its rank.
//! Discarding and swapping with an own card are always available and are not
//! part of the table.
//!
//! The table is configuration. The default follows the classic Cabo deck:
//!
//! | Rank      | Action |
//! |-----------|--------|
//! | 7, 8      | Peek   |
//! | 9, 10     | Spy    |
//! | J, Q      | Swap   |
//! | otherwise | none   |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::Rank;
use crate::core::InteractionKind;

/// A special action unlocked by a drawn card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Look at one of your own covered cards.
    Peek,
    /// Look at one covered card of another player.
    Spy,
    /// Exchange one own covered card with one of another player, unseen.
    Swap,
}

/// Which ranks unlock which action.
///
/// ```
/// use cabo_engine::cards::Rank;
/// use cabo_engine::rules::{ActionKind, ActionTable};
///
/// let table = ActionTable::default();
/// assert_eq!(table.unlocked_action(Rank::Eight), Some(ActionKind::Peek));
/// assert_eq!(table.unlocked_action(Rank::King), None);
///
/// let house = ActionTable::empty().with(Rank::King, ActionKind::Spy);
/// assert_eq!(house.unlocked_action(Rank::King), Some(ActionKind::Spy));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTable {
    actions: BTreeMap<Rank, ActionKind>,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl ActionTable {
    /// No rank unlocks anything.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// 7-8 peek, 9-10 spy, J-Q swap.
    #[must_use]
    pub fn classic() -> Self {
        Self::empty()
            .with(Rank::Seven, ActionKind::Peek)
            .with(Rank::Eight, ActionKind::Peek)
            .with(Rank::Nine, ActionKind::Spy)
            .with(Rank::Ten, ActionKind::Spy)
            .with(Rank::Jack, ActionKind::Swap)
            .with(Rank::Queen, ActionKind::Swap)
    }

    /// Map `rank` to `action`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, rank: Rank, action: ActionKind) -> Self {
        self.actions.insert(rank, action);
        self
    }

    /// Remove any action for `rank`.
    #[must_use]
    pub fn without(mut self, rank: Rank) -> Self {
        self.actions.remove(&rank);
        self
    }

    /// The special action a drawn card of `rank` unlocks, if any.
    #[must_use]
    pub fn unlocked_action(&self, rank: Rank) -> Option<ActionKind> {
        self.actions.get(&rank).copied()
    }

    /// Can a player holding a drawn card of `rank` pick `kind`?
    #[must_use]
    pub fn permits(&self, kind: InteractionKind, rank: Rank) -> bool {
        match kind.action() {
            None => true,
            Some(action) => self.unlocked_action(rank) == Some(action),
        }
    }

    /// Every interaction available for `rank`, always-legal kinds first.
    #[must_use]
    pub fn available(&self, rank: Rank) -> Vec<InteractionKind> {
        let mut kinds = vec![InteractionKind::Discard, InteractionKind::SwapWithOwnCard];
        kinds.extend(self.unlocked_action(rank).map(InteractionKind::from));
        kinds
    }
}
