//! Engine configuration.
//!
//! Hosts configure table limits, dealing and the rank→action table at
//! startup. Every field has a classic-Cabo default; builder methods override
//! individual values.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};
use crate::rules::ActionTable;

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use cabo_engine::core::EngineConfig;
///
/// let config = EngineConfig::new(42)
///     .with_cards_per_player(6)
///     .with_max_players(4);
///
/// assert_eq!(config.cards_per_player, 6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for shuffling and starting-player choice.
    pub seed: u64,

    /// Cards dealt to each player at setup.
    pub cards_per_player: usize,

    /// Slots each player may look at before the first turn.
    pub regard_count: usize,

    /// Fewest players that can be dealt in.
    pub min_players: usize,

    /// Most players that can register.
    pub max_players: usize,

    /// Copies of each rank in a standard deck.
    pub copies_per_rank: usize,

    /// Shuffle the draw pile at setup. Disable only for stacked test decks.
    pub shuffle: bool,

    /// Which special action each drawn rank unlocks.
    pub action_table: ActionTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            cards_per_player: 4,
            regard_count: 2,
            min_players: 2,
            max_players: 8,
            copies_per_rank: 4,
            shuffle: true,
            action_table: ActionTable::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cards_per_player(mut self, count: usize) -> Self {
        self.cards_per_player = count;
        self
    }

    #[must_use]
    pub fn with_regard_count(mut self, count: usize) -> Self {
        self.regard_count = count;
        self
    }

    #[must_use]
    pub fn with_min_players(mut self, count: usize) -> Self {
        self.min_players = count;
        self
    }

    #[must_use]
    pub fn with_max_players(mut self, count: usize) -> Self {
        self.max_players = count;
        self
    }

    #[must_use]
    pub fn with_copies_per_rank(mut self, copies: usize) -> Self {
        self.copies_per_rank = copies;
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_action_table(mut self, table: ActionTable) -> Self {
        self.action_table = table;
        self
    }

    /// Cards a full table consumes at setup: every hand plus the first discard.
    #[must_use]
    pub fn cards_needed(&self, player_count: usize) -> usize {
        player_count * self.cards_per_player + 1
    }

    /// Check that a full table can be dealt from a deck of `deck_size`.
    pub fn validate_for_deck(&self, deck_size: usize) -> Result<()> {
        if self.min_players < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "min_players must be at least 2 (got {})",
                self.min_players
            )));
        }
        if self.max_players < self.min_players || self.max_players > 255 {
            return Err(EngineError::InvalidConfig(format!(
                "max_players must be in {}..=255 (got {})",
                self.min_players, self.max_players
            )));
        }
        if self.cards_per_player == 0 {
            return Err(EngineError::InvalidConfig(
                "cards_per_player must be > 0".to_string(),
            ));
        }
        if self.regard_count > self.cards_per_player {
            return Err(EngineError::InvalidConfig(format!(
                "regard_count {} exceeds cards_per_player {}",
                self.regard_count, self.cards_per_player
            )));
        }
        let needed = self.cards_needed(self.max_players);
        if needed > deck_size {
            return Err(EngineError::InvalidConfig(format!(
                "{} players need {} cards but the deck has {}",
                self.max_players, needed, deck_size
            )));
        }
        Ok(())
    }

    /// Check the configuration against a standard deck.
    pub fn validate(&self) -> Result<()> {
        self.validate_for_deck(13 * self.copies_per_rank)
    }
}
