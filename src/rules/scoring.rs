//! End-of-game scoring.
//!
//! A player's total is the sum of the point values of the cards left in
//! their hand. Results are ranked ascending; the lowest total wins.

use serde::{Deserialize, Serialize};

use crate::cards::Deck;
use crate::core::PlayerId;
use crate::zones::ZoneManager;

/// One player's final total.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player: PlayerId,
    pub points: u32,
}

impl PlayerResult {
    #[must_use]
    pub const fn new(player: PlayerId, points: u32) -> Self {
        Self { player, points }
    }
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Several players tied on the lowest total.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Winner(s) of a ranked result list. `None` if the list is empty.
    #[must_use]
    pub fn from_results(ranked: &[PlayerResult]) -> Option<Self> {
        let best = ranked.iter().map(|r| r.points).min()?;
        let mut winners: Vec<PlayerId> = ranked
            .iter()
            .filter(|r| r.points == best)
            .map(|r| r.player)
            .collect();
        if winners.len() == 1 {
            winners.pop().map(GameResult::Winner)
        } else {
            Some(GameResult::Winners(winners))
        }
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
        }
    }

    /// All winning players.
    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        match self {
            GameResult::Winner(p) => vec![*p],
            GameResult::Winners(ps) => ps.clone(),
        }
    }
}

/// Points currently in a player's hand slots.
#[must_use]
pub fn hand_points(zones: &ZoneManager, deck: &Deck, player: PlayerId) -> u32 {
    zones
        .hand(player)
        .map(|hand| hand.cards().map(|card| deck.points(card)).sum())
        .unwrap_or(0)
}

/// Sort results ascending by points. Ties keep their input order.
#[must_use]
pub fn rank_results(mut results: Vec<PlayerResult>) -> Vec<PlayerResult> {
    results.sort_by_key(|r| r.points);
    results
}

/// Score every seated player and rank them, seat order breaking ties.
#[must_use]
pub fn score(zones: &ZoneManager, deck: &Deck) -> Vec<PlayerResult> {
    let results = zones
        .hands()
        .map(|(player, _)| PlayerResult::new(player, hand_points(zones, deck, player)))
        .collect();
    rank_results(results)
}
