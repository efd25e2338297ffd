//! Everything a transition may change besides the `GameState` value.
//!
//! A `Table` is cheap to clone: the zone manager is built on `im`
//! structures and the rest is a handful of scalars plus the RNG. The state
//! machine applies each intent to a clone and swaps it in on success.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, GameRngState, PlayerId};
use crate::zones::ZoneManager;

/// A called last round and how far it has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LastRound {
    /// First player to call it.
    pub caller: PlayerId,
    /// Turns completed since the call, the calling turn included.
    pub turns_completed: usize,
}

/// Cards, seats, last-round progress and randomness for one engine.
#[derive(Clone, Debug)]
pub struct Table {
    pub(crate) zones: ZoneManager,
    pub(crate) player_count: usize,
    pub(crate) last_round: Option<LastRound>,
    pub(crate) rng: GameRng,
    pub(crate) turn: u32,
}

impl Table {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            zones: ZoneManager::new(),
            player_count: 0,
            last_round: None,
            rng: GameRng::new(seed),
            turn: 0,
        }
    }

    /// Card locations.
    #[must_use]
    pub fn zones(&self) -> &ZoneManager {
        &self.zones
    }

    /// Registered players. Fixed once cards are dealt.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    #[must_use]
    pub fn last_round(&self) -> Option<LastRound> {
        self.last_round
    }

    #[must_use]
    pub fn last_round_caller(&self) -> Option<PlayerId> {
        self.last_round.map(|lr| lr.caller)
    }

    /// Current turn number, 1 for the first turn and 0 before it.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Snapshot of the RNG, for replay.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Drop cards, seats and last-round progress. The RNG keeps running.
    pub(crate) fn clear(&mut self) {
        self.zones.clear();
        self.player_count = 0;
        self.last_round = None;
        self.turn = 0;
    }
}
