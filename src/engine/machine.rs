//! The turn and phase state machine.
//!
//! `Engine` owns the canonical `GameState`, the `Table` (cards, seats,
//! last-round progress, RNG) and the observer list. `apply_intent` is the only
//! mutator. Each intent is applied to a clone of the table; the clone and the
//! new state are committed together only if the intent is a legal edge and
//! every card move it implies succeeds. Otherwise the error is returned and
//! nothing changes.

use tracing::{debug, info, warn};

use super::observer::{ObserverId, StateChange, StateObserver};
use super::table::{LastRound, Table};
use super::ObserverList;
use crate::cards::{CardId, Deck, Rank};
use crate::core::{
    EngineConfig, EngineError, GameState, InGameState, Intent, IntentRecord, Interaction,
    InteractionKind, PileId, PlayerId, PreGameState, Result,
};
use crate::rules::{score, GameResult, InteractionResolver, Resolution};
use crate::zones::{CardMove, Location, Visibility};

/// The rules engine for one table.
///
/// ## Usage
///
/// ```
/// use cabo_engine::core::{EngineConfig, GameState, InGameState, Intent};
/// use cabo_engine::engine::Engine;
///
/// let mut engine = Engine::new(EngineConfig::new(7)).unwrap();
/// for intent in [
///     Intent::AssetsLoaded,
///     Intent::PlaceDrawPile,
///     Intent::RegisterPlayer,
///     Intent::RegisterPlayer,
///     Intent::StartDeal,
///     Intent::StartDeal,
///     Intent::DealingComplete,
/// ] {
///     engine.apply_intent(intent).unwrap();
/// }
///
/// assert!(matches!(
///     engine.current_state(),
///     GameState::InGame(InGameState::CurrentTurn(_))
/// ));
/// assert!(engine.apply_intent(Intent::Reset).is_err());
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    deck: Deck,
    state: GameState,
    table: Table,
    history: Vec<IntentRecord>,
    observers: ObserverList,
}

impl Engine {
    /// Create an engine over a standard deck.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let deck = Deck::standard(config.copies_per_rank);
        Self::with_deck(config, deck)
    }

    /// Create an engine over a custom deck.
    pub fn with_deck(config: EngineConfig, deck: Deck) -> Result<Self> {
        config.validate_for_deck(deck.len())?;
        Ok(Self {
            table: Table::new(config.seed),
            config,
            deck,
            state: GameState::default(),
            history: Vec::new(),
            observers: ObserverList::new(),
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn current_state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Registered players in seat order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.table.player_count)
    }

    #[must_use]
    pub fn last_round_caller(&self) -> Option<PlayerId> {
        self.table.last_round_caller()
    }

    /// Committed intents in order.
    #[must_use]
    pub fn history(&self) -> &[IntentRecord] {
        &self.history
    }

    /// Winner(s), once the game is over.
    #[must_use]
    pub fn game_result(&self) -> Option<GameResult> {
        self.state.results().and_then(GameResult::from_results)
    }

    /// The rank of `card` as `viewer` sees it, or `None` if it is hidden.
    ///
    /// Discards are face up. A drawn card is seen by the player holding it.
    /// Hand slots follow their visibility.
    #[must_use]
    pub fn visible_rank(&self, viewer: PlayerId, card: CardId) -> Option<Rank> {
        let visible = match self.table.zones.location(card)? {
            Location::DrawPile => false,
            Location::DiscardPile => true,
            Location::Drawn(holder) => holder == viewer,
            Location::Hand(_) => self
                .table
                .zones
                .visibility(card)
                .is_some_and(|v| v.visible_to(viewer)),
        };
        if visible {
            self.deck.rank(card)
        } else {
            None
        }
    }

    /// Every intent the current state would accept.
    ///
    /// A repeat `CallLastRound` is accepted but not listed: it changes nothing.
    #[must_use]
    pub fn legal_intents(&self) -> Vec<Intent> {
        self.candidate_intents()
            .into_iter()
            .filter(|&intent| !self.is_repeat_call(intent))
            .filter(|&intent| {
                let mut scratch = self.table.clone();
                self.transition(&mut scratch, intent).is_ok()
            })
            .collect()
    }

    // === Observers ===

    /// Register an observer for committed transitions.
    ///
    /// Rejected intents and repeat last-round calls are not published.
    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // === Transitions ===

    /// Validate and apply one intent.
    ///
    /// On success the new state is committed, recorded in history and
    /// published to observers. On error nothing changes. A last-round call
    /// after the first one succeeds without being recorded or published.
    pub fn apply_intent(&mut self, intent: Intent) -> Result<GameState> {
        let mut next = self.table.clone();
        let state = match self.transition(&mut next, intent) {
            Ok(state) => state,
            Err(err) => {
                warn!(state = ?self.state, ?intent, %err, "intent rejected");
                return Err(err);
            }
        };
        if self.is_repeat_call(intent) {
            debug!(caller = ?self.table.last_round_caller(), "last round already called");
            return Ok(state);
        }

        let player = self.state.acting_player();
        let previous_caller = self.table.last_round_caller();
        let moves = next.zones.take_journal();
        self.table = next;
        let previous = std::mem::replace(&mut self.state, state);
        self.log_milestones(&previous, previous_caller, &moves);

        let sequence = u32::try_from(self.history.len()).unwrap_or(u32::MAX);
        self.history
            .push(IntentRecord::new(player, intent, self.table.turn, sequence));
        debug!(
            ?intent,
            state = ?self.state,
            moves = moves.len(),
            sequence,
            "transition committed"
        );

        self.observers.notify(&StateChange {
            state: &self.state,
            intent,
            moves: &moves,
            last_round_caller: self.table.last_round_caller(),
        });
        Ok(self.state.clone())
    }

    /// Round-level events, logged once per committed transition.
    fn log_milestones(
        &self,
        previous: &GameState,
        previous_caller: Option<PlayerId>,
        moves: &[CardMove],
    ) {
        match (previous, &self.state) {
            (
                GameState::PreGame(PreGameState::RegardCards),
                GameState::InGame(InGameState::DealingCards),
            ) => {
                info!(
                    players = self.table.player_count,
                    cards_per_player = self.config.cards_per_player,
                    shuffled = self.config.shuffle,
                    "round dealt"
                );
            }
            (
                GameState::InGame(InGameState::DealingCards),
                GameState::InGame(InGameState::CurrentTurn(first)),
            ) => {
                info!(player = %first, "first turn");
            }
            (GameState::InGame(_), GameState::PostGame(results)) => {
                let winners = GameResult::from_results(results).map(|r| r.winners());
                info!(?winners, ?results, "game over");
            }
            _ => {}
        }

        if let (None, Some(caller)) = (previous_caller, self.table.last_round_caller()) {
            info!(player = %caller, turn = self.table.turn, "last round called");
        }

        let recycled = moves
            .iter()
            .filter(|m| m.from == Some(Location::DiscardPile) && m.to == Location::DrawPile)
            .count();
        if recycled > 0 {
            info!(recycled, "draw pile refilled from discards");
        }
    }

    fn illegal(&self, intent: Intent) -> EngineError {
        EngineError::IllegalTransition {
            state: self.state.clone(),
            intent,
        }
    }

    /// Compute the state `intent` leads to, applying its card moves to `table`.
    fn transition(&self, table: &mut Table, intent: Intent) -> Result<GameState> {
        use GameState::{InGame, PostGame, PreGame};
        use InGameState::{
            CurrentTurn, DealingCards, SelectedInteractionType, WaitForInteractionTypeSelection,
        };

        match (&self.state, intent) {
            // === PreGame ===
            (&PreGame(PreGameState::LoadingAssets), Intent::AssetsLoaded) => {
                Ok(PreGame(PreGameState::PlaceDrawPile))
            }

            (&PreGame(PreGameState::PlaceDrawPile), Intent::PlaceDrawPile) => {
                table.zones.stock(&self.deck);
                Ok(PreGame(PreGameState::SetPlayerPositions))
            }

            (&PreGame(PreGameState::SetPlayerPositions), Intent::RegisterPlayer) => {
                if table.player_count >= self.config.max_players {
                    return Err(EngineError::InvalidPlayerCount {
                        count: table.player_count + 1,
                        min: self.config.min_players,
                        max: self.config.max_players,
                    });
                }
                table.player_count += 1;
                Ok(PreGame(PreGameState::SetPlayerPositions))
            }

            (&PreGame(PreGameState::SetPlayerPositions), Intent::RemovePlayer(player)) => {
                if player.index() >= table.player_count {
                    return Err(self.illegal(intent));
                }
                // Later seats shift down by one.
                table.player_count -= 1;
                Ok(PreGame(PreGameState::SetPlayerPositions))
            }

            (&PreGame(PreGameState::SetPlayerPositions), Intent::StartDeal) => {
                let count = table.player_count;
                if !(self.config.min_players..=self.config.max_players).contains(&count) {
                    return Err(EngineError::InvalidPlayerCount {
                        count,
                        min: self.config.min_players,
                        max: self.config.max_players,
                    });
                }
                Ok(PreGame(PreGameState::RegardCards))
            }

            (&PreGame(PreGameState::RegardCards), Intent::StartDeal) => {
                self.deal_round(table)?;
                Ok(InGame(DealingCards))
            }

            // === InGame ===
            (&InGame(DealingCards), Intent::DealingComplete) => {
                for player in PlayerId::all(table.player_count) {
                    if let Some(hand) = table.zones.hand_mut(player) {
                        hand.cover_all();
                    }
                }
                let seats: Vec<PlayerId> = PlayerId::all(table.player_count).collect();
                let first = table.rng.choose(&seats).copied().ok_or(
                    EngineError::InvalidPlayerCount {
                        count: 0,
                        min: self.config.min_players,
                        max: self.config.max_players,
                    },
                )?;
                table.turn = 1;
                Ok(InGame(CurrentTurn(first)))
            }

            (&InGame(CurrentTurn(player)), Intent::DrawCard(pile)) => {
                if pile == PileId::Draw && table.zones.top(PileId::Draw).is_none() {
                    table.zones.recycle_discard(&mut table.rng);
                }
                let card = table.zones.draw(player, pile)?;
                let rank = self.deck.rank(card).ok_or(EngineError::CardNotInSource {
                    card,
                    expected: pile.into(),
                })?;
                Ok(InGame(WaitForInteractionTypeSelection { player, rank }))
            }

            (
                &InGame(WaitForInteractionTypeSelection { player, rank }),
                Intent::SelectInteraction(kind),
            ) => {
                if !self.config.action_table.permits(kind, rank) {
                    return Err(self.illegal(intent));
                }
                Ok(InGame(SelectedInteractionType {
                    player,
                    interaction: Interaction::start(kind),
                    rank,
                }))
            }

            (
                &InGame(SelectedInteractionType {
                    player,
                    interaction,
                    rank,
                }),
                Intent::Undo,
            ) => match InteractionResolver::undo(&mut table.zones, player, interaction)? {
                Resolution::RolledBack => {
                    Ok(InGame(WaitForInteractionTypeSelection { player, rank }))
                }
                _ => Err(self.illegal(intent)),
            },

            (
                &InGame(SelectedInteractionType {
                    player,
                    interaction,
                    rank,
                }),
                Intent::TapTarget(card),
            ) => {
                let resolution = InteractionResolver::tap(
                    &mut table.zones,
                    &self.deck,
                    player,
                    interaction,
                    card,
                )?;
                self.after_resolution(table, intent, player, rank, resolution)
            }

            (
                &InGame(SelectedInteractionType {
                    player,
                    interaction,
                    rank,
                }),
                Intent::EndReveal,
            ) => {
                let resolution =
                    InteractionResolver::end_reveal(&mut table.zones, player, interaction)?;
                self.after_resolution(table, intent, player, rank, resolution)
            }

            (
                &InGame(
                    CurrentTurn(player)
                    | WaitForInteractionTypeSelection { player, .. }
                    | SelectedInteractionType { player, .. },
                ),
                Intent::CallLastRound,
            ) => {
                if table.last_round.is_none() {
                    table.last_round = Some(LastRound {
                        caller: player,
                        turns_completed: 0,
                    });
                }
                Ok(self.state.clone())
            }

            // === PostGame ===
            (&PostGame(_), Intent::Reset) => {
                table.clear();
                Ok(PreGame(PreGameState::PlaceDrawPile))
            }

            _ => Err(self.illegal(intent)),
        }
    }

    fn after_resolution(
        &self,
        table: &mut Table,
        intent: Intent,
        player: PlayerId,
        rank: Rank,
        resolution: Resolution,
    ) -> Result<GameState> {
        match resolution {
            Resolution::Pending(interaction) => {
                Ok(GameState::InGame(InGameState::SelectedInteractionType {
                    player,
                    interaction,
                    rank,
                }))
            }
            Resolution::TurnComplete => Ok(self.end_turn(table, player)),
            Resolution::RolledBack | Resolution::Rejected => Err(self.illegal(intent)),
        }
    }

    /// Hand the turn to the next seat, or end the game once the last round
    /// has come back around to its caller.
    fn end_turn(&self, table: &mut Table, player: PlayerId) -> GameState {
        let next = player.next(table.player_count);

        if let Some(last_round) = table.last_round.as_mut() {
            last_round.turns_completed += 1;
            if next == last_round.caller && last_round.turns_completed >= table.player_count {
                return GameState::PostGame(score(&table.zones, &self.deck));
            }
        }

        table.turn += 1;
        GameState::InGame(InGameState::CurrentTurn(next))
    }

    /// Seat the players, shuffle, deal, flip the first discard and show each
    /// player their regard cards.
    fn deal_round(&self, table: &mut Table) -> Result<()> {
        let player_count = table.player_count;
        let needed = self.config.cards_needed(player_count);
        let available = table.zones.pile(PileId::Draw).len();
        if available < needed {
            return Err(EngineError::InsufficientCards {
                requested: needed,
                available,
            });
        }

        table.zones.seat_players(player_count);
        if self.config.shuffle {
            table.zones.shuffle_draw_pile(&mut table.rng);
        }

        for player in PlayerId::all(player_count) {
            table
                .zones
                .deal_into_hand(player, self.config.cards_per_player)?;
        }

        if let Some(first) = table.zones.top(PileId::Draw) {
            table
                .zones
                .move_card(first, Location::DrawPile, Location::DiscardPile)?;
        }

        for player in PlayerId::all(player_count) {
            let regard: Vec<CardId> = table
                .zones
                .hand(player)
                .map(|h| h.cards().take(self.config.regard_count).collect())
                .unwrap_or_default();
            for card in regard {
                table
                    .zones
                    .set_visibility(player, card, Visibility::RevealedTo(player))?;
            }
        }
        Ok(())
    }

    /// Every intent that could be legal somewhere, narrowed to the current
    /// table (seats, deck cards).
    fn is_repeat_call(&self, intent: Intent) -> bool {
        matches!(intent, Intent::CallLastRound) && self.table.last_round.is_some()
    }

    fn candidate_intents(&self) -> Vec<Intent> {
        let mut intents = vec![
            Intent::AssetsLoaded,
            Intent::PlaceDrawPile,
            Intent::RegisterPlayer,
            Intent::StartDeal,
            Intent::DealingComplete,
            Intent::DrawCard(PileId::Draw),
            Intent::DrawCard(PileId::Discard),
            Intent::Undo,
            Intent::EndReveal,
            Intent::CallLastRound,
            Intent::Reset,
        ];
        intents.extend(PlayerId::all(self.table.player_count).map(Intent::RemovePlayer));
        intents.extend(
            [
                InteractionKind::Discard,
                InteractionKind::SwapWithOwnCard,
                InteractionKind::Peek,
                InteractionKind::Spy,
                InteractionKind::Swap,
            ]
            .map(Intent::SelectInteraction),
        );
        if matches!(
            self.state,
            GameState::InGame(InGameState::SelectedInteractionType { .. })
        ) {
            intents.extend(self.deck.ids().map(Intent::TapTarget));
        }
        intents
    }
}
