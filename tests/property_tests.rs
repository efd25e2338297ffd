//! Property tests over random intent sequences.
//!
//! Each step either picks one of the currently legal intents (which must
//! succeed) or throws an arbitrary intent at the engine (which may fail, and
//! must then leave everything untouched).

use im::Vector;
use proptest::prelude::*;

use cabo_engine::cards::CardId;
use cabo_engine::core::{
    EngineConfig, GameState, InGameState, Intent, Interaction, InteractionKind, PileId,
    PlayerId,
};
use cabo_engine::engine::Engine;
use cabo_engine::zones::{Hand, Visibility};

#[derive(Clone, Debug)]
enum Step {
    Legal(usize),
    Arbitrary(u16),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => any::<usize>().prop_map(Step::Legal),
        1 => any::<u16>().prop_map(Step::Arbitrary),
    ]
}

fn arbitrary_intent(n: u16) -> Intent {
    let kinds = [
        InteractionKind::Discard,
        InteractionKind::SwapWithOwnCard,
        InteractionKind::Peek,
        InteractionKind::Spy,
        InteractionKind::Swap,
    ];
    let arg = n / 16;
    match n % 16 {
        0 => Intent::AssetsLoaded,
        1 => Intent::PlaceDrawPile,
        2 => Intent::RegisterPlayer,
        3 => Intent::RemovePlayer(PlayerId::new((arg % 6) as u8)),
        4 => Intent::StartDeal,
        5 => Intent::DealingComplete,
        6 => Intent::DrawCard(PileId::Draw),
        7 => Intent::DrawCard(PileId::Discard),
        8 => Intent::SelectInteraction(kinds[usize::from(arg) % kinds.len()]),
        9 => Intent::Undo,
        10 | 11 | 12 => Intent::TapTarget(CardId::new(u32::from(arg) % 60)),
        13 => Intent::EndReveal,
        14 => Intent::CallLastRound,
        _ => Intent::Reset,
    }
}

/// Everything a rejected intent must not change.
#[derive(Debug, PartialEq)]
struct Snapshot {
    state: GameState,
    history: usize,
    draw: Vector<CardId>,
    discard: Vector<CardId>,
    hands: Vec<Hand>,
    last_round_caller: Option<PlayerId>,
}

fn snapshot(engine: &Engine) -> Snapshot {
    let zones = engine.table().zones();
    Snapshot {
        state: engine.current_state().clone(),
        history: engine.history().len(),
        draw: zones.pile(PileId::Draw).clone(),
        discard: zones.pile(PileId::Discard).clone(),
        hands: zones.hands().map(|(_, h)| h.clone()).collect(),
        last_round_caller: engine.last_round_caller(),
    }
}

/// Cards are conserved once the draw pile is placed, and turn boundaries
/// leave no drawn card, buffered match or revealed slot behind.
fn check_invariants(engine: &Engine) -> Result<(), TestCaseError> {
    let zones = engine.table().zones();
    if zones.total_cards() > 0 {
        prop_assert!(zones.check_conservation(engine.deck()));
    }

    let discarding = matches!(
        engine.current_state(),
        GameState::InGame(InGameState::SelectedInteractionType {
            interaction: Interaction::Discard,
            ..
        })
    );
    for (_, hand) in zones.hands() {
        if !discarding {
            prop_assert!(hand.pending_match().is_empty());
        }
    }

    if let GameState::InGame(InGameState::CurrentTurn(_)) = engine.current_state() {
        for (_, hand) in zones.hands() {
            prop_assert_eq!(hand.drawn(), None);
            prop_assert!(hand.slots().all(|s| s.visibility == Visibility::Covered));
        }
    }
    Ok(())
}

fn small_config(seed: u64) -> EngineConfig {
    EngineConfig::new(seed).with_max_players(5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: legal intents always apply, others never leave a trace.
    #[test]
    fn prop_rejection_purity_and_conservation(
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 1..250),
    ) {
        let mut engine = Engine::new(small_config(seed)).unwrap();

        for step in steps {
            let before = snapshot(&engine);
            match step {
                Step::Legal(pick) => {
                    let legal = engine.legal_intents();
                    prop_assert!(!legal.is_empty(), "no legal intent in {:?}", before.state);
                    let intent = legal[pick % legal.len()];
                    let result = engine.apply_intent(intent);
                    prop_assert!(result.is_ok(), "{:?} listed as legal but failed: {:?}", intent, result);
                    prop_assert_eq!(engine.history().len(), before.history + 1);
                }
                Step::Arbitrary(n) => {
                    let intent = arbitrary_intent(n);
                    if engine.apply_intent(intent).is_err() {
                        prop_assert_eq!(snapshot(&engine), before, "{:?} left a trace", intent);
                    }
                }
            }
            check_invariants(&engine)?;
        }
    }

    /// Property: the same seed and intents reproduce the same table.
    #[test]
    fn prop_replay_is_deterministic(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 1..120),
    ) {
        let mut engine = Engine::new(small_config(seed)).unwrap();
        for pick in picks {
            let legal = engine.legal_intents();
            let intent = legal[pick % legal.len()];
            engine.apply_intent(intent).unwrap();
        }

        let mut replay = Engine::new(small_config(seed)).unwrap();
        for record in engine.history() {
            replay.apply_intent(record.intent).unwrap();
        }
        prop_assert_eq!(snapshot(&replay), snapshot(&engine));
    }
}
