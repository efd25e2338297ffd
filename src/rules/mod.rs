//! Game rules: the rank → action table, interaction resolution and scoring.
//!
//! These functions know what each interaction does to the cards, but not
//! when an interaction is allowed. Legality of an intent in a given state is
//! decided by the state machine in `engine`.

pub mod actions;
pub mod resolver;
pub mod scoring;

pub use actions::{ActionKind, ActionTable};
pub use resolver::{InteractionResolver, Resolution};
pub use scoring::{hand_points, rank_results, score, GameResult, PlayerResult};
