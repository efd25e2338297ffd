//! Transition observers.
//!
//! Observers are notified synchronously after each committed transition, in
//! subscription order. They receive the new state, the intent that caused it
//! and the card relocations it produced. A rejected intent notifies nobody.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Intent, PlayerId};
use crate::zones::CardMove;

/// Identifier returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub u32);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Observer({})", self.0)
    }
}

/// One committed transition.
#[derive(Clone, Copy, Debug)]
pub struct StateChange<'a> {
    /// State after the transition.
    pub state: &'a GameState,

    /// The intent that was applied.
    pub intent: Intent,

    /// Cards moved by the transition, in order.
    pub moves: &'a [CardMove],

    /// Who called the last round, if anyone has.
    pub last_round_caller: Option<PlayerId>,
}

/// Receives committed transitions.
///
/// Implemented for every `FnMut(&StateChange)` closure.
pub trait StateObserver {
    fn on_transition(&mut self, change: &StateChange<'_>);
}

impl<F> StateObserver for F
where
    F: FnMut(&StateChange<'_>),
{
    fn on_transition(&mut self, change: &StateChange<'_>) {
        self(change);
    }
}

/// Ordered list of subscribed observers.
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<(ObserverId, Box<dyn StateObserver>)>,
    next_id: u32,
}

impl ObserverList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    pub fn notify(&mut self, change: &StateChange<'_>) {
        for (_, observer) in &mut self.observers {
            observer.on_transition(change);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
