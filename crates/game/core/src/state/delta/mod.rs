use crate::engine::TurnAction;
use crate::state::CombatSession;

/// Minimal description of what a scheduler operation changed.
///
/// Carries flags, not values: consumers that need the new round or turn
/// re-read the session, which stays the single source of truth.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionDelta {
    /// The operation that caused this transition.
    pub action: TurnAction,

    /// Round number after the operation.
    pub round: u32,

    /// The round counter moved.
    pub round_changed: bool,

    /// The turn pointer or the acting faction moved.
    pub turn_changed: bool,

    /// The ledger gained or lost entries.
    pub ledger_changed: bool,
}

impl SessionDelta {
    /// Creates a delta by comparing two sessions.
    pub fn from_sessions(action: TurnAction, before: &CombatSession, after: &CombatSession) -> Self {
        Self {
            action,
            round: after.round,
            round_changed: before.round != after.round,
            turn_changed: before.turn != after.turn
                || before.current_acting_faction != after.current_acting_faction,
            ledger_changed: before.ledger != after.ledger,
        }
    }

    /// Returns true if the operation left round, turn and ledger untouched.
    pub fn is_empty(&self) -> bool {
        !self.round_changed && !self.turn_changed && !self.ledger_changed
    }
}
