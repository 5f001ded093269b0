//! Error types for the turn scheduling pipeline.

use crate::state::CombatantId;

/// Errors surfaced by [`super::TurnScheduler`] operations.
///
/// These are usage errors, not transient faults: every variant is returned
/// before any mutation, and none of them should be retried as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerError {
    #[error("combat has not started")]
    NotStarted,

    #[error("combat has already started (round {round})")]
    InvalidState { round: u32 },

    #[error("combatant {id} is not part of this combat")]
    UnknownCombatant { id: CombatantId },

    #[error("combatant {id} has already spent all {budget} action(s) this round")]
    BudgetExhausted { id: CombatantId, budget: u32 },

    #[error("no earlier turn to step back to")]
    NothingToUndo,

    #[error("combatant {id} is already part of this combat")]
    DuplicateCombatant { id: CombatantId },
}
