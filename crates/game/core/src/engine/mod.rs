//! Turn scheduling pipeline.
//!
//! The [`TurnScheduler`] is the only writer of round, turn pointer, acting
//! faction and ledger on a [`CombatSession`]. Every mutation goes through
//! [`TurnScheduler::execute`], which reports what changed and which lifecycle
//! events the transition produced.

mod errors;
mod faction;
mod lifecycle;
mod turns;

pub use errors::SchedulerError;
pub use faction::next_acting_faction;
pub use lifecycle::{CombatantRef, LifecycleEvent, LifecycleKind};

use crate::env::CombatEnv;
use crate::state::{CombatSession, CombatantId, Faction, SessionDelta};

/// Mutating scheduler operation, as a value.
///
/// Local callers and remote invocation requests share this type, so a request
/// forwarded from an observer is executed exactly like a local call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnAction {
    /// Begin combat with the given side acting first.
    Start { first: Faction },
    /// Record that a combatant finished acting.
    MarkTurnTaken { combatant: CombatantId },
    /// Undo the most recent turn.
    PreviousTurn,
    /// Step back into the previous round.
    PreviousRound,
    /// Force the round to roll over.
    NextRound,
    /// Finish the encounter.
    EndCombat,
}

impl TurnAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnAction::Start { .. } => "start",
            TurnAction::MarkTurnTaken { .. } => "mark_turn_taken",
            TurnAction::PreviousTurn => "previous_turn",
            TurnAction::PreviousRound => "previous_round",
            TurnAction::NextRound => "next_round",
            TurnAction::EndCombat => "end_combat",
        }
    }
}

/// Complete outcome of a scheduler operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Which parts of the session changed.
    pub delta: SessionDelta,

    /// Lifecycle events, in emission order. Empty for undo operations.
    pub events: Vec<LifecycleEvent>,
}

/// Turn scheduler bound to one session and its environment.
pub struct TurnScheduler<'s, 'e> {
    session: &'s mut CombatSession,
    env: CombatEnv<'e>,
}

impl<'s, 'e> TurnScheduler<'s, 'e> {
    pub fn new(session: &'s mut CombatSession, env: CombatEnv<'e>) -> Self {
        Self { session, env }
    }

    /// Executes one operation.
    ///
    /// On error the session is left exactly as it was.
    pub fn execute(&mut self, action: TurnAction) -> Result<ExecutionOutcome, SchedulerError> {
        let before = self.session.clone();

        let events = match action {
            TurnAction::Start { first } => self.start(first)?,
            TurnAction::MarkTurnTaken { combatant } => self.mark_turn_taken(combatant)?,
            TurnAction::PreviousTurn => self.previous_turn()?,
            TurnAction::PreviousRound => self.previous_round()?,
            TurnAction::NextRound => self.next_round()?,
            TurnAction::EndCombat => self.end_combat()?,
        };

        Ok(ExecutionOutcome {
            delta: SessionDelta::from_sessions(action, &before, &*self.session),
            events,
        })
    }
}
