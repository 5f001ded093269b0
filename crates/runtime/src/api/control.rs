//! Shared mutating surface for hosts and observers.

use async_trait::async_trait;

use combat_core::{CombatantId, Faction, TurnAction};

use super::errors::Result;

/// Scheduler operations a participant can request.
///
/// The host executes them directly; observers forward them to whoever holds
/// authority. Callers can drive either side through the same trait object.
#[async_trait]
pub trait TurnControl: Send + Sync {
    /// Submits a single scheduler operation.
    async fn submit(&self, action: TurnAction) -> Result<()>;

    async fn start(&self, first: Faction) -> Result<()> {
        self.submit(TurnAction::Start { first }).await
    }

    async fn mark_turn_taken(&self, combatant: CombatantId) -> Result<()> {
        self.submit(TurnAction::MarkTurnTaken { combatant }).await
    }

    async fn previous_turn(&self) -> Result<()> {
        self.submit(TurnAction::PreviousTurn).await
    }

    async fn previous_round(&self) -> Result<()> {
        self.submit(TurnAction::PreviousRound).await
    }

    async fn next_round(&self) -> Result<()> {
        self.submit(TurnAction::NextRound).await
    }

    async fn end_combat(&self) -> Result<()> {
        self.submit(TurnAction::EndCombat).await
    }
}
