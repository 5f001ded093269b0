//! Cloneable façade for issuing commands to the host.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the scheduler or streaming events from specific topics.
use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use combat_core::{CombatSession, Combatant, ExecutionOutcome, SessionView, TurnAction};

use super::control::TurnControl;
use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to the authoritative host
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Execute a scheduler operation and wait for its outcome.
    pub async fn execute(&self, action: TurnAction) -> Result<ExecutionOutcome> {
        self.request(|reply| Command::Execute { action, reply }).await?
    }

    /// Add a combatant to the roster, before or during combat.
    pub async fn add_combatant(&self, combatant: Combatant) -> Result<()> {
        self.request(|reply| Command::AddCombatant { combatant, reply }).await?
    }

    /// Query the current session (read-only snapshot)
    pub async fn query_session(&self) -> Result<CombatSession> {
        self.request(|reply| Command::QuerySession { reply }).await
    }

    /// Query round, turn, factions and who is left to act
    pub async fn query_view(&self) -> Result<SessionView> {
        self.request(|reply| Command::QueryView { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Lifecycle` - combat, round and turn boundaries
    /// - `Topic::Replication` - change notices sent to observers
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use combat_runtime::Topic;
    ///
    /// let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    /// while let Ok(event) = lifecycle.recv().await {
    ///     // React to turn boundaries
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Asks the worker to stop. A worker that is already gone is fine.
    pub(crate) async fn shutdown(&self) {
        if self.command_tx.send(Command::Shutdown).await.is_err() {
            debug!("host worker already stopped before shutdown");
        }
    }
}

#[async_trait]
impl TurnControl for RuntimeHandle {
    async fn submit(&self, action: TurnAction) -> Result<()> {
        self.execute(action).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_after_worker_exit_is_quiet() {
        let (command_tx, command_rx) = mpsc::channel(1);
        drop(command_rx);
        let handle = RuntimeHandle::new(command_tx, EventBus::with_capacity(1));

        handle.shutdown().await;
        assert!(matches!(
            handle.query_view().await,
            Err(RuntimeError::CommandChannelClosed)
        ));
    }
}
