//! Host worker that owns the authoritative [`combat_core::CombatSession`].
//!
//! Receives commands from [`crate::RuntimeHandle`] and requests forwarded by
//! observers, executes them via [`combat_core::TurnScheduler`], persists the
//! result, and announces it on the event bus and the transport.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use combat_core::{
    CombatSession, Combatant, ExecutionOutcome, SessionView, TurnAction, TurnScheduler,
};

use crate::api::Result;
use crate::events::{Event, EventBus};
use crate::oracle::OracleManager;
use crate::replication::{PeerId, RemoteRequest, ReplicationNotice, Transport};
use crate::repository::SessionRepository;

/// Commands that can be sent to the host worker
pub enum Command {
    /// Execute a scheduler operation.
    Execute {
        action: TurnAction,
        reply: oneshot::Sender<Result<ExecutionOutcome>>,
    },
    /// Add a combatant to the roster.
    AddCombatant {
        combatant: Combatant,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the current session (read-only).
    QuerySession { reply: oneshot::Sender<CombatSession> },
    /// Query derived state of the current session.
    QueryView { reply: oneshot::Sender<SessionView> },
    /// Stop the worker even if handles are still alive.
    Shutdown,
}

/// Inbound channels and the bus the worker publishes to.
pub struct HostChannels {
    pub command_rx: mpsc::Receiver<Command>,
    pub request_rx: mpsc::Receiver<RemoteRequest>,
    pub event_bus: EventBus,
}

/// Background task that serializes every mutation of the session.
pub struct HostWorker {
    peer: PeerId,
    session_id: String,
    session: CombatSession,
    oracles: OracleManager,
    repository: Arc<dyn SessionRepository>,
    transport: Arc<dyn Transport>,
    event_bus: EventBus,
    command_rx: mpsc::Receiver<Command>,
    request_rx: mpsc::Receiver<RemoteRequest>,
}

impl HostWorker {
    pub fn new(
        peer: PeerId,
        session_id: String,
        session: CombatSession,
        oracles: OracleManager,
        repository: Arc<dyn SessionRepository>,
        transport: Arc<dyn Transport>,
        channels: HostChannels,
    ) -> Self {
        info!(
            "HostWorker initialized for session {} at round {} with {} combatants",
            session_id,
            session.round(),
            session.combatants().len()
        );

        Self {
            peer,
            session_id,
            session,
            oracles,
            repository,
            transport,
            event_bus: channels.event_bus,
            command_rx: channels.command_rx,
            request_rx: channels.request_rx,
        }
    }

    /// Main worker loop.
    ///
    /// Ends on [`Command::Shutdown`] or once every local handle is dropped.
    /// Authority is released on the way out so later requests are refused
    /// instead of queued.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    if self.handle_command(cmd).is_break() {
                        break;
                    }
                }
                Some(request) = self.request_rx.recv() => {
                    self.handle_request(request);
                }
            }
        }

        self.transport.release_authority(self.peer);
        debug!(session = %self.session_id, "host worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) -> ControlFlow<()> {
        match cmd {
            Command::Execute { action, reply } => {
                let result = self.execute(action, self.peer);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Command::AddCombatant { combatant, reply } => {
                let result = self.add_combatant(combatant);
                if reply.send(result).is_err() {
                    debug!("AddCombatant reply channel closed (caller dropped)");
                }
            }
            Command::QuerySession { reply } => {
                if reply.send(self.session.clone()).is_err() {
                    debug!("QuerySession reply channel closed (caller dropped)");
                }
            }
            Command::QueryView { reply } => {
                let view = SessionView::capture(&self.session, &self.oracles.as_combat_env());
                if reply.send(view).is_err() {
                    debug!("QueryView reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Nobody waits on a remote request, so failures are only logged.
    fn handle_request(&mut self, request: RemoteRequest) {
        if let Err(e) = self.execute(request.action, request.origin) {
            warn!(
                origin = %request.origin,
                action = request.action.as_str(),
                error = %e,
                "rejected remote request"
            );
        }
    }

    /// Runs one operation against a working copy and commits it once it has
    /// been persisted.
    fn execute(&mut self, action: TurnAction, origin: PeerId) -> Result<ExecutionOutcome> {
        let mut working = self.session.clone();
        let outcome =
            TurnScheduler::new(&mut working, self.oracles.as_combat_env()).execute(action)?;

        self.repository.save(&self.session_id, &working)?;
        self.session = working;

        info!(
            %origin,
            action = action.as_str(),
            round = self.session.round(),
            turn = ?self.session.turn(),
            faction = ?self.session.current_acting_faction(),
            "executed"
        );

        for event in &outcome.events {
            self.event_bus.publish(Event::Lifecycle(event.clone()));
        }
        self.announce(ReplicationNotice::from_delta(&outcome.delta));

        Ok(outcome)
    }

    fn add_combatant(&mut self, combatant: Combatant) -> Result<()> {
        let mut working = self.session.clone();
        let id = combatant.id;
        working.add_combatant(combatant)?;

        self.repository.save(&self.session_id, &working)?;
        self.session = working;

        info!(combatant = %id, "combatant joined");

        // A newcomer changes who is left to act.
        self.announce(vec![ReplicationNotice::TurnChanged]);
        Ok(())
    }

    fn announce(&self, notices: Vec<ReplicationNotice>) {
        for notice in notices {
            self.event_bus.publish(Event::Replication(notice));
            if let Err(e) = self.transport.broadcast(notice) {
                warn!(?notice, error = %e, "failed to broadcast change notice");
            }
        }
    }
}
