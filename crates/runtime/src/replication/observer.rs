//! Non-authoritative participants.
//!
//! An [`Observer`] mirrors the host's session without ever mutating it. Change
//! notices only say *that* something changed; the observer then re-reads the
//! authoritative copy from the shared repository, so a missed or lagged
//! notice is repaired by the next one (or by an explicit [`Observer::resync`]).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use combat_core::{CombatSession, SessionView, TurnAction};

use super::{PeerId, RemoteRequest, ReplicationNotice, Transport, TransportError};
use crate::api::{Result, RuntimeError, TurnControl};
use crate::oracle::OracleManager;
use crate::repository::SessionRepository;

/// Forwards scheduler operations to the authority.
///
/// Every call returns once the request is handed to the transport. The host
/// may still reject it; observers learn the outcome through replication.
#[derive(Clone)]
pub struct ObserverProxy {
    peer: PeerId,
    transport: Arc<dyn Transport>,
}

impl ObserverProxy {
    pub fn new(peer: PeerId, transport: Arc<dyn Transport>) -> Self {
        Self { peer, transport }
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }
}

#[async_trait]
impl TurnControl for ObserverProxy {
    async fn submit(&self, action: TurnAction) -> Result<()> {
        debug!(peer = %self.peer, action = action.as_str(), "forwarding request to host");
        self.transport
            .invoke(RemoteRequest {
                origin: self.peer,
                action,
            })
            .await
    }
}

/// Replicated, read-only view of a session owned by some host.
pub struct Observer {
    proxy: ObserverProxy,
    session_id: String,
    repository: Arc<dyn SessionRepository>,
    oracles: OracleManager,
    replica_tx: Arc<watch::Sender<CombatSession>>,
    replica: watch::Receiver<CombatSession>,
    listener: JoinHandle<()>,
}

impl Observer {
    /// Connects an observer and loads the current session.
    ///
    /// Must be called from within a Tokio runtime; the notice listener runs as
    /// a background task until the observer is dropped.
    pub fn connect(
        peer: PeerId,
        session_id: impl Into<String>,
        transport: Arc<dyn Transport>,
        repository: Arc<dyn SessionRepository>,
        oracles: OracleManager,
    ) -> Result<Self> {
        let session_id = session_id.into();
        let notices = transport.subscribe();
        let initial = repository.load(&session_id)?.unwrap_or_default();

        let (replica_tx, replica) = watch::channel(initial);
        let replica_tx = Arc::new(replica_tx);

        let listener = tokio::spawn(listen(
            notices,
            Arc::clone(&repository),
            session_id.clone(),
            Arc::clone(&replica_tx),
        ));

        debug!(%peer, session = %session_id, "observer connected");

        Ok(Self {
            proxy: ObserverProxy::new(peer, transport),
            session_id,
            repository,
            oracles,
            replica_tx,
            replica,
            listener,
        })
    }

    pub fn peer(&self) -> PeerId {
        self.proxy.peer()
    }

    /// Request forwarding for this observer.
    pub fn control(&self) -> &ObserverProxy {
        &self.proxy
    }

    /// Copy of the replicated session.
    pub fn session(&self) -> CombatSession {
        self.replica.borrow().clone()
    }

    /// Derived state of the replicated session, evaluated against the
    /// current piece data.
    pub fn view(&self) -> SessionView {
        let session = self.replica.borrow();
        SessionView::capture(&session, &self.oracles.as_combat_env())
    }

    /// Re-reads the authoritative session right now.
    pub fn resync(&self) -> Result<()> {
        resync_from(self.repository.as_ref(), &self.session_id, &self.replica_tx)
    }

    /// Waits for the next replicated update.
    pub async fn changed(&mut self) -> Result<()> {
        self.replica
            .changed()
            .await
            .map_err(|_| RuntimeError::Transport(TransportError::Closed))
    }

    /// Waits until the replicated session satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&CombatSession) -> bool,
    ) -> Result<CombatSession> {
        self.replica
            .wait_for(predicate)
            .await
            .map(|session| session.clone())
            .map_err(|_| RuntimeError::Transport(TransportError::Closed))
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

async fn listen(
    mut notices: broadcast::Receiver<ReplicationNotice>,
    repository: Arc<dyn SessionRepository>,
    session_id: String,
    replica: Arc<watch::Sender<CombatSession>>,
) {
    loop {
        match notices.recv().await {
            Ok(notice) => trace!(?notice, "replication notice"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "observer missed notices; resyncing");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }

        if let Err(e) = resync_from(repository.as_ref(), &session_id, &replica) {
            warn!(session = %session_id, error = %e, "failed to resync observer");
        }
    }
}

fn resync_from(
    repository: &dyn SessionRepository,
    session_id: &str,
    replica: &watch::Sender<CombatSession>,
) -> Result<()> {
    let session = repository.load(session_id)?.unwrap_or_default();
    replica.send_replace(session);
    Ok(())
}
