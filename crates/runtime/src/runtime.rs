//! High-level runtime orchestrator.
//!
//! The runtime claims authority on the transport, owns the host worker, and
//! exposes a builder-based API for clients to drive the scheduler.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use combat_core::{CombatSession, Combatant};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::oracle::{OracleManager, PieceRegistry, SettingsOracleImpl};
use crate::replication::{LocalTransport, Observer, PeerId, Transport};
use crate::repository::{FileSessionRepository, InMemorySessionRepo, SessionRepository};
use crate::workers::{HostChannels, HostWorker};

/// Main runtime: the authoritative host for one session.
///
/// [`RuntimeHandle`] provides a cloneable façade for local clients; remote
/// participants connect through the transport as [`Observer`]s.
pub struct Runtime {
    handle: RuntimeHandle,
    peer: PeerId,
    session_id: String,
    oracles: OracleManager,
    repository: Arc<dyn SessionRepository>,
    transport: Arc<dyn Transport>,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn peer(&self) -> PeerId {
        self.peer
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn repository(&self) -> Arc<dyn SessionRepository> {
        Arc::clone(&self.repository)
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Connects an observer to this runtime's session.
    ///
    /// The observer shares the host's transport, repository and oracles, as
    /// an in-process peer would.
    pub fn observer(&self, peer: PeerId) -> Result<Observer> {
        Observer::connect(
            peer,
            self.session_id.clone(),
            self.transport(),
            self.repository(),
            self.oracles.clone(),
        )
    }

    /// Shutdown the runtime gracefully
    ///
    /// Releases authority first, so observer requests arriving afterwards
    /// are refused rather than queued. Cloned handles fail with
    /// [`RuntimeError::CommandChannelClosed`] from then on.
    pub async fn shutdown(self) -> Result<()> {
        self.transport.release_authority(self.peer);
        self.handle.shutdown().await;
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!(session = %self.session_id, "runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    peer: PeerId,
    roster: Vec<Combatant>,
    oracles: Option<OracleManager>,
    repository: Option<Arc<dyn SessionRepository>>,
    transport: Option<Arc<dyn Transport>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            peer: PeerId(0),
            roster: Vec::new(),
            oracles: None,
            repository: None,
            transport: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Identity the host claims authority under
    pub fn peer(mut self, peer: PeerId) -> Self {
        self.peer = peer;
        self
    }

    /// Combatants to seed a new session with.
    ///
    /// When a stored session is resumed, only combatants it does not already
    /// know are added.
    pub fn roster(mut self, roster: impl IntoIterator<Item = Combatant>) -> Self {
        self.roster.extend(roster);
        self
    }

    /// Set the oracle manager.
    ///
    /// Defaults to an empty piece registry and settings taken from the config.
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Set the session repository.
    ///
    /// Defaults to files under [`RuntimeConfig::sessions_dir`] when persistence
    /// is enabled, in-memory storage otherwise.
    pub fn repository(mut self, repository: Arc<dyn SessionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set the transport. Defaults to a fresh [`LocalTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the runtime, claim authority and spawn the host worker.
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeBuilder {
            config,
            peer,
            roster,
            oracles,
            repository,
            transport,
        } = self;

        let oracles = oracles.unwrap_or_else(|| {
            OracleManager::new(
                Arc::new(PieceRegistry::new()),
                Arc::new(SettingsOracleImpl::new(config.skip_defeated)),
            )
        });
        let repository = match repository {
            Some(repository) => repository,
            None => default_repository(&config)?,
        };
        let transport = transport
            .unwrap_or_else(|| Arc::new(LocalTransport::new(config.event_buffer_size)));

        let session = initial_session(repository.as_ref(), &config.session_id, roster)?;
        repository.save(&config.session_id, &session)?;

        let request_rx = transport.claim_authority(peer, config.request_buffer_size)?;
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let worker = HostWorker::new(
            peer,
            config.session_id.clone(),
            session,
            oracles.clone(),
            Arc::clone(&repository),
            Arc::clone(&transport),
            HostChannels {
                command_rx,
                request_rx,
                event_bus: event_bus.clone(),
            },
        );
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            peer,
            session_id: config.session_id,
            oracles,
            repository,
            transport,
            worker_handle,
        })
    }
}

fn default_repository(config: &RuntimeConfig) -> Result<Arc<dyn SessionRepository>> {
    if !config.enable_persistence {
        return Ok(Arc::new(InMemorySessionRepo::new()));
    }

    let dir = config.sessions_dir().ok_or_else(|| {
        RuntimeError::InvalidConfig("persistence enabled but no save directory available".into())
    })?;
    Ok(Arc::new(FileSessionRepository::new(dir)?))
}

/// Resumes the stored session if there is one, otherwise starts a fresh one.
fn initial_session(
    repository: &dyn SessionRepository,
    session_id: &str,
    roster: Vec<Combatant>,
) -> Result<CombatSession> {
    match repository.load(session_id)? {
        Some(mut session) => {
            info!(
                "Resuming session {} at round {}",
                session_id,
                session.round()
            );
            for combatant in roster {
                if session.combatant(combatant.id).is_none() {
                    session.add_combatant(combatant)?;
                }
            }
            Ok(session)
        }
        None => Ok(CombatSession::with_combatants(roster)?),
    }
}
