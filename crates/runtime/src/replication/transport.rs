//! Transport between the authoritative host and its observers.
//!
//! The host claims authority and receives forwarded requests on a private
//! channel. Everyone else may invoke requests and listen for change notices.
//! [`LocalTransport`] connects participants living in the same process;
//! networked transports implement the same trait.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, trace, warn};

use super::{PeerId, RemoteRequest, ReplicationNotice};
use crate::api::{Result, RuntimeError};

/// Failures of the underlying transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("the host stopped accepting requests")]
    HostUnreachable,

    #[error("transport state lock was poisoned")]
    LockPoisoned,

    #[error("notice channel closed")]
    Closed,
}

/// Messaging between host and observers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Registers `peer` as the single authority and returns the stream of
    /// forwarded requests. Fails while another live peer holds authority.
    fn claim_authority(&self, peer: PeerId, buffer: usize)
    -> Result<mpsc::Receiver<RemoteRequest>>;

    /// Gives up authority if `peer` holds it.
    fn release_authority(&self, peer: PeerId);

    /// Current authority, if any.
    fn authority(&self) -> Option<PeerId>;

    /// Forwards a request to the authority.
    ///
    /// Delivery is fire-and-forget: the request is not executed by the time
    /// this returns. With no authority registered the request is dropped and
    /// [`RuntimeError::NoAuthority`] is returned.
    async fn invoke(&self, request: RemoteRequest) -> Result<()>;

    /// Sends a change notice to every listener.
    fn broadcast(&self, notice: ReplicationNotice) -> Result<()>;

    /// Starts listening for change notices.
    fn subscribe(&self) -> broadcast::Receiver<ReplicationNotice>;
}

#[derive(Clone)]
struct HostSlot {
    peer: PeerId,
    requests: mpsc::Sender<RemoteRequest>,
}

struct Shared {
    host: RwLock<Option<HostSlot>>,
    notices: broadcast::Sender<ReplicationNotice>,
}

/// In-process transport.
#[derive(Clone)]
pub struct LocalTransport {
    shared: Arc<Shared>,
}

impl LocalTransport {
    pub fn new(notice_capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                host: RwLock::new(None),
                notices: broadcast::channel(notice_capacity.max(1)).0,
            }),
        }
    }

    fn host(&self) -> Result<Option<HostSlot>> {
        let host = self
            .shared
            .host
            .read()
            .map_err(|_| TransportError::LockPoisoned)?;
        Ok(host.clone())
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl Transport for LocalTransport {
    fn claim_authority(
        &self,
        peer: PeerId,
        buffer: usize,
    ) -> Result<mpsc::Receiver<RemoteRequest>> {
        let mut host = self
            .shared
            .host
            .write()
            .map_err(|_| TransportError::LockPoisoned)?;

        if let Some(slot) = host.as_ref()
            && slot.peer != peer
            && !slot.requests.is_closed()
        {
            return Err(RuntimeError::AuthorityAlreadyClaimed { holder: slot.peer });
        }

        let (tx, rx) = mpsc::channel(buffer.max(1));
        *host = Some(HostSlot { peer, requests: tx });
        debug!(%peer, "authority claimed");
        Ok(rx)
    }

    fn release_authority(&self, peer: PeerId) {
        let Ok(mut host) = self.shared.host.write() else {
            return;
        };
        if host.as_ref().is_some_and(|slot| slot.peer == peer) {
            *host = None;
            debug!(%peer, "authority released");
        }
    }

    fn authority(&self) -> Option<PeerId> {
        self.host().ok().flatten().map(|slot| slot.peer)
    }

    async fn invoke(&self, request: RemoteRequest) -> Result<()> {
        let Some(slot) = self.host()? else {
            warn!(
                origin = %request.origin,
                action = request.action.as_str(),
                "no authority registered; dropping request"
            );
            return Err(RuntimeError::NoAuthority);
        };

        slot.requests
            .send(request)
            .await
            .map_err(|_| TransportError::HostUnreachable)?;
        trace!(origin = %request.origin, host = %slot.peer, "request forwarded");
        Ok(())
    }

    fn broadcast(&self, notice: ReplicationNotice) -> Result<()> {
        if self.shared.notices.send(notice).is_err() {
            trace!(?notice, "no observers listening");
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ReplicationNotice> {
        self.shared.notices.subscribe()
    }
}
