//! Host-authoritative replication.
//!
//! Exactly one peer holds authority and owns the session. Observers forward
//! their requests through a [`Transport`] and follow the host through
//! payload-free change notices.

mod observer;
mod transport;
mod types;

pub use observer::{Observer, ObserverProxy};
pub use transport::{LocalTransport, Transport, TransportError};
pub use types::{PeerId, RemoteRequest, ReplicationNotice};
