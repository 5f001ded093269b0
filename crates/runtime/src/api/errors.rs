//! Unified error types surfaced by the runtime API.
//!
//! Wraps scheduler rejections, worker coordination failures, repositories and
//! the replication transport so clients can bubble them up with consistent
//! context.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::SchedulerError;

pub use crate::replication::{PeerId, TransportError};
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("no authoritative host is available to execute the request")]
    NoAuthority,

    #[error("authority is already held by {holder}")]
    AuthorityAlreadyClaimed { holder: PeerId },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("host worker command channel closed")]
    CommandChannelClosed,

    #[error("host worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("host worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),
}
