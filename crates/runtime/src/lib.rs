//! Host-authoritative runtime for the combat turn scheduler.
//!
//! This crate wires together oracle access, session repositories, the
//! replication transport and the host worker into a cohesive runtime API.
//! Consumers embed [`Runtime`] to host a session and drive it through
//! [`RuntimeHandle`]; other participants follow along as [`Observer`]s.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for lifecycle and change notices
//! - [`replication`] carries requests to the host and notices back out
//! - [`workers`] keeps background tasks internal to the crate
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
//! - [`scenario`] loads encounter files
pub mod api;
pub mod config;
pub mod events;
pub mod oracle;
pub mod replication;
pub mod repository;
pub mod runtime;
pub mod scenario;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle, TurnControl};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, Topic};
pub use oracle::{OracleManager, PieceRegistry, SettingsOracleImpl};
pub use replication::{
    LocalTransport, Observer, ObserverProxy, PeerId, RemoteRequest, ReplicationNotice, Transport,
    TransportError,
};
pub use repository::{
    FileSessionRepository, InMemorySessionRepo, RepositoryError, SessionRepository,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use scenario::{CombatantSpec, Encounter};
