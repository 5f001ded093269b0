//! Repository layer for dynamic runtime data.
//!
//! Repositories hold the combat session as it changes during an encounter.
//! Piece data and settings are read through oracles, not repositories.

mod error;
mod file;
mod state;
mod traits;

pub use error::RepositoryError;
pub use file::FileSessionRepository;
pub use state::InMemorySessionRepo;
pub use traits::SessionRepository;
