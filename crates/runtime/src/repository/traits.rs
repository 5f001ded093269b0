//! Repository contracts for saving and loading combat sessions.

use combat_core::CombatSession;

use crate::api::Result;

/// Repository for session persistence and loading.
///
/// The host writes every committed session here before announcing the change,
/// so the stored copy is what observers re-read when they resynchronize and
/// what a restarted host resumes from.
pub trait SessionRepository: Send + Sync {
    /// Save a session under its id, replacing any previous copy.
    fn save(&self, session_id: &str, session: &CombatSession) -> Result<()>;

    /// Load a session by id.
    fn load(&self, session_id: &str) -> Result<Option<CombatSession>>;

    /// Check if a session exists.
    fn exists(&self, session_id: &str) -> bool {
        matches!(self.load(session_id), Ok(Some(_)))
    }

    /// Delete a session. Deleting a missing session is not an error.
    fn delete(&self, session_id: &str) -> Result<()>;

    /// List all stored session ids, sorted.
    fn list_sessions(&self) -> Result<Vec<String>>;
}
