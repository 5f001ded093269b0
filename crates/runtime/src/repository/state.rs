//! In-memory SessionRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::CombatSession;

use crate::api::Result;
use crate::repository::{RepositoryError, SessionRepository};

/// In-memory implementation of SessionRepository.
pub struct InMemorySessionRepo {
    sessions: RwLock<HashMap<String, CombatSession>>,
}

impl InMemorySessionRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRepository for InMemorySessionRepo {
    fn save(&self, session_id: &str, session: &CombatSession) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.insert(session_id.to_owned(), session.clone());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<CombatSession>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(sessions.get(session_id).cloned())
    }

    fn exists(&self, session_id: &str) -> bool {
        self.sessions
            .read()
            .map(|sessions| sessions.contains_key(session_id))
            .unwrap_or(false)
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        sessions.remove(session_id);
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
