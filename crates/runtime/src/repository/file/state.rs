//! File-based SessionRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use combat_core::CombatSession;

use crate::api::Result;
use crate::repository::{RepositoryError, SessionRepository};

/// File-based implementation of SessionRepository.
///
/// Sessions are stored as `session_{id}.bin` in bincode format. Writes go to a
/// temp file first and are renamed into place, so a crash never leaves a
/// half-written session behind.
pub struct FileSessionRepository {
    base_dir: PathBuf,
}

impl FileSessionRepository {
    /// Create a new file-based session repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    fn session_path(&self, session_id: &str) -> Result<PathBuf> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::InvalidSessionId(session_id.to_owned()).into());
        }
        Ok(self.base_dir.join(format!("session_{}.bin", session_id)))
    }
}

impl SessionRepository for FileSessionRepository {
    fn save(&self, session_id: &str, session: &CombatSession) -> Result<()> {
        let path = self.session_path(session_id)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(session)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            "Saved session[{}] at round {} to {}",
            session_id,
            session.round(),
            path.display()
        );

        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<CombatSession>> {
        let path = self.session_path(session_id)?;

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let session: CombatSession = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded session[{}] from {}", session_id, path.display());

        Ok(Some(session))
    }

    fn exists(&self, session_id: &str) -> bool {
        self.session_path(session_id)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        let path = self.session_path(session_id)?;

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted session[{}]", session_id);
        }

        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("session_")
                    .and_then(|s| s.strip_suffix(".bin"))
            {
                ids.push(id.to_owned());
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RuntimeError;
    use combat_core::{Combatant, CombatantId, PieceId};

    #[test]
    fn saves_and_lists_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();
        let session = CombatSession::with_combatants([
            Combatant::new(CombatantId(1), PieceId(10)).with_name("Aria"),
        ])
        .unwrap();

        repo.save("tavern-brawl", &session).unwrap();
        repo.save("ambush", &CombatSession::new()).unwrap();

        assert_eq!(repo.load("tavern-brawl").unwrap(), Some(session));
        assert_eq!(repo.list_sessions().unwrap(), vec!["ambush", "tavern-brawl"]);
        assert!(!dir.path().join("session_ambush.bin.tmp").exists());
    }

    #[test]
    fn missing_session_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();

        assert_eq!(repo.load("nothing").unwrap(), None);
        assert!(!repo.exists("nothing"));
        repo.delete("nothing").unwrap();
    }

    #[test]
    fn rejects_path_like_session_ids() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();

        let err = repo.save("../escape", &CombatSession::new()).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Repository(RepositoryError::InvalidSessionId(_))
        ));
    }
}
