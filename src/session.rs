use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::identifier::is_valid_identifier;

/// Session value to keep after visiting the project `candidate`.
///
/// An existing value always wins. Otherwise the candidate is taken only if it
/// is a valid identifier; invalid candidates are dropped without error.
pub fn validate_and_remember(candidate: &str, existing: Option<&str>) -> Option<String> {
    match existing {
        Some(current) => Some(current.to_string()),
        None if is_valid_identifier(candidate) => Some(candidate.to_string()),
        None => {
            debug!("Ignoring invalid project identifier {candidate:?}");
            None
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct SessionState {
    project_id: Option<String>,
}

/// "Current project" remembered between invocations.
///
/// Stored as JSON in the platform cache directory:
/// - Linux: `~/.cache/carenage/session.json`
/// - macOS: `~/Library/Caches/carenage/session.json`
pub struct SessionStore {
    session_file: PathBuf,
    state: SessionState,
    enabled: bool,
}

impl SessionStore {
    /// Opens the session store, loading any saved state.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be determined or created.
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            debug!("Session store disabled");
            return Ok(Self {
                session_file: PathBuf::new(),
                state: SessionState::default(),
                enabled: false,
            });
        }

        let session_dir = dirs::cache_dir()
            .ok_or_else(|| DashboardError::Session("No cache directory found".into()))?
            .join("carenage");
        fs::create_dir_all(&session_dir)?;

        Ok(Self::open(session_dir.join("session.json")))
    }

    fn open(session_file: PathBuf) -> Self {
        let mut state: SessionState = if session_file.exists() {
            fs::read_to_string(&session_file)
                .ok()
                .and_then(|content| serde_json::from_str(&content).ok())
                .inspect(|_| debug!("Loaded session from: {}", session_file.display()))
                .unwrap_or_else(|| {
                    warn!("Failed to load session, starting with an empty one");
                    SessionState::default()
                })
        } else {
            SessionState::default()
        };

        if let Some(id) = state.project_id.take() {
            if is_valid_identifier(&id) {
                state.project_id = Some(id);
            } else {
                warn!("Discarding stored project identifier {id:?}");
            }
        }

        Self {
            session_file,
            state,
            enabled: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.session_file
    }

    pub fn current_project(&self) -> Option<&str> {
        self.state.project_id.as_deref()
    }

    /// Applies [`validate_and_remember`] and persists the result if it changed.
    ///
    /// Returns whether a new project was remembered.
    pub fn remember_project(&mut self, candidate: &str) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let next = validate_and_remember(candidate, self.current_project());
        if next == self.state.project_id {
            return Ok(false);
        }

        self.state.project_id = next;
        self.save()?;
        info!("Remembered current project {candidate}");
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.state = SessionState::default();
        if self.enabled && self.session_file.exists() {
            fs::remove_file(&self.session_file)?;
            info!("Session cleared: {}", self.session_file.display());
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string(&self.state)?;
        fs::write(&self.session_file, content)?;
        debug!("Saved session to: {}", self.session_file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT_ID: &str = "3a1f9a71-fdd2-4e89-9769-70cfb731a02d";
    const OTHER_PROJECT_ID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::open(dir.path().join("session.json"))
    }

    #[test]
    fn test_validate_and_remember_takes_valid_candidate() {
        assert_eq!(
            validate_and_remember(PROJECT_ID, None),
            Some(PROJECT_ID.to_string())
        );
    }

    #[test]
    fn test_validate_and_remember_ignores_invalid_candidate() {
        assert_eq!(validate_and_remember("invalid-id", None), None);
        assert_eq!(
            validate_and_remember("invalid-id", Some(PROJECT_ID)),
            Some(PROJECT_ID.to_string())
        );
    }

    #[test]
    fn test_validate_and_remember_keeps_existing_value() {
        assert_eq!(
            validate_and_remember(OTHER_PROJECT_ID, Some(PROJECT_ID)),
            Some(PROJECT_ID.to_string())
        );
    }

    #[test]
    fn test_store_disabled() {
        let mut store = SessionStore::new(false).unwrap();
        assert!(!store.remember_project(PROJECT_ID).unwrap());
        assert!(store.current_project().is_none());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_remember_persists_across_reloads() {
        let dir = TempDir::new().unwrap();

        let mut store = store_in(&dir);
        assert!(store.remember_project(PROJECT_ID).unwrap());
        assert!(store.path().exists());

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.current_project(), Some(PROJECT_ID));
    }

    #[test]
    fn test_remember_does_not_overwrite() {
        let dir = TempDir::new().unwrap();

        let mut store = store_in(&dir);
        store.remember_project(PROJECT_ID).unwrap();
        assert!(!store.remember_project(OTHER_PROJECT_ID).unwrap());

        assert_eq!(store_in(&dir).current_project(), Some(PROJECT_ID));
    }

    #[test]
    fn test_invalid_candidate_writes_nothing() {
        let dir = TempDir::new().unwrap();

        let mut store = store_in(&dir);
        assert!(!store.remember_project("invalid-id").unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_clear_removes_session_file() {
        let dir = TempDir::new().unwrap();

        let mut store = store_in(&dir);
        store.remember_project(PROJECT_ID).unwrap();
        store.clear().unwrap();

        assert!(store.current_project().is_none());
        assert!(!store.path().exists());
        assert!(store.remember_project(OTHER_PROJECT_ID).unwrap());
    }

    #[test]
    fn test_corrupt_session_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("session.json"), "{not json").unwrap();

        assert!(store_in(&dir).current_project().is_none());
    }

    #[test]
    fn test_tampered_project_id_is_discarded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("session.json"),
            r#"{"project_id": "../../etc/passwd"}"#,
        )
        .unwrap();

        assert!(store_in(&dir).current_project().is_none());
    }
}
