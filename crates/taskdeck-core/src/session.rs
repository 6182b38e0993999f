//! Session persistence
//!
//! Stores the access/refresh token pair in a JSON file under the data
//! directory, the client-side analogue of browser storage. No expiry
//! checking happens here: token validity is decided solely by server
//! response codes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// The persisted token pair
///
/// The refresh token is stored but not used for renewal by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// File-backed store for the active session
///
/// An explicit value handed to the API client, not ambient global state.
/// All reads go to disk so that a clear performed by one holder (e.g. the
/// 401 handler) is visible to every other holder immediately.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist a token pair, replacing any existing session
    pub fn set(&self, access: &str, refresh: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory: {:?}", parent))?;
        }

        let pair = TokenPair {
            access: access.to_string(),
            refresh: refresh.to_string(),
        };
        let content = serde_json::to_string(&pair).context("Failed to serialize session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.path))?;
        debug!("Session stored at {:?}", self.path);
        Ok(())
    }

    /// The stored access token, if a session is active
    pub fn access(&self) -> Option<String> {
        self.read().map(|pair| pair.access)
    }

    /// The stored refresh token, if a session is active
    pub fn refresh(&self) -> Option<String> {
        self.read().map(|pair| pair.refresh)
    }

    /// Whether an access token is present
    pub fn is_authenticated(&self) -> bool {
        self.access().is_some()
    }

    /// Remove the stored session, if any
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove session file: {:?}", self.path))
            }
        }
    }

    fn read(&self) -> Option<TokenPair> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_no_session_initially() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        assert!(!store.is_authenticated());
        assert!(store.access().is_none());
        assert!(store.refresh().is_none());
    }

    #[test]
    fn test_set_and_read_tokens() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.set("access-abc", "refresh-xyz").unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.access().as_deref(), Some("access-abc"));
        assert_eq!(store.refresh().as_deref(), Some("refresh-xyz"));
    }

    #[test]
    fn test_set_replaces_existing_session() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.set("old-access", "old-refresh").unwrap();
        store.set("new-access", "new-refresh").unwrap();

        assert_eq!(store.access().as_deref(), Some("new-access"));
        assert_eq!(store.refresh().as_deref(), Some("new-refresh"));
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.set("access", "refresh").unwrap();
        store.clear().unwrap();

        assert!(!store.is_authenticated());
        assert!(store.access().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_clear_visible_across_clones() {
        let dir = tempdir().unwrap();
        let store = store(&dir);
        let other = store.clone();

        store.set("access", "refresh").unwrap();
        assert!(other.is_authenticated());

        other.clear().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_corrupt_session_file_reads_as_no_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = SessionStore::new(path);
        assert!(!store.is_authenticated());
    }
}
