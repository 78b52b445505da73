//! Durable storage for the current access key.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use journey_core::{AccessKey, JourneyError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Well-known name the key is stored under.
pub const SESSION_KEY_NAME: &str = "userKey";

/// Where the current access key survives between runs.
///
/// Holders of a backend client must rebuild it after any write here;
/// [`crate::Session`] does that for its own client.
pub trait SessionStore: Send {
    fn current_key(&self) -> Result<Option<AccessKey>>;
    fn set_current_key(&mut self, key: &AccessKey) -> Result<()>;
    fn clear_current_key(&mut self) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "userKey", default, skip_serializing_if = "Option::is_none")]
    user_key: Option<String>,
}

/// JSON file holding `{"userKey": "..."}`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|e| io_error(&self.path, e))?;
        if raw.trim().is_empty() {
            return Ok(SessionFile::default());
        }
        serde_json::from_str(&raw).map_err(|e| {
            JourneyError::SessionStore(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    fn write(&self, file: &SessionFile) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        }
        let body = serde_json::to_string_pretty(file)
            .map_err(|e| JourneyError::SessionStore(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| io_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> JourneyError {
    JourneyError::SessionStore(format!("{}: {err}", path.display()))
}

impl SessionStore for FileSessionStore {
    fn current_key(&self) -> Result<Option<AccessKey>> {
        Ok(self
            .read()?
            .user_key
            .as_deref()
            .and_then(AccessKey::parse))
    }

    fn set_current_key(&mut self, key: &AccessKey) -> Result<()> {
        debug!(path = %self.path.display(), key = key.short(), "persist access key");
        self.write(&SessionFile {
            user_key: Some(key.as_str().to_string()),
        })
    }

    fn clear_current_key(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "clear access key");
        std::fs::remove_file(&self.path).map_err(|e| io_error(&self.path, e))
    }
}

/// In-process store. Clones share the same slot, so a test can keep one
/// handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<AccessKey>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: AccessKey) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(key))),
        }
    }

    /// Current contents without going through the trait.
    pub fn peek(&self) -> Option<AccessKey> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or(None)
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<AccessKey>>> {
        self.slot
            .lock()
            .map_err(|_| JourneyError::SessionStore("session slot poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn current_key(&self) -> Result<Option<AccessKey>> {
        Ok(self.slot()?.clone())
    }

    fn set_current_key(&mut self, key: &AccessKey) -> Result<()> {
        *self.slot()? = Some(key.clone());
        Ok(())
    }

    fn clear_current_key(&mut self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_under_well_known_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state").join("session.json");
        let mut store = FileSessionStore::new(&path);

        assert_eq!(store.current_key().expect("empty"), None);

        let key = AccessKey::generate();
        store.set_current_key(&key).expect("set");
        assert_eq!(store.current_key().expect("get"), Some(key.clone()));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(raw[SESSION_KEY_NAME], key.as_str());

        store.clear_current_key().expect("clear");
        assert!(!path.exists());
        assert_eq!(store.current_key().expect("cleared"), None);
        store.clear_current_key().expect("clear twice");
    }

    #[test]
    fn file_store_ignores_blank_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"userKey": "   "}"#).expect("write");
        assert_eq!(FileSessionStore::new(&path).current_key().expect("get"), None);

        std::fs::write(&path, "").expect("write");
        assert_eq!(FileSessionStore::new(&path).current_key().expect("get"), None);
    }

    #[test]
    fn corrupt_file_is_a_session_store_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write");
        let err = FileSessionStore::new(&path)
            .current_key()
            .expect_err("corrupt");
        assert!(matches!(err, JourneyError::SessionStore(_)));
    }

    #[test]
    fn memory_store_clones_share_state() {
        let observer = MemorySessionStore::new();
        let mut owner = observer.clone();
        let key = AccessKey::generate();
        owner.set_current_key(&key).expect("set");
        assert_eq!(observer.peek(), Some(key));
        owner.clear_current_key().expect("clear");
        assert_eq!(observer.peek(), None);
    }
}
