//! Session persistence abstraction.
//!
//! The session layer persists one durable record (token + profile snapshot)
//! through this narrow trait, so the transition logic stays independent of
//! where the record actually lives (file, memory, encrypted store, ...).

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use super::types::SessionSnapshot;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable holder for the serialized session record.
///
/// Writes completed before a process restart must be observed by the next
/// `load`.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load the persisted record, if any.
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Persist the record, replacing any previous one.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError>;

    /// Remove the persisted record. Idempotent.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// File-backed storage: one JSON file, written atomically
/// (temp file in the same directory, then rename).
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut p = self.path.clone().into_os_string();
        p.push(".tmp");
        PathBuf::from(p)
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let snapshot = serde_json::from_slice(&bytes)?;
                Ok(Some(snapshot))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(snapshot)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "Session snapshot persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<SessionSnapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        *self.inner.lock() = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.inner.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_token(token: &str) -> SessionSnapshot {
        SessionSnapshot {
            access_token: Some(token.to_string()),
            user: None,
        }
    }

    #[tokio::test]
    async fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().await.unwrap().is_none());

        storage.save(&snapshot_with_token("t0")).await.unwrap();
        let loaded = storage.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token.as_deref(), Some("t0"));

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
        // clear is idempotent
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn file_storage_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let storage = FileStorage::new(&path);
            storage.save(&snapshot_with_token("t1")).await.unwrap();
        }

        // A new instance over the same path observes the prior write.
        let storage = FileStorage::new(&path);
        let loaded = storage.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token.as_deref(), Some("t1"));

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn file_storage_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nope.json"));
        assert!(storage.load().await.unwrap().is_none());
    }
}
