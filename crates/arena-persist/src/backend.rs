//! Ledger store trait and error types

use async_trait::async_trait;
use std::fmt::Debug;

use arena_core::ExperimentHistory;

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Ledger was modified concurrently (loaded version {expected}, stored version {found})")]
    VersionConflict { expected: u64, found: u64 },
}

impl StorageError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::VersionConflict { .. })
    }
}

/// Repository for the whole rating ledger document
///
/// `save` only succeeds when the stored ledger still has the version the
/// caller loaded; it then writes the document with the next version and
/// returns that version.
#[async_trait]
pub trait LedgerStore: Send + Sync + Debug {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Load the ledger; a missing ledger is an empty history at version 0
    async fn load(&self) -> Result<ExperimentHistory, StorageError>;

    /// Replace the ledger as one unit
    async fn save(&self, history: &ExperimentHistory) -> Result<u64, StorageError>;
}

/// In-memory ledger store (for testing)
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    data: tokio::sync::Mutex<ExperimentHistory>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing history
    pub fn with_history(history: ExperimentHistory) -> Self {
        Self {
            data: tokio::sync::Mutex::new(history),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<ExperimentHistory, StorageError> {
        Ok(self.data.lock().await.clone())
    }

    async fn save(&self, history: &ExperimentHistory) -> Result<u64, StorageError> {
        let mut stored = self.data.lock().await;
        if stored.version != history.version {
            return Err(StorageError::VersionConflict {
                expected: history.version,
                found: stored.version,
            });
        }
        let mut next = history.clone();
        next.version += 1;
        *stored = next;
        Ok(stored.version)
    }
}

#[async_trait]
impl<S: LedgerStore + ?Sized> LedgerStore for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn load(&self) -> Result<ExperimentHistory, StorageError> {
        (**self).load().await
    }

    async fn save(&self, history: &ExperimentHistory) -> Result<u64, StorageError> {
        (**self).save(history).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_versions() {
        let store = MemoryLedgerStore::new();

        let history = store.load().await.unwrap();
        assert_eq!(history.version, 0);
        assert!(history.is_unrated());

        let version = store.save(&history).await.unwrap();
        assert_eq!(version, 1);
        assert_eq!(store.load().await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected() {
        let store = MemoryLedgerStore::new();
        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();

        store.save(&first).await.unwrap();
        let err = store.save(&second).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(matches!(err, StorageError::VersionConflict { expected: 0, found: 1 }));
    }
}
