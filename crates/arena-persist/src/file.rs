//! File-based ledger store
//!
//! Keeps the ledger as one pretty-printed JSON document. Saves go to a
//! sibling temporary file which is then renamed over the target, so readers
//! see either the old or the new ledger, never a partial one.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use arena_core::ExperimentHistory;

use crate::backend::{LedgerStore, StorageError};

/// JSON document ledger store
///
/// The version check and the rename happen under one in-process lock.
/// Writers in other processes are only caught if they finish their rename
/// before this store re-reads the stored version.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the path to the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<ExperimentHistory, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(ExperimentHistory::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ExperimentHistory::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ledger".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl LedgerStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load(&self) -> Result<ExperimentHistory, StorageError> {
        self.read().await
    }

    async fn save(&self, history: &ExperimentHistory) -> Result<u64, StorageError> {
        let _guard = self.write_lock.lock().await;

        let stored = self.read().await?;
        if stored.version != history.version {
            return Err(StorageError::VersionConflict {
                expected: history.version,
                found: stored.version,
            });
        }

        let mut next = history.clone();
        next.version += 1;
        let json = serde_json::to_string_pretty(&next)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, json.as_bytes()).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(
            path = %self.path.display(),
            version = next.version,
            experiments = next.experiments.len(),
            "Ledger saved"
        );
        Ok(next.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{Configuration, EvaluationOutcome, ExecutionResult};
    use serde_json::json;

    fn sample_history() -> ExperimentHistory {
        let mut history = ExperimentHistory::new();
        history
            .apply_experiment(
                "file test",
                vec![
                    ExecutionResult::success(Configuration::new().with("model", "a"), json!("aaaa")),
                    ExecutionResult::success(Configuration::new().with("model", "b"), json!("b")),
                ],
                vec![EvaluationOutcome::win(0, 1)],
            )
            .unwrap();
        history
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("ledger.json"));
        let history = store.load().await.unwrap();
        assert_eq!(history, ExperimentHistory::new());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/ledger.json"));

        let history = sample_history();
        assert_eq!(store.save(&history).await.unwrap(), 1);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.combination_ratings, history.combination_ratings);
        assert_eq!(loaded.experiments.len(), 1);

        // No temporary files left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writer_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let a = JsonFileStore::new(&path);
        let b = JsonFileStore::new(&path);

        let stale = b.load().await.unwrap();
        a.save(&sample_history()).await.unwrap();

        let err = b.save(&stale).await.unwrap_err();
        assert!(err.is_conflict());
        // The first writer's ledger survives
        assert_eq!(a.load().await.unwrap().experiments.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_ledger_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
