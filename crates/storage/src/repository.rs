use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of one progress flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Durable key/value flags that survive restarts.
#[async_trait]
pub trait FlagRepository: Send + Sync {
    /// Fetch a flag by key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing key is
    /// `Ok(None)`, not an error.
    async fn get_flag(&self, key: &str) -> Result<Option<FlagRecord>, StorageError>;

    /// Insert or overwrite a flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the flag cannot be stored.
    async fn set_flag(
        &self,
        key: &str,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove a flag. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_flag(&self, key: &str) -> Result<bool, StorageError>;

    /// All flags ordered by key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_flags(&self) -> Result<Vec<FlagRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and as a fallback
/// when no database is available.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    flags: Arc<Mutex<HashMap<String, FlagRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl FlagRepository for InMemoryRepository {
    async fn get_flag(&self, key: &str) -> Result<Option<FlagRecord>, StorageError> {
        let guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set_flag(
        &self,
        key: &str,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            key.to_owned(),
            FlagRecord {
                key: key.to_owned(),
                value: value.to_owned(),
                updated_at,
            },
        );
        Ok(())
    }

    async fn clear_flag(&self, key: &str) -> Result<bool, StorageError> {
        let mut guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(key).is_some())
    }

    async fn list_flags(&self) -> Result<Vec<FlagRecord>, StorageError> {
        let guard = self
            .flags
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut flags: Vec<FlagRecord> = guard.values().cloned().collect();
        flags.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(flags)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub flags: Arc<dyn FlagRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let flags: Arc<dyn FlagRepository> = Arc::new(InMemoryRepository::new());
        Self { flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn in_memory_roundtrip() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_flag("quiz-passed").await.unwrap(), None);

        repo.set_flag("quiz-passed", "1", at(10)).await.unwrap();
        let record = repo.get_flag("quiz-passed").await.unwrap().unwrap();
        assert_eq!(record.value, "1");
        assert_eq!(record.updated_at, at(10));
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let repo = InMemoryRepository::new();
        repo.set_flag("k", "a", at(1)).await.unwrap();
        repo.set_flag("k", "b", at(2)).await.unwrap();

        let flags = repo.list_flags().await.unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].value, "b");
        assert_eq!(flags[0].updated_at, at(2));
    }

    #[tokio::test]
    async fn clear_reports_whether_flag_existed() {
        let repo = InMemoryRepository::new();
        repo.set_flag("k", "1", at(1)).await.unwrap();
        assert!(repo.clear_flag("k").await.unwrap());
        assert!(!repo.clear_flag("k").await.unwrap());
        assert_eq!(repo.get_flag("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_sorted_by_key() {
        let storage = Storage::in_memory();
        storage.flags.set_flag("quiz-passed", "1", at(1)).await.unwrap();
        storage.flags.set_flag("countdown-skipped", "1", at(2)).await.unwrap();

        let keys: Vec<String> = storage
            .flags
            .list_flags()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(keys, vec!["countdown-skipped", "quiz-passed"]);
    }
}
