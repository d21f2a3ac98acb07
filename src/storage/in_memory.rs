//! In-memory implementation of DataSource for testing and development
//!
//! Mirrors the mock back end the admin pages are developed against: records
//! live in an ordered map and every call waits for a configurable latency.

use super::DataSource;
use crate::core::StorageError;
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

/// In-memory data source
///
/// Uses RwLock for thread-safe access and keeps insertion order, so `list`
/// returns records in the order they were created.
#[derive(Clone)]
pub struct InMemoryDataSource<T> {
    records: Arc<RwLock<IndexMap<Uuid, T>>>,
    latency: Duration,
}

impl<T> InMemoryDataSource<T> {
    /// Create an empty source without latency
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
            latency: Duration::ZERO,
        }
    }

    /// Seed the source with records, assigning fresh IDs
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map = records.into_iter().map(|r| (Uuid::new_v4(), r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            latency: Duration::ZERO,
        }
    }

    /// Simulated network latency applied before every operation
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// IDs in insertion order
    pub fn ids(&self) -> Result<Vec<Uuid>> {
        let records = self.records.read().map_err(read_error)?;
        Ok(records.keys().copied().collect())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl<T> Default for InMemoryDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn read_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::LockPoisoned {
        kind: "read",
        message: e.to_string(),
    }
}

fn write_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::LockPoisoned {
        kind: "write",
        message: e.to_string(),
    }
}

#[async_trait]
impl<T> DataSource<T> for InMemoryDataSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn list(&self) -> Result<Vec<T>> {
        self.simulate_latency().await;
        let records = self.records.read().map_err(read_error)?;

        Ok(records.values().cloned().collect())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        self.simulate_latency().await;
        let records = self.records.read().map_err(read_error)?;

        Ok(records.get(id).cloned())
    }

    async fn create(&self, record: T) -> Result<Uuid> {
        self.simulate_latency().await;
        let mut records = self.records.write().map_err(write_error)?;

        let id = Uuid::new_v4();
        records.insert(id, record);
        tracing::debug!(id = %id, "record created");

        Ok(id)
    }

    async fn update(&self, id: &Uuid, record: T) -> Result<T> {
        self.simulate_latency().await;
        let mut records = self.records.write().map_err(write_error)?;

        let slot = records
            .get_mut(id)
            .ok_or(StorageError::NotFound { id: *id })?;
        *slot = record.clone();
        tracing::debug!(id = %id, "record updated");

        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.simulate_latency().await;
        let mut records = self.records.write().map_err(write_error)?;

        // shift_remove keeps the remaining records in insertion order
        if records.shift_remove(id).is_none() {
            return Err(StorageError::NotFound { id: *id }.into());
        }
        tracing::debug!(id = %id, "record deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_create_and_get() {
        let source = InMemoryDataSource::<Value>::new();
        let id = source.create(json!({"name": "Emaar"})).await.unwrap();

        let record = source.get(&id).await.unwrap();
        assert_eq!(record, Some(json!({"name": "Emaar"})));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let source = InMemoryDataSource::with_records([json!(1), json!(2), json!(3)]);
        assert_eq!(source.list().await.unwrap(), vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let source = InMemoryDataSource::<Value>::new();
        let id = source.create(json!({"status": "new"})).await.unwrap();

        source.update(&id, json!({"status": "active"})).await.unwrap();
        assert_eq!(source.get(&id).await.unwrap(), Some(json!({"status": "active"})));
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let source = InMemoryDataSource::<Value>::new();
        let err = source.update(&Uuid::new_v4(), json!({})).await.unwrap_err();
        let storage = err.downcast_ref::<StorageError>().unwrap();
        assert_eq!(storage.error_code(), "RECORD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete() {
        let source = InMemoryDataSource::with_records([json!("a"), json!("b"), json!("c")]);
        let ids = source.ids().unwrap();

        source.delete(&ids[1]).await.unwrap();
        assert_eq!(source.list().await.unwrap(), vec![json!("a"), json!("c")]);
        assert!(source.delete(&ids[1]).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let source =
            InMemoryDataSource::with_records([json!(1)]).with_latency(Duration::from_millis(300));

        let start = tokio::time::Instant::now();
        source.list().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
