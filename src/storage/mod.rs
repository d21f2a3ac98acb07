//! Data source collaborators
//!
//! The table engine never fetches. A list page reads the full collection from
//! a [`DataSource`], hands it to its engine, and refetches after every
//! create, update or delete.

pub mod in_memory;

pub use in_memory::InMemoryDataSource;

use crate::core::Record;
use crate::table::TableEngine;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// CRUD access to one record collection
///
/// The framework is agnostic to where the records live.
#[async_trait]
pub trait DataSource<T>: Send + Sync {
    /// List every record, in the source's natural order
    async fn list(&self) -> Result<Vec<T>>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// Store a new record and return its ID
    async fn create(&self, record: T) -> Result<Uuid>;

    /// Replace an existing record
    async fn update(&self, id: &Uuid, record: T) -> Result<T>;

    /// Delete a record
    async fn delete(&self, id: &Uuid) -> Result<()>;
}

/// Refetch the collection and hand it to the engine
///
/// The engine keeps its search, filters and sort; the page is clamped if the
/// collection shrank.
pub async fn refresh_table<T, S>(engine: &mut TableEngine<T>, source: &S) -> Result<()>
where
    T: Record,
    S: DataSource<T> + ?Sized,
{
    let records = source.list().await?;
    tracing::debug!(records = records.len(), "table data refreshed");
    engine.set_data(records);
    Ok(())
}
