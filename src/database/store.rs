use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};

use super::document::{Document, WriteBatch};
use super::error::StoreError;
use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::query::Query;

/// Managed document database the API runs against.
///
/// Backends provide single-document reads, conjunctive queries and an atomic
/// multi-document `commit`. Nothing above this trait takes locks; concurrent
/// writers race at the backend with last-write-wins semantics.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Fetch several documents, preserving the order of `ids`
    async fn get_many(
        &self,
        collection: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Document>>, StoreError> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.push(self.get(collection, id).await?);
        }
        Ok(out)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    async fn count(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        Ok(self.query(collection, query).await?.len())
    }

    /// Create a document; fails with `AlreadyExists` when the id is taken
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Apply every write in the batch or none of them
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn DocumentStore>;

/// Open the backend selected by configuration
pub async fn connect(config: &StoreConfig) -> Result<SharedStore, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PgStore::connect(config).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
