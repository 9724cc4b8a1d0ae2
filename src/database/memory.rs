use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::document::{Document, Fields, WriteBatch, WriteOp};
use super::error::StoreError;
use super::query::{compare_values, Query, SortDirection};
use super::store::DocumentStore;

type Collections = HashMap<String, BTreeMap<String, Fields>>;

/// In-process document store. Commits stage against a copy of the
/// collections and swap it in only when every write applied.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map(|c| c.len()).unwrap_or(0)
    }

    fn apply(collections: &mut Collections, op: WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::Update { collection, id, fields } => {
                let existing = collections
                    .get_mut(&collection)
                    .and_then(|c| c.get_mut(&id))
                    .ok_or_else(|| StoreError::not_found(&collection, &id))?;
                existing.extend(fields);
            }
            WriteOp::Delete { collection, id } => {
                if let Some(c) = collections.get_mut(&collection) {
                    c.remove(&id);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = docs
            .iter()
            .filter(|(_, data)| query.matches(data))
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect();

        if let Some((field, direction)) = &query.order {
            // Stable sort keeps id order among equal keys
            matched.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(query.offset).take(limit).collect())
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&document.id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: document.id,
            });
        }
        docs.insert(document.id, document.data);
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let mut staged = collections.clone();
        for op in batch.into_ops() {
            Self::apply(&mut staged, op)?;
        }
        *collections = staged;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
