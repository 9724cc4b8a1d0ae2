use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::database::{Document, Fields, Query, SharedStore, SortDirection, StoreError, WriteBatch};
use crate::models::{ApprovalStatus, Category, NewCategory};

use super::hierarchy::find_cycle;
use super::tree::{build_category_tree, CategoryNode};

const COLLECTION: &str = "categories";

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category name is required")]
    MissingName,

    #[error("Category {0} cannot be its own parent")]
    SelfParent(String),

    #[error("Parent category {0} does not exist")]
    UnknownParent(String),

    #[error("Category {id} would become its own ancestor via {}", .path.join(" -> "))]
    Cycle { id: String, path: Vec<String> },

    #[error("Category {0} not found")]
    NotFound(String),

    #[error("Category {0} already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads and hierarchy-aware writes for the `categories` collection
#[derive(Clone)]
pub struct CategoryService {
    store: SharedStore,
    page_size: usize,
}

impl CategoryService {
    pub fn new(store: SharedStore, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Every category, ordered by `sort_order`. Pages through the whole
    /// collection so no parent is lost to a page boundary.
    pub async fn list_all(&self) -> Result<Vec<Category>, CategoryError> {
        let mut categories = Vec::new();
        let mut offset = 0;
        loop {
            let query = Query::new()
                .order_by("sort_order", SortDirection::Asc)
                .limit(self.page_size)
                .offset(offset);
            let page = self.store.query(COLLECTION, &query).await?;
            let fetched = page.len();

            for doc in page {
                categories.push(doc.parse::<Category>()?);
            }

            if fetched < self.page_size {
                break;
            }
            offset += fetched;
        }
        Ok(categories)
    }

    pub async fn tree(&self) -> Result<Vec<CategoryNode>, CategoryError> {
        Ok(build_category_tree(self.list_all().await?))
    }

    pub async fn get(&self, id: &str) -> Result<Category, CategoryError> {
        let doc = self
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))?;
        Ok(doc.parse()?)
    }

    pub async fn create(&self, input: NewCategory, now: DateTime<Utc>) -> Result<Category, CategoryError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CategoryError::MissingName);
        }

        let id = input
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        self.check_parents(&id, &input.parent_ids).await?;

        let category = Category {
            slug: Some(input.slug.unwrap_or_else(|| slugify(&name))),
            id: id.clone(),
            name,
            parent_ids: input.parent_ids,
            is_active: true,
            is_featured: input.is_featured,
            approval_status: ApprovalStatus::Pending,
            sort_order: input.sort_order,
            product_count: 0,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let document = to_document(&category)?;
        match self.store.insert(COLLECTION, document).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists { id, .. }) => return Err(CategoryError::AlreadyExists(id)),
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    /// Replace a category's parents after checking the new set keeps the hierarchy acyclic
    pub async fn update_parents(
        &self,
        id: &str,
        parent_ids: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Category, CategoryError> {
        let mut category = self.get(id).await?;
        self.check_parents(id, &parent_ids).await?;

        let mut fields = Fields::new();
        fields.insert("parent_ids".to_string(), json!(parent_ids));
        fields.insert("updated_at".to_string(), json!(now));

        let mut batch = WriteBatch::new();
        batch.update(COLLECTION, id, fields);
        self.store.commit(batch).await?;

        tracing::info!("Category {} now has parents {:?}", id, parent_ids);
        category.parent_ids = parent_ids;
        category.updated_at = Some(now);
        Ok(category)
    }

    async fn check_parents(&self, id: &str, parent_ids: &[String]) -> Result<(), CategoryError> {
        if parent_ids.is_empty() {
            return Ok(());
        }
        if parent_ids.iter().any(|p| p == id) {
            return Err(CategoryError::SelfParent(id.to_string()));
        }

        let parents_of: HashMap<String, Vec<String>> = self
            .list_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.parent_ids))
            .collect();

        if let Some(missing) = parent_ids.iter().find(|p| !parents_of.contains_key(p.as_str())) {
            return Err(CategoryError::UnknownParent(missing.clone()));
        }

        if let Some(path) = find_cycle(id, parent_ids, &parents_of) {
            return Err(CategoryError::Cycle {
                id: id.to_string(),
                path,
            });
        }
        Ok(())
    }
}

fn to_document(category: &Category) -> Result<Document, StoreError> {
    let value = serde_json::to_value(category)?;
    let mut document = Document::from_value(category.id.clone(), value);
    document.data.remove("id");
    Ok(document)
}

/// Lowercase, ASCII alphanumerics joined by single hyphens
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
