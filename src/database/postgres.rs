use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};
use std::time::Duration;
use tracing::info;

use crate::config::StoreConfig;

use super::document::{Document, WriteBatch, WriteOp};
use super::error::StoreError;
use super::query::{Condition, Query};
use super::store::DocumentStore;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        data JSONB NOT NULL DEFAULT '{}'::jsonb,
        PRIMARY KEY (collection, id)
    )
"#;

/// PostgreSQL-backed document store: one JSONB row per document,
/// batches committed inside a single transaction
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(database_url)
            .await?;

        info!("Connected document store to {}", redact_url(database_url)?);
        Ok(Self { pool })
    }

    /// Create the documents table if this is a fresh database
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

/// Strip credentials from a connection string before it reaches the logs
fn redact_url(database_url: &str) -> Result<String, StoreError> {
    let mut url = url::Url::parse(database_url).map_err(|_| StoreError::InvalidDatabaseUrl)?;
    if url.password().is_some() {
        url.set_password(Some("***"))
            .map_err(|_| StoreError::InvalidDatabaseUrl)?;
    }
    Ok(url.into())
}

/// Append `AND ...` clauses for each condition. Field names travel as bind
/// parameters, never as SQL text.
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, conditions: &[Condition]) {
    for condition in conditions {
        match condition {
            Condition::Eq(field, value) => {
                builder.push(" AND data -> (");
                builder.push_bind(field.clone());
                builder.push("::text) = ");
                builder.push_bind(Json(value.clone()));
            }
            Condition::ArrayContains(field, value) => {
                builder.push(" AND data -> (");
                builder.push_bind(field.clone());
                builder.push("::text) @> ");
                builder.push_bind(Json(Value::Array(vec![value.clone()])));
            }
            Condition::In(field, values) => {
                builder.push(" AND jsonb_build_array(data -> (");
                builder.push_bind(field.clone());
                builder.push("::text)) <@ ");
                builder.push_bind(Json(Value::Array(values.clone())));
            }
        }
    }
}

fn select_builder<'a>(collection: &str, query: &Query) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
    builder.push_bind(collection.to_string());
    push_conditions(&mut builder, &query.conditions);

    match &query.order {
        Some((field, direction)) => {
            builder.push(" ORDER BY data -> (");
            builder.push_bind(field.clone());
            builder.push(format!("::text) {}, id ASC", direction.to_sql()));
        }
        None => {
            builder.push(" ORDER BY id ASC");
        }
    }

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit as i64);
    }
    if query.offset > 0 {
        builder.push(" OFFSET ");
        builder.push_bind(query.offset as i64);
    }
    builder
}

fn into_document(id: String, data: Value) -> Result<Document, StoreError> {
    match data {
        Value::Object(map) => Ok(Document::new(id, map)),
        other => Err(StoreError::InvalidDocument(format!(
            "{}: expected object, found {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(String, Json<Value>)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id, Json(data))| into_document(id, data)).transpose()
    }

    async fn get_many(
        &self,
        collection: &str,
        ids: &[String],
    ) -> Result<Vec<Option<Document>>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(String, Json<Value>)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = ANY($2)")
                .bind(collection)
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        let mut found = std::collections::HashMap::with_capacity(rows.len());
        for (id, Json(data)) in rows {
            found.insert(id.clone(), into_document(id, data)?);
        }
        Ok(ids.iter().map(|id| found.get(id).cloned()).collect())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let mut builder = select_builder(collection, query);
        let rows: Vec<(String, Json<Value>)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(id, Json(data))| into_document(id, data))
            .collect()
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM documents WHERE collection = ");
        builder.push_bind(collection.to_string());
        push_conditions(&mut builder, &query.conditions);

        let (count,): (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;
        Ok(count.max(0) as usize)
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(collection)
        .bind(&document.id)
        .bind(Json(Value::Object(document.data)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: document.id,
            });
        }
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        // Dropping the transaction on an early return rolls it back
        let mut tx = self.pool.begin().await?;

        for op in batch.into_ops() {
            match op {
                WriteOp::Update { collection, id, fields } => {
                    let result = sqlx::query(
                        "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
                    )
                    .bind(&collection)
                    .bind(&id)
                    .bind(Json(Value::Object(fields)))
                    .execute(&mut *tx)
                    .await?;

                    if result.rows_affected() == 0 {
                        return Err(StoreError::NotFound { collection, id });
                    }
                }
                WriteOp::Delete { collection, id } => {
                    sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                        .bind(&collection)
                        .bind(&id)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
