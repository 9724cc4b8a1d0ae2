use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::auth::Actor;
use crate::database::{Document, SharedStore, WriteBatch};
use crate::types::Resource;

use super::actions::Action;
use super::error::BulkError;
use super::guards;
use super::mutation::Mutation;
use super::ownership;
use super::policy::{self, FORBIDDEN};
use super::request::BulkRequest;

/// Response body for a committed bulk request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub success: bool,
    pub updated: usize,
    pub action: String,
}

/// Runs bulk requests against one store
#[derive(Clone)]
pub struct BulkExecutor {
    store: SharedStore,
}

impl BulkExecutor {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        resource: Resource,
        actor: &Actor,
        request: BulkRequest,
    ) -> Result<BulkOutcome, BulkError> {
        self.execute_at(resource, actor, request, Utc::now()).await
    }

    /// Same as `execute` with an explicit timestamp. Every target written by
    /// this call reports `updated_at == now`.
    pub async fn execute_at(
        &self,
        resource: Resource,
        actor: &Actor,
        request: BulkRequest,
        now: DateTime<Utc>,
    ) -> Result<BulkOutcome, BulkError> {
        policy::authorize(resource, actor, &request.action)?;
        let action = Action::resolve(resource, actor.role, &request.action, request.data.as_ref())?;

        let targets = self.load_targets(resource, &request.ids).await?;

        if policy::requires_ownership(actor) {
            let shops = ownership::owned_shop_ids(self.store.as_ref(), actor).await?;
            let foreign = ownership::foreign_targets(&targets, &shops);
            if !foreign.is_empty() {
                warn!(
                    "Bulk {} '{}' rejected: seller {} does not own {:?}",
                    resource,
                    action.name(),
                    actor.id,
                    foreign
                );
                return Err(BulkError::Forbidden(FORBIDDEN.to_string()));
            }
        }

        // Phase one: every guard, every target, nothing staged yet
        let violations = guards::evaluate(self.store.as_ref(), action.guards(), &targets).await?;
        if !violations.is_empty() {
            warn!(
                "Bulk {} '{}' rejected by {} guard violation(s)",
                resource,
                action.name(),
                violations.len()
            );
            return Err(BulkError::Constraint(violations));
        }

        // Phase two: stage in request order and commit once
        let batch = build_batch(resource, action, &request.ids, now);
        if let Err(e) = self.store.commit(batch).await {
            error!("Bulk {} '{}' commit failed: {}", resource, action.name(), e);
            return Err(e.into());
        }

        info!(
            "Bulk {} '{}' by {} ({}) applied to {} record(s)",
            resource,
            action.name(),
            actor.id,
            actor.role,
            request.ids.len()
        );

        Ok(BulkOutcome {
            success: true,
            updated: request.ids.len(),
            action: action.name().to_string(),
        })
    }

    /// Fetch every target; any missing id fails the request
    async fn load_targets(&self, resource: Resource, ids: &[String]) -> Result<Vec<Document>, BulkError> {
        let found = self.store.get_many(resource.collection(), ids).await?;

        let mut targets = Vec::with_capacity(found.len());
        let mut missing = Vec::new();
        for (id, doc) in ids.iter().zip(found) {
            match doc {
                Some(doc) => targets.push(doc),
                None => missing.push(id.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(BulkError::NotFound {
                label: resource.label(),
                ids: missing,
            });
        }
        Ok(targets)
    }
}

/// Stage one write per id with the action's recipe
pub fn build_batch(resource: Resource, action: Action, ids: &[String], now: DateTime<Utc>) -> WriteBatch {
    let collection = resource.collection();
    let mut batch = WriteBatch::new();
    for id in ids {
        match action.recipe(now) {
            Mutation::Update(fields) => batch.update(collection, id, fields),
            Mutation::Delete => batch.delete(collection, id),
        };
    }
    batch
}
