use crate::database::{Document, DocumentStore, Query, StoreError};
use crate::models::OrderStatus;

use super::error::Violation;

/// Stored spellings of a category's parent list; the model reads both
const PARENT_FIELDS: [&str; 2] = ["parent_ids", "parentIds"];

/// Precondition a destructive action must satisfy for each target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    OrderCancelledOrFailed,
    CategoryHasNoChildren,
    CategoryHasNoProducts,
    ShopHasNoProducts,
    ShopHasNoAuctions,
}

impl Guard {
    /// Evaluate against one target. `Ok(None)` means the guard passed.
    pub async fn check(
        &self,
        store: &dyn DocumentStore,
        target: &Document,
    ) -> Result<Option<Violation>, StoreError> {
        let id = target.id.as_str();
        let violation = match self {
            Guard::OrderCancelledOrFailed => {
                let status = target.get_str("status");
                let deletable = status
                    .and_then(|s| serde_json::from_value::<OrderStatus>(s.into()).ok())
                    .map(|s| s.is_deletable())
                    .unwrap_or(false);
                (!deletable).then(|| {
                    format!(
                        "Order {} cannot be deleted (status: {})",
                        id,
                        status.unwrap_or("unknown")
                    )
                })
            }
            Guard::CategoryHasNoChildren => {
                let mut children = 0;
                for field in PARENT_FIELDS {
                    children += store
                        .count("categories", &Query::new().array_contains(field, id))
                        .await?;
                }
                (children > 0).then(|| format!("Category {} has subcategories", id))
            }
            Guard::CategoryHasNoProducts => {
                let counted = target
                    .get("product_count")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0);
                let linked = if counted > 0 {
                    counted as usize
                } else {
                    store.count("products", &Query::new().eq("category_id", id)).await?
                };
                (linked > 0).then(|| format!("Category {} has products", id))
            }
            Guard::ShopHasNoProducts => {
                let products = store.count("products", &Query::new().eq("shop_id", id)).await?;
                (products > 0).then(|| format!("Shop {} has products", id))
            }
            Guard::ShopHasNoAuctions => {
                let auctions = store.count("auctions", &Query::new().eq("shop_id", id)).await?;
                (auctions > 0).then(|| format!("Shop {} has auctions", id))
            }
        };

        Ok(violation.map(|error| Violation::new(id, error)))
    }
}

/// Phase one of a bulk delete: run every guard against every target and
/// collect all violations rather than stopping at the first.
pub async fn evaluate(
    store: &dyn DocumentStore,
    guards: &[Guard],
    targets: &[Document],
) -> Result<Vec<Violation>, StoreError> {
    let mut violations = Vec::new();
    if guards.is_empty() {
        return Ok(violations);
    }

    for target in targets {
        for guard in guards {
            if let Some(violation) = guard.check(store, target).await? {
                violations.push(violation);
            }
        }
    }
    Ok(violations)
}
