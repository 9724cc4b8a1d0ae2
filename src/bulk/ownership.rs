use std::collections::HashSet;

use crate::auth::Actor;
use crate::database::{Document, DocumentStore, Query, StoreError};

/// Ids of the shops whose `owner_id` is the actor
pub async fn owned_shop_ids(
    store: &dyn DocumentStore,
    actor: &Actor,
) -> Result<HashSet<String>, StoreError> {
    let shops = store
        .query("shops", &Query::new().eq("owner_id", actor.id.as_str()))
        .await?;
    Ok(shops.into_iter().map(|shop| shop.id).collect())
}

/// Targets whose `shop_id` is not one of `shops`. Any entry here rejects the
/// whole request; this is a gate, not a per-id filter.
pub fn foreign_targets<'a>(targets: &'a [Document], shops: &HashSet<String>) -> Vec<&'a str> {
    targets
        .iter()
        .filter(|target| {
            target
                .get_str("shop_id")
                .map(|shop_id| !shops.contains(shop_id))
                .unwrap_or(true)
        })
        .map(|target| target.id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::types::Role;
    use serde_json::json;

    #[tokio::test]
    async fn resolves_shops_by_owner() {
        let store = MemoryStore::new();
        store
            .insert("shops", Document::from_value("shop1", json!({ "owner_id": "seller1" })))
            .await
            .unwrap();
        store
            .insert("shops", Document::from_value("shop2", json!({ "owner_id": "seller2" })))
            .await
            .unwrap();

        let shops = owned_shop_ids(&store, &Actor::new("seller1", Role::Seller)).await.unwrap();
        assert_eq!(shops, HashSet::from(["shop1".to_string()]));
    }

    #[test]
    fn flags_foreign_and_unowned_targets() {
        let shops = HashSet::from(["shop1".to_string()]);
        let targets = vec![
            Document::from_value("o1", json!({ "shop_id": "shop1" })),
            Document::from_value("o2", json!({ "shop_id": "shop2" })),
            Document::from_value("o3", json!({})),
        ];
        assert_eq!(foreign_targets(&targets, &shops), vec!["o2", "o3"]);
        assert!(foreign_targets(&targets[..1], &shops).is_empty());
    }
}
