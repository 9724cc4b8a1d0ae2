mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, bulk, fetch, seed};
use marketplace_api::database::MemoryStore;
use marketplace_api::types::Role;

#[tokio::test]
async fn admin_bans_shops() {
    let store = MemoryStore::new();
    seed(&store, "shops", "shop1", json!({ "name": "One", "is_active": true })).await;
    seed(&store, "shops", "shop2", json!({ "name": "Two", "is_active": true })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "shops", Role::Admin, "admin1", json!({ "action": "ban", "ids": ["shop1", "shop2"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "updated": 2, "action": "ban" }));

    let shop1 = fetch(&store, "shops", "shop1").await.unwrap();
    let shop2 = fetch(&store, "shops", "shop2").await.unwrap();
    for shop in [&shop1, &shop2] {
        assert_eq!(shop.get_bool("is_banned"), Some(true));
        assert_eq!(shop.get_bool("is_active"), Some(false));
        assert_eq!(shop.get_str("ban_reason"), Some("Bulk ban action"));
    }
    assert!(shop1.get("updated_at").is_some());
    assert_eq!(shop1.get("updated_at"), shop2.get("updated_at"));
}

#[tokio::test]
async fn category_with_child_blocks_the_whole_delete() {
    let store = MemoryStore::new();
    seed(&store, "categories", "cat1", json!({ "name": "Parent" })).await;
    seed(&store, "categories", "cat2", json!({ "name": "Child", "parent_ids": ["cat1"] })).await;
    seed(&store, "categories", "cat3", json!({ "name": "Empty" })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "categories", Role::Admin, "admin1", json!({ "action": "delete", "ids": ["cat1"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Category cat1 has subcategories" }));

    let (status, _) = bulk(&app, "categories", Role::Admin, "admin1", json!({ "action": "delete", "ids": ["cat3", "cat1"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(fetch(&store, "categories", "cat3").await.is_some());
    assert_eq!(store.len("categories").await, 3);
}

#[tokio::test]
async fn child_stored_with_camel_case_parents_still_blocks_delete() {
    let store = MemoryStore::new();
    seed(&store, "categories", "cat1", json!({ "name": "Parent" })).await;
    seed(&store, "categories", "cat2", json!({ "name": "Child", "parentIds": ["cat1"] })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "categories", Role::Admin, "admin1", json!({ "action": "delete", "ids": ["cat1"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Category cat1 has subcategories" }));
    assert!(fetch(&store, "categories", "cat1").await.is_some());
}

#[tokio::test]
async fn shop_delete_reports_every_violation() {
    let store = MemoryStore::new();
    seed(&store, "shops", "s1", json!({ "name": "Busy" })).await;
    seed(&store, "shops", "s2", json!({ "name": "Empty" })).await;
    seed(&store, "products", "p1", json!({ "shop_id": "s1" })).await;
    seed(&store, "auctions", "a1", json!({ "shop_id": "s1" })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "shops", Role::Admin, "admin1", json!({ "action": "delete", "ids": ["s1", "s2"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Shop s1 has products; Shop s1 has auctions");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
    assert!(fetch(&store, "shops", "s2").await.is_some());

    let (status, body) = bulk(&app, "shops", Role::Admin, "admin1", json!({ "action": "delete", "ids": ["s2"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);
    assert!(fetch(&store, "shops", "s2").await.is_none());
}

#[tokio::test]
async fn seller_order_actions_are_limited_to_own_shop() {
    let store = MemoryStore::new();
    seed(&store, "shops", "shopA", json!({ "owner_id": "seller1" })).await;
    seed(&store, "shops", "shopB", json!({ "owner_id": "seller2" })).await;
    seed(&store, "orders", "o1", json!({ "shop_id": "shopA", "status": "confirmed" })).await;
    seed(&store, "orders", "o2", json!({ "shop_id": "shopB", "status": "confirmed" })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "orders", Role::Seller, "seller1", json!({ "action": "ship", "ids": ["o1", "o2"] })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Forbidden" }));
    assert_eq!(fetch(&store, "orders", "o1").await.unwrap().get_str("status"), Some("confirmed"));

    let (status, _) = bulk(&app, "orders", Role::Seller, "seller1", json!({ "action": "ship", "ids": ["o1"] })).await;
    assert_eq!(status, StatusCode::OK);
    let o1 = fetch(&store, "orders", "o1").await.unwrap();
    assert_eq!(o1.get_str("status"), Some("shipped"));
    assert_eq!(o1.get("shipped_at"), o1.get("updated_at"));
}

#[tokio::test]
async fn admin_order_actions_and_delete_guard() {
    let store = MemoryStore::new();
    seed(&store, "orders", "o1", json!({ "status": "shipped" })).await;
    seed(&store, "orders", "o2", json!({ "status": "failed" })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "orders", Role::Admin, "admin1", json!({ "action": "delete", "ids": ["o1", "o2"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order o1 cannot be deleted (status: shipped)");
    assert_eq!(store.len("orders").await, 2);

    let (status, _) = bulk(&app, "orders", Role::Admin, "admin1", json!({ "action": "refund", "ids": ["o1"] })).await;
    assert_eq!(status, StatusCode::OK);
    let o1 = fetch(&store, "orders", "o1").await.unwrap();
    assert_eq!(o1.get_str("status"), Some("refunded"));
    assert_eq!(o1.get_str("payment_status"), Some("refunded"));

    // Seller actions are not in the admin table
    let (status, body) = bulk(&app, "orders", Role::Admin, "admin1", json!({ "action": "ship", "ids": ["o1"] })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Bulk operation failed", "message": "Unknown action: ship" }));
}

#[tokio::test]
async fn reviews_flag_for_users_and_admin_only_otherwise() {
    let store = MemoryStore::new();
    seed(&store, "reviews", "r1", json!({ "rating": 1 })).await;
    let app = app(&store);

    let (status, _) = bulk(&app, "reviews", Role::User, "u1", json!({ "action": "flag", "ids": ["r1"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetch(&store, "reviews", "r1").await.unwrap().get_bool("is_flagged"), Some(true));

    let (status, body) = bulk(&app, "reviews", Role::User, "u1", json!({ "action": "approve", "ids": ["r1"] })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Admin access required" }));

    let (status, _) = bulk(&app, "reviews", Role::Guest, "g1", json!({ "action": "flag", "ids": ["r1"] })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = bulk(&app, "reviews", Role::Admin, "admin1", json!({ "action": "unflag", "ids": ["r1"] })).await;
    assert_eq!(status, StatusCode::OK);
    let r1 = fetch(&store, "reviews", "r1").await.unwrap();
    assert_eq!(r1.get_bool("is_flagged"), Some(false));
    assert_eq!(r1.get("flagged_at"), Some(&serde_json::Value::Null));
}

#[tokio::test]
async fn seller_updates_stock_with_validated_data() {
    let store = MemoryStore::new();
    seed(&store, "shops", "shopA", json!({ "owner_id": "seller1" })).await;
    seed(&store, "products", "p1", json!({ "shop_id": "shopA", "stock_count": 0 })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "products", Role::Seller, "seller1", json!({ "action": "update-stock", "ids": ["p1"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "update-stock requires data.stock as a non-negative integer");

    let (status, body) = bulk(
        &app,
        "products",
        Role::Seller,
        "seller1",
        json!({ "action": "update-stock", "ids": ["p1"], "data": { "stock": 12 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "update-stock");
    assert_eq!(fetch(&store, "products", "p1").await.unwrap().get("stock_count"), Some(&json!(12)));
}

#[tokio::test]
async fn auctions_seller_start_and_admin_feature() {
    let store = MemoryStore::new();
    seed(&store, "shops", "shopA", json!({ "owner_id": "seller1" })).await;
    seed(&store, "auctions", "a1", json!({ "shop_id": "shopA", "status": "draft" })).await;
    let app = app(&store);

    let (status, _) = bulk(&app, "auctions", Role::Seller, "seller1", json!({ "action": "start", "ids": ["a1"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetch(&store, "auctions", "a1").await.unwrap().get_str("status"), Some("active"));

    let (status, _) = bulk(&app, "auctions", Role::Seller, "seller1", json!({ "action": "feature", "ids": ["a1"] })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = bulk(&app, "auctions", Role::Admin, "admin1", json!({ "action": "feature", "ids": ["a1"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetch(&store, "auctions", "a1").await.unwrap().get_bool("is_featured"), Some(true));
}

#[tokio::test]
async fn malformed_requests_are_400_and_missing_ids_404() {
    let store = MemoryStore::new();
    seed(&store, "shops", "shop1", json!({ "is_active": true })).await;
    let app = app(&store);

    let (status, body) = bulk(&app, "shops", Role::Admin, "admin1", json!({ "ids": ["shop1"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Action is required" }));

    let (status, body) = bulk(&app, "shops", Role::Admin, "admin1", json!({ "action": "ban", "ids": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "IDs array is required" }));

    let ids: Vec<String> = (0..501).map(|i| format!("s{}", i)).collect();
    let (status, _) = bulk(&app, "shops", Role::Admin, "admin1", json!({ "action": "ban", "ids": ids })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = bulk(&app, "shops", Role::Admin, "admin1", json!({ "action": "deactivate", "ids": ["shop1", "ghost"] })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Shop not found: ghost" }));
    assert_eq!(fetch(&store, "shops", "shop1").await.unwrap().get_bool("is_active"), Some(true));
}
