mod common;

use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};

use common::{token, TestServer};
use marketplace_api::types::Role;

#[tokio::test]
async fn binary_serves_health_and_bulk() -> Result<()> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(15)).await?;
    let client = reqwest::Client::new();

    let root: Value = client.get(format!("{}/", server.base_url)).send().await?.json().await?;
    assert_eq!(root["success"], true);

    // The in-memory store starts empty, so any id is missing
    let response = client
        .post(format!("{}/api/shops/bulk", server.base_url))
        .bearer_auth(token("admin1", Role::Admin))
        .json(&json!({ "action": "ban", "ids": ["shop1"] }))
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "Shop not found: shop1" }));

    let response = client
        .post(format!("{}/api/shops/bulk", server.base_url))
        .json(&json!({ "action": "ban", "ids": ["shop1"] }))
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    Ok(())
}
