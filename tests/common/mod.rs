#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use marketplace_api::app::{router, AppState};
use marketplace_api::auth::{generate_jwt, Claims};
use marketplace_api::config::AppConfig;
use marketplace_api::database::{Document, DocumentStore, MemoryStore};
use marketplace_api::types::Role;

pub const SECRET: &str = "integration-test-secret";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = SECRET.to_string();
    config.api.enable_request_logging = false;
    config
}

/// Router over `store` with the test secret
pub fn app(store: &MemoryStore) -> Router {
    app_with(store, test_config())
}

pub fn app_with(store: &MemoryStore, config: AppConfig) -> Router {
    router(AppState::new(std::sync::Arc::new(store.clone()), config))
}

pub fn token(user: &str, role: Role) -> String {
    generate_jwt(&Claims::new(user, role, 1), SECRET).expect("token")
}

pub async fn seed(store: &MemoryStore, collection: &str, id: &str, data: Value) {
    store
        .insert(collection, Document::from_value(id, data))
        .await
        .expect("seed document");
}

pub async fn fetch(store: &MemoryStore, collection: &str, id: &str) -> Option<Document> {
    store.get(collection, id).await.expect("read document")
}

/// Drive one request through the router and decode the JSON reply
pub async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn bulk(app: &Router, resource: &str, role: Role, user: &str, body: Value) -> (StatusCode, Value) {
    let token = token(user, role);
    send(app, Method::POST, &format!("/api/{}/bulk", resource), Some(&token), Some(body)).await
}

/// Server binary running on a free port with the in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_marketplace-api"))
            .env("PORT", port.to_string())
            .env("MARKETPLACE_API_PORT", port.to_string())
            .env("STORE_BACKEND", "memory")
            .env("APP_ENV", "development")
            .env("JWT_SECRET", SECRET)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
