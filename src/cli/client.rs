use anyhow::Context;
use clap::Args;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Connection flags shared by every command that talks to a server
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(long, env = "MARKETPLACE_SERVER", default_value = "http://localhost:3000", help = "API base URL")]
    pub server: String,

    #[arg(long, env = "MARKETPLACE_TOKEN", help = "Bearer token (see `marketplace token`)")]
    pub token: Option<String>,
}

/// Thin JSON client for the Marketplace API
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

/// Status and body of a completed call
pub struct ApiReply {
    pub status: reqwest::StatusCode,
    pub body: Value,
}

impl ApiClient {
    pub fn new(args: &ServerArgs) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: args.server.trim_end_matches('/').to_string(),
            token: args.token.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<ApiReply> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> anyhow::Result<ApiReply> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn send(&self, request: RequestBuilder) -> anyhow::Result<ApiReply> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.base_url))?;
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(ApiReply { status, body })
    }
}
