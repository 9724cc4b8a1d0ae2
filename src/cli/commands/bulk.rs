use anyhow::Context;
use clap::Args;
use serde_json::{json, Value};

use crate::cli::client::{ApiClient, ServerArgs};
use crate::cli::utils::{output_error, output_json, output_success};
use crate::cli::OutputFormat;
use crate::types::Resource;

#[derive(Args, Debug)]
pub struct BulkArgs {
    #[arg(help = "orders, categories, shops, reviews, auctions or products")]
    pub resource: Resource,

    #[arg(help = "Action name, e.g. ban or update-stock")]
    pub action: String,

    #[arg(required = true, help = "Record ids")]
    pub ids: Vec<String>,

    #[arg(long, help = "Extra action input as a JSON object, e.g. '{\"stock\": 5}'")]
    pub data: Option<String>,

    #[command(flatten)]
    pub server: ServerArgs,
}

pub fn request_body(args: &BulkArgs) -> anyhow::Result<Value> {
    let mut body = json!({ "action": args.action, "ids": args.ids });
    if let Some(raw) = &args.data {
        let data: Value = serde_json::from_str(raw).context("--data must be valid JSON")?;
        body["data"] = data;
    }
    Ok(body)
}

pub async fn handle(args: BulkArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = request_body(&args)?;
    let client = ApiClient::new(&args.server)?;
    let path = format!("/api/{}/bulk", args.resource);

    let reply = client.post(&path, &body).await?;
    if output_format == OutputFormat::Json {
        output_json(&reply.body)?;
    } else if reply.status.is_success() {
        let updated = reply.body.get("updated").and_then(Value::as_u64).unwrap_or(0);
        output_success(
            &output_format,
            &format!("{} {} {} record(s)", args.action, args.resource, updated),
            None,
        )?;
    } else {
        let message = reply
            .body
            .get("message")
            .or_else(|| reply.body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        output_error(&output_format, message, Some(reply.status.as_str()))?;
    }

    if !reply.status.is_success() {
        anyhow::bail!("server responded {}", reply.status);
    }
    Ok(())
}
