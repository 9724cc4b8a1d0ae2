use clap::Args;
use serde_json::Value;

use crate::cli::client::{ApiClient, ServerArgs};
use crate::cli::utils::{output_error, output_json};
use crate::cli::OutputFormat;

#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub server: ServerArgs,
}

pub async fn handle(args: TreeArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.server)?;
    let reply = client.get("/api/categories/tree").await?;

    if !reply.status.is_success() {
        let message = reply.body.get("error").and_then(Value::as_str).unwrap_or("request failed");
        output_error(&output_format, message, Some(reply.status.as_str()))?;
        anyhow::bail!("server responded {}", reply.status);
    }

    let forest = reply.body.get("data").cloned().unwrap_or(Value::Array(Vec::new()));
    match output_format {
        OutputFormat::Json => output_json(&forest),
        OutputFormat::Text => {
            let mut lines = Vec::new();
            render(&forest, 0, &mut lines);
            if lines.is_empty() {
                println!("No categories");
            }
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

/// Indented `name (id)` lines, depth-first
pub fn render(nodes: &Value, depth: usize, lines: &mut Vec<String>) {
    let Some(nodes) = nodes.as_array() else {
        return;
    };
    for node in nodes {
        let name = node.get("name").and_then(Value::as_str).unwrap_or("?");
        let id = node.get("id").and_then(Value::as_str).unwrap_or("?");
        lines.push(format!("{}{} ({})", "  ".repeat(depth), name, id));
        if let Some(children) = node.get("children") {
            render(children, depth + 1, lines);
        }
    }
}
