//! Stdio transport: one JSON request per line, one JSON response per line.
//!
//! Requests look like `{"view": "search", "input": {...}}`. The special view
//! name `views` lists what is available.

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::views::{DashboardView, ViewContext};

/// One stdio request line.
#[derive(Debug, Deserialize)]
pub struct StdioRequest {
    /// View name.
    pub view: String,
    /// View input; missing means an empty object.
    #[serde(default = "empty_object")]
    pub input: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

/// Serve views over stdin/stdout until stdin closes.
pub async fn run_stdio(views: Vec<Box<dyn DashboardView>>, ctx: ViewContext) -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    tracing::info!("Stdio dashboard ready, waiting for requests...");

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // EOF
            tracing::info!("Stdin closed, shutting down");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = handle_line(trimmed, &views, &ctx).await;

        let response_json = serde_json::to_string(&response)?;
        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Handle one request line and build its response object.
pub async fn handle_line(line: &str, views: &[Box<dyn DashboardView>], ctx: &ViewContext) -> serde_json::Value {
    let request: StdioRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => return failure(format!("Parse error: {e}")),
    };

    if request.view == "views" {
        let list: Vec<_> = views
            .iter()
            .map(|v| serde_json::json!({"name": v.name(), "description": v.description()}))
            .collect();
        return serde_json::json!({ "ok": true, "views": list });
    }

    let Some(view) = views.iter().find(|v| v.name() == request.view) else {
        return failure(format!("View not found: {}", request.view));
    };

    tracing::debug!(view = %request.view, "Received request");

    match view.execute(ctx, request.input).await {
        Ok(content) => serde_json::json!({ "ok": true, "content": content }),
        Err(e) => {
            tracing::warn!(view = %request.view, error = %e, "View execution failed");
            failure(e.to_user_message())
        }
    }
}

fn failure(message: String) -> serde_json::Value {
    serde_json::json!({ "ok": false, "error": message })
}
