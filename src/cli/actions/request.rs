use crate::{cli::actions::Console, client::OutboundRequest};
use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

/// Sends one API request through the authenticated client and prints the
/// status and body.
pub async fn handle(console: &Console, method: &str, path: &str, body: Option<&str>) -> Result<()> {
    let method = Method::from_bytes(method.as_bytes())
        .with_context(|| format!("invalid method: {method}"))?;

    let mut request = OutboundRequest::new(method, path);
    if let Some(body) = body {
        let body: Value = serde_json::from_str(body).context("request body is not valid JSON")?;
        request = request.with_body(body);
    }

    let response = console.client.send(request).await?;
    let status = response.status();
    let text = response.text().await?;
    debug!("{} bytes received", text.len());

    println!("{status}");
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{text}"),
    }

    Ok(())
}
