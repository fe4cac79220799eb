use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;
use std::path::Path;

use crate::{api::NewsRpm, http::Transport, runtime::Runtime};

/// Upload the article stored as JSON at `json_path`, unchanged.
#[tracing::instrument(skip(client, runtime))]
pub async fn upload<T: Transport, R: Runtime>(
    client: &NewsRpm<T>,
    runtime: &R,
    json_path: &Path,
) -> Result<()> {
    debug!("Reading article from {:?}", json_path);
    let raw = runtime.read_to_string(json_path)?;
    let article: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse article JSON in {}", json_path.display()))?;

    let response = client.upload_article(&article).await?;
    match response.id() {
        Some(Value::String(id)) => println!("Uploaded. id={}", id),
        Some(id) => println!("Uploaded. id={}", id),
        None => println!("Uploaded."),
    }
    Ok(())
}
