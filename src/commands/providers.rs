use anyhow::Result;
use std::path::Path;

use crate::{
    api::{NewsRpm, ProviderListResponse},
    http::Transport,
    runtime::Runtime,
};

use super::output::{print_lines, save_if_requested};

#[tracing::instrument(skip(client, runtime))]
pub async fn providers<T: Transport, R: Runtime>(
    client: &NewsRpm<T>,
    runtime: &R,
    save: Option<&Path>,
) -> Result<()> {
    let response = client.list_providers().await?;
    print_lines(&provider_lines(&response));
    save_if_requested(runtime, save, &response)
}

fn provider_lines(response: &ProviderListResponse) -> Vec<String> {
    let names: Vec<&str> = response.providers().collect();

    if names.is_empty() {
        return vec!["No providers returned.".to_string()];
    }
    let mut lines = vec!["Providers:".to_string()];
    lines.extend(names.into_iter().map(|name| format!("- {}", name)));
    lines
}
