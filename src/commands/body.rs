use anyhow::Result;
use std::path::Path;

use crate::{api::NewsRpm, http::Transport, runtime::Runtime};

use super::output::save_if_requested;

/// Fetch an article body, rendered when `render` is set.
#[tracing::instrument(skip(client, runtime))]
pub async fn body<T: Transport, R: Runtime>(
    client: &NewsRpm<T>,
    runtime: &R,
    body_id: &str,
    render: bool,
    save: Option<&Path>,
) -> Result<()> {
    let response = if render {
        client.render_body(body_id).await?
    } else {
        client.get_body(body_id).await?
    };
    println!("Body chunks: {}", response.chunks().count());
    save_if_requested(runtime, save, &response)
}
