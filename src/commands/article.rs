use anyhow::Result;
use std::path::Path;

use crate::{
    api::{NewsRpm, SingleArticleResponse},
    http::Transport,
    runtime::Runtime,
};

use super::output::save_if_requested;

/// How `article` locates its document.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleRef {
    Slug(String),
    Id(i64),
}

#[tracing::instrument(skip(client, runtime))]
pub async fn article<T: Transport, R: Runtime>(
    client: &NewsRpm<T>,
    runtime: &R,
    target: &ArticleRef,
    save: Option<&Path>,
) -> Result<()> {
    let response = match target {
        ArticleRef::Slug(slug) => client.get_article_by_slug(slug).await?,
        ArticleRef::Id(id) => client.get_article_by_id(Some(*id)).await?,
    };
    println!("{}", headline(&response));
    save_if_requested(runtime, save, &response)
}

fn headline(response: &SingleArticleResponse) -> &str {
    response
        .doc()
        .and_then(|doc| doc.headline())
        .unwrap_or("(no headline)")
}
