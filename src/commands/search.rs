use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::{
    api::{ArticleQuery, IndexedDataQuery, NewsRpm},
    http::Transport,
    runtime::Runtime,
};

use super::output::{print_lines, save_if_requested, top_results};

/// Search indexed data by taxonomy key.
#[tracing::instrument(skip(client, runtime, query))]
pub async fn index<T: Transport, R: Runtime>(
    client: &NewsRpm<T>,
    runtime: &R,
    query: &IndexedDataQuery,
    save: Option<&Path>,
) -> Result<()> {
    debug!("Searching indexed data for key {:?}", query.key);
    let response = client.search_indexed_data(query).await?;
    print_lines(&top_results(&response));
    save_if_requested(runtime, save, &response)
}

/// Full-text and filtered article search.
#[tracing::instrument(skip(client, runtime, query))]
pub async fn search<T: Transport, R: Runtime>(
    client: &NewsRpm<T>,
    runtime: &R,
    query: &ArticleQuery,
    save: Option<&Path>,
) -> Result<()> {
    let response = client.search_articles(Some(query)).await?;
    print_lines(&top_results(&response));
    save_if_requested(runtime, save, &response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::NewsRpmError;
    use crate::http::{HttpResponse, MockTransport};
    use crate::runtime::MockRuntime;

    fn client(transport: MockTransport) -> NewsRpm<MockTransport> {
        NewsRpm::new(ClientConfig::new("key"), transport).unwrap()
    }

    #[tokio::test]
    async fn test_index_saves_response_as_received() {
        const BODY: &str = r#"{"rows":[{"headline":null,"provider":"X","slug":"a","tags":{"lang":"en"}}],"page":1}"#;
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, BODY)));
        let mut runtime = MockRuntime::new();
        runtime
            .expect_write()
            .withf(|path, contents| {
                let saved: serde_json::Value = serde_json::from_slice(contents).unwrap();
                let sent: serde_json::Value = serde_json::from_str(BODY).unwrap();
                path.ends_with("index.json") && saved == sent
            })
            .times(1)
            .returning(|_, _| Ok(()));

        index(
            &client(transport),
            &runtime,
            &IndexedDataQuery::new("publisher"),
            Some(Path::new("index.json")),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_search_error_skips_save() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, "")));
        let mut runtime = MockRuntime::new();
        runtime.expect_write().times(0);

        let err = search(
            &client(transport),
            &runtime,
            &ArticleQuery::default(),
            Some(Path::new("out.json")),
        )
        .await
        .unwrap_err();

        let api = err.downcast_ref::<NewsRpmError>().unwrap();
        assert_eq!(api.status(), Some(401));
        assert_eq!(api.hint(), Some("check credentials/auth mode"));
    }
}
