//! Named NewsRPM operations.
//!
//! Each operation checks its required arguments before any request is sent,
//! then delegates to the [`RequestExecutor`] and wraps the payload as sent.

mod types;

use serde_json::Value;

pub use types::{
    Article, ArticleBodyResponse, ArticleQuery, BodyChunk, IndexValue, IndexedDataQuery,
    MultipleArticleResponse, ProviderListResponse, SingleArticleResponse, UploadResponse,
    split_list,
};

use crate::config::ClientConfig;
use crate::error::NewsRpmError;
use crate::http::{ReqwestTransport, RequestExecutor, RequestSpec, Transport};

/// Fields `uploadArticle` refuses to send without.
pub const REQUIRED_ARTICLE_FIELDS: [&str; 5] = ["provider", "headline", "slug", "date", "quality"];

pub struct NewsRpm<T: Transport = ReqwestTransport> {
    executor: RequestExecutor<T>,
}

impl NewsRpm<ReqwestTransport> {
    /// Client over a default reqwest transport.
    pub fn connect(config: ClientConfig) -> Result<Self, NewsRpmError> {
        let transport =
            ReqwestTransport::with_defaults().map_err(|e| NewsRpmError::Config(e.to_string()))?;
        Self::new(config, transport)
    }
}

impl<T: Transport> NewsRpm<T> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, NewsRpmError> {
        Ok(Self {
            executor: RequestExecutor::new(config, transport)?,
        })
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn search_indexed_data(
        &self,
        query: &IndexedDataQuery,
    ) -> Result<MultipleArticleResponse, NewsRpmError> {
        const CONTEXT: &str = "searchIndexedData";
        if query.key.is_empty() {
            return Err(NewsRpmError::missing(CONTEXT, "key is required"));
        }
        let body = to_body(query, CONTEXT)?;
        self.call(RequestSpec::post("/search/indexedData").json_body(&body), CONTEXT)
            .await
    }

    /// `None` searches with an empty filter object.
    #[tracing::instrument(skip(self, query))]
    pub async fn search_articles(
        &self,
        query: Option<&ArticleQuery>,
    ) -> Result<MultipleArticleResponse, NewsRpmError> {
        const CONTEXT: &str = "searchArticles";
        let body = match query {
            Some(query) => to_body(query, CONTEXT)?,
            None => Value::Object(Default::default()),
        };
        self.call(RequestSpec::post("/search/article").json_body(&body), CONTEXT)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_article_by_slug(
        &self,
        slug: &str,
    ) -> Result<SingleArticleResponse, NewsRpmError> {
        const CONTEXT: &str = "getArticleBySlug";
        if slug.is_empty() {
            return Err(NewsRpmError::missing(CONTEXT, "slug is required"));
        }
        let path = format!("/article/{}", urlencoding::encode(slug));
        self.call(RequestSpec::get(path), CONTEXT).await
    }

    /// Only an absent id is rejected; `0` is a valid id.
    #[tracing::instrument(skip(self))]
    pub async fn get_article_by_id(
        &self,
        id: Option<i64>,
    ) -> Result<SingleArticleResponse, NewsRpmError> {
        const CONTEXT: &str = "getArticleById";
        let Some(id) = id else {
            return Err(NewsRpmError::missing(CONTEXT, "id is required"));
        };
        let path = format!("/article/{}", urlencoding::encode(&id.to_string()));
        self.call(RequestSpec::get(path), CONTEXT).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_providers(&self) -> Result<ProviderListResponse, NewsRpmError> {
        self.call(RequestSpec::get("/provider"), "listProviders")
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_body(&self, body_id: &str) -> Result<ArticleBodyResponse, NewsRpmError> {
        const CONTEXT: &str = "getBody";
        if body_id.is_empty() {
            return Err(NewsRpmError::missing(CONTEXT, "bodyId is required"));
        }
        let path = format!("/body/{}", urlencoding::encode(body_id));
        self.call(RequestSpec::get(path), CONTEXT).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn render_body(&self, body_id: &str) -> Result<ArticleBodyResponse, NewsRpmError> {
        const CONTEXT: &str = "renderBody";
        if body_id.is_empty() {
            return Err(NewsRpmError::missing(CONTEXT, "bodyId is required"));
        }
        let path = format!("/body/{}/render", urlencoding::encode(body_id));
        self.call(RequestSpec::get(path), CONTEXT).await
    }

    /// Sends `article` exactly as given. Field names are part of the wire
    /// schema (including `visiblity`) and are never rewritten.
    #[tracing::instrument(skip(self, article))]
    pub async fn upload_article(&self, article: &Value) -> Result<UploadResponse, NewsRpmError> {
        const CONTEXT: &str = "uploadArticle";
        let missing = missing_article_fields(article);
        if !missing.is_empty() {
            return Err(NewsRpmError::missing(
                CONTEXT,
                format!("Missing required article fields: {}", missing.join(", ")),
            ));
        }
        self.call(RequestSpec::post("/article").json_body(article), CONTEXT)
            .await
    }

    async fn call<R: From<Value>>(
        &self,
        spec: RequestSpec,
        context: &str,
    ) -> Result<R, NewsRpmError> {
        let value = self.executor.execute(spec, context).await?;
        Ok(R::from(value))
    }
}

fn to_body<S: serde::Serialize>(value: &S, context: &str) -> Result<Value, NewsRpmError> {
    serde_json::to_value(value).map_err(|e| NewsRpmError::Encode {
        context: context.to_string(),
        message: e.to_string(),
    })
}

/// Required fields that are absent or empty. `quality` only has to be
/// present, so a quality of `0` passes.
fn missing_article_fields(article: &Value) -> Vec<&'static str> {
    let Some(fields) = article.as_object() else {
        return REQUIRED_ARTICLE_FIELDS.to_vec();
    };

    REQUIRED_ARTICLE_FIELDS
        .into_iter()
        .filter(|name| match fields.get(*name) {
            None => true,
            Some(_) if *name == "quality" => false,
            Some(value) => is_blank(value),
        })
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(_) | Value::Array(_) | Value::Object(_) => false,
    }
}
