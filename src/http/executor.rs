//! Request execution: authenticated URL and header construction, the retry
//! loop, and response normalization.

use log::debug;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use super::retry::send_with_retry;
use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::config::ClientConfig;
use crate::error::{ApiError, MAX_RAW_DETAILS_CHARS, NewsRpmError};

/// One call's worth of request parameters.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the base URL, e.g. `/article/abc`.
    pub path: String,
    /// Query pairs applied after auth. `None` and empty values are skipped.
    pub query: Vec<(String, Option<String>)>,
    pub headers: HeaderMap,
    /// Serialized JSON body.
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json_body(mut self, body: &Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.query.push((key.into(), value));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Owns the immutable client configuration and the transport.
///
/// Holds no per-call state, so one executor can serve concurrent callers.
pub struct RequestExecutor<T: Transport> {
    config: ClientConfig,
    base_url: String,
    default_headers: HeaderMap,
    transport: T,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, NewsRpmError> {
        config.validate()?;

        let base_url = config.normalized_base_url().to_string();
        Url::parse(&base_url)
            .map_err(|e| NewsRpmError::Config(format!("invalid baseUrl {:?}: {}", base_url, e)))?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.request_defaults.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| NewsRpmError::Config(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| NewsRpmError::Config(format!("invalid value for header {}: {}", name, e)))?;
            default_headers.insert(name, value);
        }

        // Fail at construction rather than on the first call.
        if let Some(scheme) = config.auth_mode.header_scheme() {
            HeaderValue::from_str(&format!("{} {}", scheme, config.api_key))
                .map_err(|_| NewsRpmError::Config("apiKey is not a valid header value".to_string()))?;
        }

        Ok(Self {
            config,
            base_url,
            default_headers,
            transport,
        })
    }

    /// Absolute URL for `path` with query-mode auth and `query` applied.
    ///
    /// Keys are written with overwrite semantics: a later pair for the same
    /// key replaces the earlier value in place.
    pub fn build_url(
        &self,
        path: &str,
        query: &[(String, Option<String>)],
    ) -> Result<Url, NewsRpmError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&joined)
            .map_err(|e| NewsRpmError::Config(format!("invalid request URL {:?}: {}", joined, e)))?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut set = |key: &str, value: &str| match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.to_string(),
            None => pairs.push((key.to_string(), value.to_string())),
        };

        if let Some(param) = self.config.auth_mode.query_param() {
            set(param, &self.config.api_key);
        }
        for (key, value) in query {
            match value.as_deref() {
                None | Some("") => continue,
                Some(value) => set(key, value),
            }
        }

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Headers for a request: JSON content type, configured defaults,
    /// `extra`, then header-mode auth. Each layer overwrites the previous.
    pub fn build_headers(&self, extra: &HeaderMap) -> Result<HeaderMap, NewsRpmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(scheme) = self.config.auth_mode.header_scheme() {
            let mut auth_value = HeaderValue::from_str(&format!("{} {}", scheme, self.config.api_key))
                .map_err(|_| NewsRpmError::Config("apiKey is not a valid header value".to_string()))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Builds, sends (with retry) and parses one request.
    #[tracing::instrument(skip(self, spec), fields(path = %spec.path))]
    pub async fn execute(&self, spec: RequestSpec, context: &str) -> Result<Value, NewsRpmError> {
        let url = self.build_url(&spec.path, &spec.query)?;
        let headers = self.build_headers(&spec.headers)?;

        debug!("{} {} {}", context, spec.method, spec.path);

        let request = HttpRequest {
            method: spec.method,
            url: url.into(),
            headers,
            body: spec.body,
            timeout: self.config.attempt_timeout(spec.timeout),
        };

        let response =
            send_with_retry(&self.transport, &request, &self.config.retry_policy, context).await?;
        parse_response(&response, context)
    }
}

/// Turns a response into its JSON payload, or an [`ApiError`] for non-2xx.
///
/// An empty or non-JSON 2xx body yields `{}`. Error details are the parsed
/// JSON, else the first 500 characters of the raw text; an empty error
/// body has no details (`None`) rather than an empty string.
pub fn parse_response(response: &HttpResponse, context: &str) -> Result<Value, NewsRpmError> {
    let parsed: Option<Value> = if response.body.is_empty() {
        None
    } else {
        serde_json::from_str(&response.body).ok()
    };

    if !response.is_success() {
        let details = match parsed {
            Some(json) => Some(json),
            None if response.body.is_empty() => None,
            None => Some(Value::String(
                response.body.chars().take(MAX_RAW_DETAILS_CHARS).collect(),
            )),
        };
        return Err(ApiError {
            context: context.to_string(),
            status: response.status,
            details,
            hint: ApiError::hint_for(response.status),
        }
        .into());
    }

    Ok(parsed.unwrap_or_else(|| Value::Object(Map::new())))
}
