//! Client configuration.
//!
//! Field names follow the camelCase keys of the NewsRPM config document, so a
//! host config file can be deserialized as-is. All defaults are applied here,
//! once, at deserialization or construction time.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::NewsRpmError;

pub const DEFAULT_BASE_URL: &str = "https://api.newsrpm.com";

/// Per-attempt timeout when neither the call nor the config sets one.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Key under which a host config document carries the client config.
pub const CONFIG_SLICE_KEY: &str = "newsrpm";

/// How the API key is transmitted.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum AuthMode {
    /// `Authorization: privateKey <key>`
    #[default]
    PrivateHeader,
    /// `Authorization: publicKey <key>`
    PublicHeader,
    /// `?T=<key>`
    PrivateQuery,
    /// `?P=<key>`
    PublicQuery,
}

impl AuthMode {
    /// Authorization scheme for header modes.
    pub fn header_scheme(self) -> Option<&'static str> {
        match self {
            AuthMode::PrivateHeader => Some("privateKey"),
            AuthMode::PublicHeader => Some("publicKey"),
            AuthMode::PrivateQuery | AuthMode::PublicQuery => None,
        }
    }

    /// Query parameter name for query modes.
    pub fn query_param(self) -> Option<&'static str> {
        match self {
            AuthMode::PrivateQuery => Some("T"),
            AuthMode::PublicQuery => Some("P"),
            AuthMode::PrivateHeader | AuthMode::PublicHeader => None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDefaults {
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: Option<u64>,
}

/// Bounded exponential backoff for transient failures.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 4000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default)]
    pub auth_mode: AuthMode,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub request_defaults: RequestDefaults,
    #[serde(default, rename = "retry", alias = "retryPolicy")]
    pub retry_policy: RetryPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// The client object of a config document: the `newsrpm` entry when there is
/// one, otherwise the document itself.
pub fn config_slice(mut doc: Value) -> Value {
    if let Some(slice) = doc.get_mut(CONFIG_SLICE_KEY) {
        return slice.take();
    }
    doc
}

impl ClientConfig {
    /// Config with every optional group at its default.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            auth_mode: AuthMode::default(),
            base_url: default_base_url(),
            request_defaults: RequestDefaults::default(),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_defaults(mut self, request_defaults: RequestDefaults) -> Self {
        self.request_defaults = request_defaults;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Parses a config document.
    ///
    /// Accepts the client object itself or a host document that nests it
    /// under a `newsrpm` key.
    pub fn from_json(text: &str) -> Result<Self, NewsRpmError> {
        let doc: Value = serde_json::from_str(text)
            .map_err(|e| NewsRpmError::Config(format!("config is not valid JSON: {}", e)))?;
        Self::from_value(doc)
    }

    /// Same as [`ClientConfig::from_json`] for an already parsed document.
    pub fn from_value(doc: Value) -> Result<Self, NewsRpmError> {
        let config: ClientConfig = serde_json::from_value(config_slice(doc))
            .map_err(|e| NewsRpmError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NewsRpmError> {
        if self.api_key.trim().is_empty() {
            return Err(NewsRpmError::Config("apiKey is required".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(NewsRpmError::Config("baseUrl must not be empty".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.strip_suffix('/').unwrap_or(&self.base_url)
    }

    /// Timeout for one attempt: the per-call override, then the configured
    /// default, then [`DEFAULT_TIMEOUT_MS`].
    pub fn attempt_timeout(&self, timeout_override: Option<Duration>) -> Duration {
        timeout_override.unwrap_or_else(|| {
            Duration::from_millis(
                self.request_defaults
                    .timeout_ms
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            )
        })
    }
}
