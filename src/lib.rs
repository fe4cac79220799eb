//! Client for the NewsRPM news-article API.
//!
//! [`api::NewsRpm`] exposes the named operations (search, fetch, upload).
//! Requests go through [`http::RequestExecutor`], which handles auth, retry
//! with backoff, timeouts and error normalization over an injected
//! [`http::Transport`].

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod runtime;

pub use api::NewsRpm;
pub use config::{AuthMode, ClientConfig, RequestDefaults, RetryPolicy};
pub use error::{ApiError, NewsRpmError};
