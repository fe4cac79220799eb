//! Error taxonomy for NewsRPM calls.

use serde_json::Value;

/// Status reported for client-side argument validation failures.
pub const MISSING_ARGUMENT_STATUS: u16 = 400;

/// Status reported when every attempt timed out.
pub const TIMEOUT_STATUS: u16 = 408;

/// Raw (non-JSON) error bodies are cut to this many characters.
pub const MAX_RAW_DETAILS_CHARS: usize = 500;

/// A non-2xx response from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Operation that failed, e.g. `getArticleBySlug`.
    pub context: String,
    pub status: u16,
    /// Parsed JSON body, or the leading characters of a raw body.
    pub details: Option<Value>,
    pub hint: Option<&'static str>,
}

impl ApiError {
    /// Guidance for statuses where the remedy is on the caller's side.
    pub fn hint_for(status: u16) -> Option<&'static str> {
        match status {
            401 => Some("check credentials/auth mode"),
            429 => Some("rate limited, slow down"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed ({})", self.context, self.status)
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by the request executor and the operation facade.
#[derive(Debug)]
pub enum NewsRpmError {
    /// A required argument was absent; no request was sent.
    MissingArgument { context: String, message: String },
    /// Every attempt hit the per-attempt timeout.
    Timeout { context: String, attempts: usize },
    /// The transport failed for a reason other than a timeout.
    Transport { context: String, message: String },
    /// The server answered with a non-2xx status.
    Api(ApiError),
    /// The request body could not be serialized.
    Encode { context: String, message: String },
    /// The client configuration is unusable.
    Config(String),
}

impl NewsRpmError {
    pub(crate) fn missing(context: &str, message: impl Into<String>) -> Self {
        NewsRpmError::MissingArgument {
            context: context.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status, or the HTTP-equivalent status for client-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            NewsRpmError::MissingArgument { .. } => Some(MISSING_ARGUMENT_STATUS),
            NewsRpmError::Timeout { .. } => Some(TIMEOUT_STATUS),
            NewsRpmError::Api(err) => Some(err.status),
            NewsRpmError::Transport { .. }
            | NewsRpmError::Encode { .. }
            | NewsRpmError::Config(_) => None,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            NewsRpmError::Api(err) => err.hint,
            _ => None,
        }
    }
}

impl std::fmt::Display for NewsRpmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsRpmError::MissingArgument { context, message } => {
                write!(f, "{}: {}", context, message)
            }
            NewsRpmError::Timeout { context, attempts } => {
                write!(f, "{} timed out after {} attempt(s)", context, attempts)
            }
            NewsRpmError::Transport { context, message } => {
                write!(f, "{}: request failed: {}", context, message)
            }
            NewsRpmError::Api(err) => write!(f, "{}", err),
            NewsRpmError::Encode { context, message } => {
                write!(f, "{}: could not encode request body: {}", context, message)
            }
            NewsRpmError::Config(msg) => write!(f, "Invalid NewsRPM configuration: {}", msg),
        }
    }
}

impl std::error::Error for NewsRpmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NewsRpmError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for NewsRpmError {
    fn from(err: ApiError) -> Self {
        NewsRpmError::Api(err)
    }
}
