//! HTTP request execution for the NewsRPM API.

mod executor;
mod retry;
mod transport;

pub use executor::{RequestExecutor, RequestSpec, parse_response};
pub use retry::{Backoff, MAX_JITTER_MS, is_transient_status, send_with_retry};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

#[cfg(test)]
pub use transport::MockTransport;
