//! Transport request description and errors.

use std::fmt;
use std::future::Future;
use thiserror::Error;

/// HTTP verb for a [`TransportRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Head,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Head => "HEAD",
        };
        f.write_str(name)
    }
}

/// Everything needed to perform one network request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Plain GET of `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Network failure.
///
/// Cloneable so a single outcome can be broadcast to every coalesced waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, request or body read failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// No response within the configured timeout
    #[error("request to {0} timed out")]
    Timeout(String),

    /// The request leading a coalesced fetch went away without an outcome
    #[error("in-flight fetch was abandoned before completing")]
    Abandoned,
}

/// Performs network requests.
///
/// Implementations are stateless with respect to images: no caching and no
/// retry.
pub trait Fetcher: Send + Sync {
    /// Perform `request` and return the response body.
    fn fetch(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_builder() {
        let request = TransportRequest::get("https://example.com/a.png")
            .with_header("Accept", "image/png")
            .with_header("X-Trace", "1");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://example.com/a.png");
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers[0], ("Accept".to_string(), "image/png".to_string()));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_with_body() {
        let request = TransportRequest::new(HttpMethod::Post, "https://example.com").with_body(vec![1, 2]);
        assert_eq!(request.method.to_string(), "POST");
        assert_eq!(request.body, Some(vec![1, 2]));
    }

    #[test]
    fn test_error_display() {
        let err = TransportError::Status {
            status: 404,
            url: "https://example.com/x".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://example.com/x");
        assert!(TransportError::Abandoned.to_string().contains("abandoned"));
    }
}
