//! HTTP Client Abstraction
//!
//! Provides the async HTTP operations the stream resolver needs. The surface
//! is intentionally small: the resolver only ever issues GET requests and
//! parses JSON bodies.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// HTTP request description handed to a host client.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Build a GET request for the given URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// HTTP response returned by a host client.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Check if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client trait.
///
/// Implementations should handle TLS, connection pooling, and timeouts.
/// The core treats any transport error as a resolution failure and falls
/// back to widget playback, so clients do not need their own retry layer.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn fetch(client: &dyn HttpClient) -> bridge_traits::error::Result<u16> {
///     let response = client.execute(HttpRequest::get("https://example.com")).await?;
///     Ok(response.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails, TLS validation fails, or the
    /// request times out. Non-2xx statuses are not errors at this layer; the
    /// caller inspects [`HttpResponse::is_success`].
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = HttpRequest::get("https://example.com")
            .header("User-Agent", "test")
            .timeout(Duration::from_secs(30));

        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.headers.get("User-Agent"), Some(&"test".to_string()));
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn response_status_checks() {
        let ok = HttpResponse {
            status: 200,
            body: Bytes::from_static(b"{}"),
        };
        assert!(ok.is_success());

        let not_found = HttpResponse {
            status: 404,
            body: Bytes::new(),
        };
        assert!(!not_found.is_success());
    }

    #[test]
    fn response_json_parse() {
        let response = HttpResponse {
            status: 200,
            body: Bytes::from_static(b"{\"url\":\"https://cdn.example.com/a.mp3\"}"),
        };

        #[derive(serde::Deserialize)]
        struct Locator {
            url: String,
        }

        let locator: Locator = response.json().unwrap();
        assert_eq!(locator.url, "https://cdn.example.com/a.mp3");

        let bad = HttpResponse {
            status: 200,
            body: Bytes::from_static(b"not json"),
        };
        assert!(bad.json::<Locator>().is_err());
    }
}
