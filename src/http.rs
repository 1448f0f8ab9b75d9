//! HTTP GET capability.
//!
//! The pipeline only ever issues GET requests with query parameters, so the
//! transport is reduced to a single trait method. [`ReqwestHttp`] is the
//! production implementation; tests substitute scripted fakes.

use async_trait::async_trait;

use crate::error::FetchError;

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issue a GET request against `url` with the given query pairs.
///
/// Implementations return `Err` only for transport failures; any HTTP status,
/// including errors, comes back as an [`HttpResponse`].
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, FetchError>;
}

/// [`HttpGet`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpGet for ReqwestHttp {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, FetchError> {
        let endpoint = endpoint_name(url);
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            // without_url() keeps the API key out of the message
            .map_err(|e| FetchError::transport(endpoint, e.without_url()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::transport(endpoint, e.without_url()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Last path segment of `url` (`.../youtube/v3/search` → `search`).
fn endpoint_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_name() {
        assert_eq!(endpoint_name("https://www.googleapis.com/youtube/v3/search"), "search");
        assert_eq!(endpoint_name("http://api.test/youtube/v3/videos/"), "videos");
        assert_eq!(endpoint_name("http://api.test/videos?id=a"), "videos");
    }

    #[tokio::test]
    async fn test_transport_error_names_endpoint_not_url() {
        // Nothing listens on port 1
        let http = ReqwestHttp::new();
        let err = http
            .get(
                "http://127.0.0.1:1/youtube/v3/search",
                &[("key", "secret-key".to_string())],
            )
            .await
            .unwrap_err();

        match &err {
            FetchError::Transport { endpoint, .. } => assert_eq!(endpoint, "search"),
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(!message.contains("secret-key"), "message: {}", message);
    }
}
