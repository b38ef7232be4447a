//! HTTP client used to download benchmark files

use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("mirror-latency-bench/", env!("CARGO_PKG_VERSION"));

/// A completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status_code: u16,
    /// Body bytes read
    pub body_size: u64,
    /// URL after redirects
    pub final_url: String,
}

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET a URL and read the whole body.
    ///
    /// Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// reqwest-backed client
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Create a client; without a timeout the reqwest default (none) applies
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_request(format!("GET {} returned {}", url, status)));
        }

        let final_url = response.url().to_string();

        // Count chunks instead of buffering: some catalog files are hundreds of MB.
        let mut body_size = 0u64;
        while let Some(chunk) = response.chunk().await? {
            body_size += chunk.len() as u64;
        }

        Ok(FetchResponse {
            status_code: status.as_u16(),
            body_size,
            final_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetch_reads_whole_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pub/pdb/ls-lR"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64 * 1024)))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestClient::new(None).unwrap();
        let response = client.fetch(&format!("{}/pub/pdb/ls-lR", server.uri())).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_size, 64 * 1024);
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestClient::new(None).unwrap();
        client.fetch(&format!("{}/anything", server.uri())).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download/4hhb.pdb.gz"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/files/4hhb.pdb.gz", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/4hhb.pdb.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1000]))
            .mount(&server)
            .await;

        let client = ReqwestClient::new(None).unwrap();
        let response = client
            .fetch(&format!("{}/download/4hhb.pdb.gz", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.body_size, 1000);
        assert!(response.final_url.ends_with("/files/4hhb.pdb.gz"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ReqwestClient::new(None).unwrap();
        let err = client.fetch(&format!("{}/missing.gz", server.uri())).await.unwrap_err();

        assert_eq!(err.category(), "HTTP");
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = ReqwestClient::new(Some(Duration::from_millis(200))).unwrap();
        let err = client.fetch(&format!("{}/slow.gz", server.uri())).await.unwrap_err();

        assert_eq!(err.category(), "TIMEOUT");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = ReqwestClient::new(Some(Duration::from_secs(5))).unwrap();
        let err = client.fetch("http://127.0.0.1:9/unreachable").await.unwrap_err();

        assert!(matches!(err, AppError::Network(_) | AppError::Timeout(_)));
    }
}
