//! Trait abstraction for the HTTP transport to enable testing

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Minimal response surface the session manager needs
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body text
    pub body: String,
}

impl ApiResponse {
    /// Any 2xx status counts as success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 401/403 signal an expired or invalid session token
    pub fn is_auth_failure(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Trait for JSON POSTs against the remote API
#[async_trait]
pub trait ApiTransport: Send {
    /// POST a JSON body, optionally with a bearer token attached
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse>;
}

/// reqwest-backed transport with a client-level request timeout
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the transport with the given per-request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse> {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}
