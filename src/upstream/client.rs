//! Upstream Client
//!
//! Authenticated GET access to the content API. Every request carries the
//! current access token and the client identifier; any non-2xx response or
//! transport failure surfaces as a typed error with the request path in its
//! message. Retries and fallbacks are caller concerns.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ProxyError, Result};
use crate::upstream::TokenManager;

/// Upstream request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream bodies embedded into error messages are capped at this length.
const ERROR_BODY_LIMIT: usize = 512;

// == Upstream Trait ==
/// Read access to the content API.
///
/// The orchestrator depends on this trait rather than the concrete client so
/// tests can drive it with in-process fakes.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issues a GET for `path_and_query` (relative to the API base URL) and
    /// returns the JSON payload.
    async fn get_json(&self, path_and_query: &str) -> Result<Value>;
}

// == Upstream Client ==
/// Concrete [`Upstream`] implementation over reqwest.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    tokens: Arc<TokenManager>,
}

impl UpstreamClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
            tokens,
        }
    }

    /// Builds the shared reqwest client used for upstream and token traffic.
    pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(20)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn get_json(&self, path_and_query: &str) -> Result<Value> {
        let token = self.tokens.get_token().await?;
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self
            .http
            .get(&url)
            .header("x-auth-token", token)
            .header("x-client-id", &self.client_id)
            .send()
            .await
            .map_err(|err| ProxyError::transport(path_and_query, err))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_BODY_LIMIT)
                .collect();
            return Err(ProxyError::UpstreamApi {
                status: status.as_u16(),
                message: format!("GET {}: {}", path_and_query, body),
            });
        }

        response
            .json()
            .await
            .map_err(|err| ProxyError::UnexpectedPayload(format!("GET {}: {}", path_and_query, err)))
    }
}
