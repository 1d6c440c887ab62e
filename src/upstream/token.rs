//! Token Manager
//!
//! Obtains and caches the OAuth2 client-credentials bearer token for the
//! content provider, refreshing proactively before expiry.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::current_timestamp_ms;
use crate::error::{ProxyError, Result};

// == Access Token ==
/// Process-wide token singleton held by the manager.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Opaque bearer token value
    pub value: String,
    /// Expiry timestamp (Unix milliseconds) reported by the provider
    pub expires_at: u64,
}

impl AccessToken {
    /// A token is reused only while `now < expires_at - margin`, so a token
    /// that would expire mid-request is never handed out.
    fn is_fresh(&self, now_ms: u64, margin: Duration) -> bool {
        now_ms + (margin.as_millis() as u64) < self.expires_at
    }
}

/// Token endpoint response shape.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

// == Token Manager ==
/// Caches the bearer token and performs the client-credentials exchange.
///
/// Refreshes are serialized through an async mutex held across the exchange,
/// so concurrent callers hitting the safety margin trigger a single upstream
/// exchange rather than a thundering herd.
pub struct TokenManager {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    margin: Duration,
    token: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        margin: Duration,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            margin,
            token: Mutex::new(None),
        }
    }

    /// Returns a bearer token, exchanging credentials only when the cached
    /// token is absent or within the safety margin of expiry.
    pub async fn get_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        let now = current_timestamp_ms();

        if let Some(token) = guard.as_ref() {
            if token.is_fresh(now, self.margin) {
                return Ok(token.value.clone());
            }
        }

        debug!("Access token absent or near expiry, exchanging credentials");
        let token = self.exchange().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Performs the client-credentials exchange.
    async fn exchange(&self) -> Result<AccessToken> {
        let credentials = BASE64.encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .http
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", credentials))
            .form(&[("grant_type", "client_credentials"), ("scope", "content")])
            .send()
            .await
            .map_err(|err| ProxyError::UpstreamAuth(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::UpstreamAuth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|err| ProxyError::UpstreamAuth(format!("malformed token response: {}", err)))?;

        Ok(AccessToken {
            value: body.access_token,
            expires_at: current_timestamp_ms() + body.expires_in * 1000,
        })
    }

    /// Replaces the cached token directly; test hook for freshness logic.
    #[cfg(test)]
    pub(crate) async fn prime(&self, value: &str, expires_at: u64) {
        *self.token.lock().await = Some(AccessToken {
            value: value.to_string(),
            expires_at,
        });
    }
}
