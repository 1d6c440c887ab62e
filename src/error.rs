//! Error types for the proxy server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for the proxy server.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// OAuth token exchange against the provider failed
    #[error("Token exchange failed: {0}")]
    UpstreamAuth(String),

    /// Non-2xx response or transport failure from the content API
    #[error("Upstream API error ({status}): {message}")]
    UpstreamApi { status: u16, message: String },

    /// Upstream returned a payload the proxy could not interpret
    #[error("Unexpected upstream payload: {0}")]
    UnexpectedPayload(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Wraps a transport-level reqwest failure as an upstream API error.
    ///
    /// Transport failures carry no upstream status; they are reported with
    /// status 502 so callers can still distinguish them in logs.
    pub fn transport(path: &str, err: reqwest::Error) -> Self {
        ProxyError::UpstreamApi {
            status: err.status().map(|s| s.as_u16()).unwrap_or(502),
            message: format!("GET {} failed: {}", path, err),
        }
    }
}

// == IntoResponse Implementation ==
/// Every unrecovered failure surfaces to the HTTP caller as `{ "error": msg }`.
///
/// Upstream and auth failures map to 500 regardless of the upstream status;
/// the client contract distinguishes nothing finer.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamAuth(_)
            | ProxyError::UpstreamApi { .. }
            | ProxyError::UnexpectedPayload(_)
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy server.
pub type Result<T> = std::result::Result<T, ProxyError>;
