//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{bail, Result};

/// Upstream environment selector.
///
/// The content provider runs separate pre-production and production stacks,
/// each with its own API base URL and OAuth token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEnvironment {
    PreProduction,
    Production,
}

impl ApiEnvironment {
    /// Base URL of the content API for this environment.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            ApiEnvironment::PreProduction => {
                "https://apis-prelive.quran.foundation/content/api/v4"
            }
            ApiEnvironment::Production => "https://apis.quran.foundation/content/api/v4",
        }
    }

    /// OAuth2 token endpoint for this environment.
    pub fn token_url(&self) -> &'static str {
        match self {
            ApiEnvironment::PreProduction => {
                "https://prelive-oauth2.quran.foundation/oauth2/token"
            }
            ApiEnvironment::Production => "https://oauth2.quran.foundation/oauth2/token",
        }
    }
}

impl std::str::FromStr for ApiEnvironment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(ApiEnvironment::Production),
            "preproduction" | "preprod" | "prelive" => Ok(ApiEnvironment::PreProduction),
            _ => bail!("Invalid API environment: {}. Valid values: production, preproduction", s),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults, except the upstream credentials which have no default.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds
    pub sweep_interval: u64,
    /// Upstream environment (selects API base URL and token endpoint)
    pub api_environment: ApiEnvironment,
    /// OAuth client id for the content API
    pub client_id: String,
    /// OAuth client secret for the content API
    pub client_secret: String,
    /// Safety margin subtracted from token lifetime, in seconds
    pub token_margin_secs: u64,
    /// Translation resource ids probed in order until one returns verses
    pub translation_resources: Vec<u32>,
    /// Fixed transliteration resource id
    pub transliteration_resource: u32,
    /// Page size for the verse-by-juz scan
    pub juz_scan_page_size: u32,
    /// Hard ceiling on pages fetched per juz scan
    pub juz_scan_max_pages: usize,
    /// Wall-clock budget for a single juz scan
    pub juz_scan_time_budget: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3001)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 3600)
    /// - `QURAN_API_ENV` - `production` or `preproduction` (default: production)
    /// - `QURAN_CLIENT_ID` / `QURAN_CLIENT_SECRET` - OAuth credentials
    /// - `TOKEN_MARGIN_SECS` - token refresh safety margin (default: 300)
    pub fn from_env() -> Self {
        let api_environment = env::var("QURAN_API_ENV")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(ApiEnvironment::Production);

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            api_environment,
            client_id: env::var("QURAN_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("QURAN_CLIENT_SECRET").unwrap_or_default(),
            token_margin_secs: env::var("TOKEN_MARGIN_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            ..Self::default()
        }
    }

    /// Checks that the configuration is usable before the server starts.
    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            bail!("Invalid server port");
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            bail!("QURAN_CLIENT_ID and QURAN_CLIENT_SECRET are required");
        }
        if self.translation_resources.is_empty() {
            bail!("At least one translation resource id is required");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            sweep_interval: 3600,
            api_environment: ApiEnvironment::Production,
            client_id: String::new(),
            client_secret: String::new(),
            token_margin_secs: 300,
            // Editorial ordering: preferred literary translation first, then
            // alternates. These are upstream resource ids, not semantics.
            translation_resources: vec![131, 85, 84],
            transliteration_resource: 57,
            juz_scan_page_size: 50,
            juz_scan_max_pages: 20,
            juz_scan_time_budget: Duration::from_secs(10),
        }
    }
}
