//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint. Handlers stay thin: they
//! extract parameters and delegate to the orchestrator.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    CacheStatusResponse, ChapterDetailQuery, ClearResponse, HealthResponse, RandomVerseQuery,
};
use crate::proxy::ProxyService;
use crate::upstream::Upstream;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator behind every proxied endpoint
    pub proxy: Arc<ProxyService>,
}

impl AppState {
    /// Creates a new AppState around an existing orchestrator.
    pub fn new(proxy: Arc<ProxyService>) -> Self {
        Self { proxy }
    }

    /// Wires an orchestrator from its parts.
    ///
    /// The cache handle is shared with the sweep task, so callers keep their
    /// own clone of the `Arc`.
    pub fn from_parts(
        cache: Arc<RwLock<CacheStore>>,
        upstream: Arc<dyn Upstream>,
        config: &Config,
    ) -> Self {
        Self::new(Arc::new(ProxyService::new(cache, upstream, config)))
    }
}

/// Handler for GET /api/surahs
pub async fn list_surahs_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.proxy.list_chapters().await?))
}

/// Handler for GET /api/juzs
pub async fn list_juzs_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.proxy.list_juzs().await?))
}

/// Handler for GET /api/surahs/by-juz/:juz_number
pub async fn surahs_by_juz_handler(
    State(state): State<AppState>,
    Path(juz_number): Path<u32>,
) -> Result<Json<Value>> {
    Ok(Json(state.proxy.chapters_by_juz(juz_number).await?))
}

/// Handler for GET /api/surah/:id
///
/// `font` selects the cache key's script variant; `clearCache`/`forceRefresh`
/// evict the cached entry before lookup.
pub async fn surah_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<ChapterDetailQuery>,
) -> Result<Json<Value>> {
    let payload = state
        .proxy
        .chapter_detail(id, query.script(), query.bypass_cache())
        .await?;
    Ok(Json(payload))
}

/// Handler for GET /api/surah/:id/verses/:font
pub async fn surah_verses_handler(
    State(state): State<AppState>,
    Path((id, font)): Path<(u32, String)>,
) -> Result<Json<Value>> {
    Ok(Json(state.proxy.verses_by_script(id, &font).await?))
}

/// Handler for GET /api/surah/:id/translation
pub async fn surah_translation_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Value>> {
    Ok(Json(state.proxy.chapter_translation(id).await?))
}

/// Handler for GET /api/verses/random
pub async fn random_verse_handler(
    State(state): State<AppState>,
    Query(query): Query<RandomVerseQuery>,
) -> Result<Json<Value>> {
    Ok(Json(
        state.proxy.random_verse(query.translations.as_deref()).await?,
    ))
}

/// Handler for GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /api/cache/status
pub async fn cache_status_handler(State(state): State<AppState>) -> Json<CacheStatusResponse> {
    Json(state.proxy.cache_status().await)
}

/// Handler for POST /api/cache/clear
pub async fn clear_cache_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    Ok(Json(state.proxy.clear_cache(None).await?))
}

/// Handler for POST /api/cache/clear/:cache_type
pub async fn clear_cache_type_handler(
    State(state): State<AppState>,
    Path(cache_type): Path<String>,
) -> Result<Json<ClearResponse>> {
    Ok(Json(state.proxy.clear_cache(Some(&cache_type)).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use async_trait::async_trait;

    /// Upstream that fails every call; enough for handler-level wiring tests.
    struct DeadUpstream;

    #[async_trait]
    impl Upstream for DeadUpstream {
        async fn get_json(&self, path: &str) -> Result<Value> {
            Err(ProxyError::UpstreamApi {
                status: 503,
                message: format!("GET {}: unavailable", path),
            })
        }
    }

    fn dead_state() -> AppState {
        AppState::from_parts(
            Arc::new(RwLock::new(CacheStore::new())),
            Arc::new(DeadUpstream),
            &Config::default(),
        )
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_cache_status_handler_empty() {
        let response = cache_status_handler(State(dead_state())).await;
        assert_eq!(response.categories.len(), 5);
        assert!(response.categories.iter().all(|c| !c.populated));
    }

    #[tokio::test]
    async fn test_clear_handlers() {
        let state = dead_state();

        let response = clear_cache_handler(State(state.clone())).await.unwrap();
        assert_eq!(response.cleared, 0);

        let result =
            clear_cache_type_handler(State(state.clone()), Path("juz".to_string())).await;
        assert!(result.is_ok());

        let result = clear_cache_type_handler(State(state), Path("bogus".to_string())).await;
        assert!(matches!(result, Err(ProxyError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates_from_handler() {
        let result = list_surahs_handler(State(dead_state())).await;
        assert!(matches!(result, Err(ProxyError::UpstreamApi { .. })));
    }
}
