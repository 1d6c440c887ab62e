//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_status_handler, clear_cache_handler, clear_cache_type_handler, health_handler,
    list_juzs_handler, list_surahs_handler, random_verse_handler, surah_detail_handler,
    surah_translation_handler, surah_verses_handler, surahs_by_juz_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/surahs` - list all chapters (cached)
/// - `GET /api/juzs` - juz groupings (pass-through)
/// - `GET /api/surahs/by-juz/:juz_number` - chapters in a juz (cached)
/// - `GET /api/surah/:id` - merged chapter detail (cached)
/// - `GET /api/surah/:id/verses/:font` - verses only (pass-through)
/// - `GET /api/surah/:id/translation` - fixed translation (pass-through)
/// - `GET /api/verses/random` - random verse (pass-through)
/// - `GET /api/health` - health check
/// - `GET /api/cache/status` - cache introspection
/// - `POST /api/cache/clear[/:cache_type]` - cache invalidation
pub fn create_router(state: AppState) -> Router {
    // The browser front end is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/surahs", get(list_surahs_handler))
        .route("/api/surahs/by-juz/:juz_number", get(surahs_by_juz_handler))
        .route("/api/surah/:id", get(surah_detail_handler))
        .route("/api/surah/:id/verses/:font", get(surah_verses_handler))
        .route("/api/surah/:id/translation", get(surah_translation_handler))
        .route("/api/juzs", get(list_juzs_handler))
        .route("/api/verses/random", get(random_verse_handler))
        .route("/api/health", get(health_handler))
        .route("/api/cache/status", get(cache_status_handler))
        .route("/api/cache/clear", post(clear_cache_handler))
        .route("/api/cache/clear/:cache_type", post(clear_cache_type_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
