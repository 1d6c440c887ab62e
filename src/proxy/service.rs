//! Proxy Orchestrator
//!
//! The request-handling layer: every operation derives a cache key, consults
//! the store, and on a miss fetches (and possibly composes) upstream payloads
//! before writing the result back. Also exposes the cache introspection and
//! invalidation operations.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheCategory, CacheStore};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::upstream::{
    ChapterEnvelope, Juz, JuzsEnvelope, ScriptVerse, TranslationItem, TranslationsEnvelope,
    VersesEnvelope,
};
use crate::models::{CacheStatusResponse, ClearResponse};
use crate::proxy::fallback::first_non_empty;
use crate::proxy::scan::{accumulate_chapter_ids, ScanBudget, ScanPage};
use crate::upstream::Upstream;

/// Singleton key of the whole-catalog chapter list.
const ALL_CHAPTERS_KEY: &str = "all";

/// Largest chapter holds 286 verses, so one page covers any chapter.
const VERSES_PER_CHAPTER_PAGE: u32 = 300;

// == Proxy Service ==
/// Orchestrates cache lookups and upstream composition for every proxied
/// capability.
pub struct ProxyService {
    cache: Arc<RwLock<CacheStore>>,
    upstream: Arc<dyn Upstream>,
    translation_resources: Vec<u32>,
    transliteration_resource: u32,
    scan_budget: ScanBudget,
    scan_page_size: u32,
}

impl ProxyService {
    pub fn new(
        cache: Arc<RwLock<CacheStore>>,
        upstream: Arc<dyn Upstream>,
        config: &Config,
    ) -> Self {
        Self {
            cache,
            upstream,
            translation_resources: config.translation_resources.clone(),
            transliteration_resource: config.transliteration_resource,
            scan_budget: ScanBudget {
                max_pages: config.juz_scan_max_pages,
                time_budget: config.juz_scan_time_budget,
                ..ScanBudget::default()
            },
            scan_page_size: config.juz_scan_page_size,
        }
    }

    // == Chapter Catalog ==
    /// Lists all chapters; singleton cache key, one upstream call on miss.
    pub async fn list_chapters(&self) -> Result<Value> {
        if let Some(hit) = self
            .cache
            .write()
            .await
            .get(CacheCategory::Chapters, ALL_CHAPTERS_KEY)
        {
            debug!("Chapter catalog served from cache");
            return Ok(hit);
        }

        let payload = self.upstream.get_json("/chapters?language=en").await?;
        self.cache
            .write()
            .await
            .put(CacheCategory::Chapters, ALL_CHAPTERS_KEY, payload.clone());
        Ok(payload)
    }

    // == Juz Listing ==
    /// Raw juz grouping list; pass-through, never cached.
    pub async fn list_juzs(&self) -> Result<Value> {
        self.upstream.get_json("/juzs").await
    }

    // == Chapters Grouped By Juz ==
    /// Resolves which chapters belong to a juz by scanning its paginated
    /// verse listing, then fetches metadata per chapter id in ascending
    /// order, skipping individual failures.
    pub async fn chapters_by_juz(&self, juz_number: u32) -> Result<Value> {
        if !(1..=30).contains(&juz_number) {
            return Err(ProxyError::InvalidRequest(format!(
                "Juz number must be between 1 and 30, got {}",
                juz_number
            )));
        }

        let key = juz_number.to_string();
        if let Some(hit) = self.cache.write().await.get(CacheCategory::JuzChapters, &key) {
            debug!(juz = juz_number, "Juz grouping served from cache");
            return Ok(hit);
        }

        let upstream = &self.upstream;
        let page_size = self.scan_page_size;
        let (ids, stop) = accumulate_chapter_ids(&self.scan_budget, move |page| {
            let path = format!(
                "/verses/by_juz/{}?page={}&per_page={}",
                juz_number, page, page_size
            );
            async move {
                let payload = upstream.get_json(&path).await?;
                let envelope: VersesEnvelope = serde_json::from_value(payload).map_err(|err| {
                    ProxyError::UnexpectedPayload(format!("{}: {}", path, err))
                })?;
                let chapter_ids = envelope
                    .verses
                    .iter()
                    .filter_map(ScriptVerse::chapter_id)
                    .collect();
                let has_next = envelope
                    .pagination
                    .as_ref()
                    .and_then(|p| p.next_page)
                    .is_some();
                Ok(ScanPage {
                    chapter_ids,
                    has_next,
                })
            }
        })
        .await?;

        info!(juz = juz_number, chapters = ids.len(), stop = ?stop, "Juz verse scan finished");

        // BTreeSet iteration yields ids in ascending numeric order.
        let mut chapters = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.fetch_chapter(*id).await {
                Ok(chapter) => chapters.push(chapter),
                Err(err) => {
                    warn!(chapter = id, error = %err, "Skipping chapter metadata fetch")
                }
            }
        }

        let payload = json!({
            "juz_number": juz_number,
            "chapters": chapters,
        });
        self.cache
            .write()
            .await
            .put(CacheCategory::JuzChapters, key, payload.clone());
        Ok(payload)
    }

    // == Chapter Detail ==
    /// Assembles the merged chapter record: metadata, juz annotation, both
    /// script renderings merged per verse, translation via the fallback
    /// probe, and transliteration. Cached as one unit under `{id}:{script}`.
    pub async fn chapter_detail(
        &self,
        chapter_id: u32,
        script: &str,
        bypass_cache: bool,
    ) -> Result<Value> {
        if !(1..=114).contains(&chapter_id) {
            return Err(ProxyError::InvalidRequest(format!(
                "Chapter id must be between 1 and 114, got {}",
                chapter_id
            )));
        }

        let key = format!("{}:{}", chapter_id, script);

        if bypass_cache {
            let mut cache = self.cache.write().await;
            cache.invalidate(CacheCategory::ChapterDetail, &key);
            debug!(%key, "Bypass flag evicted cached chapter detail");
        }

        if let Some(hit) = self.cache.write().await.get(CacheCategory::ChapterDetail, &key) {
            debug!(%key, "Chapter detail served from cache");
            return Ok(hit);
        }

        // Metadata and juz annotation abort the whole request on failure.
        let mut chapter = self.fetch_chapter(chapter_id).await?;
        let juz_number = self.juz_number_for_chapter(chapter_id).await?;
        if let Some(object) = chapter.as_object_mut() {
            object.insert("juz_number".to_string(), json!(juz_number));
        }

        // Both script renderings, fetched concurrently and merged by index.
        let (uthmani, indopak) = tokio::join!(
            self.fetch_script_verses("uthmani", chapter_id),
            self.fetch_script_verses("indopak", chapter_id),
        );
        let (uthmani, indopak) = (uthmani?, indopak?);

        // Translation and transliteration are tolerated sub-fetches: a dead
        // resource degrades the record instead of failing the request.
        let translation = first_non_empty(&self.translation_resources, |resource| {
            self.fetch_translation_items(resource, chapter_id)
        })
        .await;
        let (translation_resource, translations) = match translation {
            Some((resource, items)) => (Some(resource), map_by_position(chapter_id, &items)),
            None => {
                warn!(chapter = chapter_id, "No translation resource returned verses");
                (None, HashMap::new())
            }
        };

        let transliterations = match self
            .fetch_translation_items(self.transliteration_resource, chapter_id)
            .await
        {
            Ok(items) => map_by_position(chapter_id, &items),
            Err(err) => {
                warn!(chapter = chapter_id, error = %err, "Transliteration fetch failed");
                HashMap::new()
            }
        };

        let verses = merge_verses(chapter_id, &uthmani, &indopak, &translations, &transliterations);

        let payload = json!({
            "chapter": chapter,
            "verses": verses,
            "translation_resource": translation_resource,
        });
        self.cache
            .write()
            .await
            .put(CacheCategory::ChapterDetail, key, payload.clone());
        Ok(payload)
    }

    // == Pass-Through Operations ==
    /// Verses of one chapter in one script; single upstream call, not cached.
    pub async fn verses_by_script(&self, chapter_id: u32, script: &str) -> Result<Value> {
        self.upstream
            .get_json(&script_verses_path(script, chapter_id))
            .await
    }

    /// Fixed-resource translation for a chapter; not cached.
    pub async fn chapter_translation(&self, chapter_id: u32) -> Result<Value> {
        let resource = self.translation_resources.first().copied().unwrap_or(131);
        self.upstream
            .get_json(&translation_path(resource, chapter_id))
            .await
    }

    /// Random verse with caller-supplied translation ids; freshness is the
    /// point, so never cached.
    pub async fn random_verse(&self, translations: Option<&str>) -> Result<Value> {
        let path = match translations {
            Some(ids) if !ids.is_empty() => format!("/verses/random?translations={}", ids),
            _ => "/verses/random".to_string(),
        };
        self.upstream.get_json(&path).await
    }

    // == Cache Administration ==
    /// Read-only per-category report; no upstream calls.
    pub async fn cache_status(&self) -> CacheStatusResponse {
        let cache = self.cache.read().await;
        CacheStatusResponse::new(cache.status(), cache.stats())
    }

    /// Invalidates all categories, or the one named by `cache_type`.
    pub async fn clear_cache(&self, cache_type: Option<&str>) -> Result<ClearResponse> {
        let target = cache_type.unwrap_or("all");
        let mut cache = self.cache.write().await;
        let cleared = match target {
            "all" => cache.invalidate_all(),
            "surahs" => cache.invalidate_category(CacheCategory::ChapterDetail),
            "juz" => cache.invalidate_category(CacheCategory::JuzChapters),
            "verses" => cache.invalidate_category(CacheCategory::Verses),
            "translations" => cache.invalidate_category(CacheCategory::Translations),
            other => {
                return Err(ProxyError::InvalidRequest(format!(
                    "Unknown cache type: {}. Valid values: surahs, juz, verses, translations, all",
                    other
                )))
            }
        };
        info!(cache = target, cleared, "Cache invalidated");
        Ok(ClearResponse::new(target, cleared))
    }

    // == Upstream Fetch Helpers ==
    async fn fetch_chapter(&self, chapter_id: u32) -> Result<Value> {
        let path = format!("/chapters/{}?language=en", chapter_id);
        let payload = self.upstream.get_json(&path).await?;
        let envelope: ChapterEnvelope = serde_json::from_value(payload)
            .map_err(|err| ProxyError::UnexpectedPayload(format!("{}: {}", path, err)))?;
        Ok(envelope.chapter)
    }

    async fn fetch_juzs(&self) -> Result<Vec<Juz>> {
        let payload = self.upstream.get_json("/juzs").await?;
        let envelope: JuzsEnvelope = serde_json::from_value(payload)
            .map_err(|err| ProxyError::UnexpectedPayload(format!("/juzs: {}", err)))?;
        Ok(envelope.juzs)
    }

    /// Linear scan of the juz verse mappings. The first juz containing the
    /// chapter wins for chapters spanning a juz boundary.
    async fn juz_number_for_chapter(&self, chapter_id: u32) -> Result<Option<u32>> {
        Ok(self
            .fetch_juzs()
            .await?
            .into_iter()
            .find(|juz| juz.contains_chapter(chapter_id))
            .map(|juz| juz.juz_number))
    }

    async fn fetch_script_verses(&self, script: &str, chapter_id: u32) -> Result<Vec<ScriptVerse>> {
        let path = script_verses_path(script, chapter_id);
        let payload = self.upstream.get_json(&path).await?;
        let envelope: VersesEnvelope = serde_json::from_value(payload)
            .map_err(|err| ProxyError::UnexpectedPayload(format!("{}: {}", path, err)))?;
        Ok(envelope.verses)
    }

    async fn fetch_translation_items(
        &self,
        resource: u32,
        chapter_id: u32,
    ) -> Result<Vec<TranslationItem>> {
        let path = translation_path(resource, chapter_id);
        let payload = self.upstream.get_json(&path).await?;
        let envelope: TranslationsEnvelope = serde_json::from_value(payload)
            .map_err(|err| ProxyError::UnexpectedPayload(format!("{}: {}", path, err)))?;
        Ok(envelope.translations)
    }
}

// == Path Builders ==
fn script_verses_path(script: &str, chapter_id: u32) -> String {
    format!(
        "/quran/verses/{}?chapter_number={}&per_page={}",
        script, chapter_id, VERSES_PER_CHAPTER_PAGE
    )
}

fn translation_path(resource: u32, chapter_id: u32) -> String {
    format!("/quran/translations/{}?chapter_number={}", resource, chapter_id)
}

// == Assembly Helpers ==
/// Maps positional items to `chapter:verse` keys (items arrive in verse
/// order without keys of their own).
fn map_by_position(chapter_id: u32, items: &[TranslationItem]) -> HashMap<String, String> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| (format!("{}:{}", chapter_id, index + 1), item.text.clone()))
        .collect()
}

/// Merges the two script renderings index-by-index into one verse list
/// carrying both text fields plus translation and transliteration.
fn merge_verses(
    chapter_id: u32,
    uthmani: &[ScriptVerse],
    indopak: &[ScriptVerse],
    translations: &HashMap<String, String>,
    transliterations: &HashMap<String, String>,
) -> Vec<Value> {
    let count = uthmani.len().max(indopak.len());
    (0..count)
        .map(|index| {
            let verse_key = uthmani
                .get(index)
                .or_else(|| indopak.get(index))
                .map(|verse| verse.verse_key.clone())
                .unwrap_or_else(|| format!("{}:{}", chapter_id, index + 1));
            json!({
                "verse_number": index + 1,
                "verse_key": verse_key,
                "text_uthmani": uthmani.get(index).and_then(|verse| verse.text("uthmani")),
                "text_indopak": indopak.get(index).and_then(|verse| verse.text("indopak")),
                "translation": translations.get(&verse_key),
                "transliteration": transliterations.get(&verse_key),
            })
        })
        .collect()
}
