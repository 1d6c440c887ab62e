//! Cache Category Module
//!
//! The store is partitioned into fixed, independent categories, one per
//! upstream data shape, each with its own TTL and key space.

use std::time::Duration;

// == Cache Category ==
/// Named cache partitions. The set is fixed at process start; only the
/// entries inside each partition are dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    /// The whole-catalog chapter list (singleton key)
    Chapters,
    /// Assembled chapter detail, keyed by `{chapter_id}:{script}`
    ChapterDetail,
    /// Chapters grouped by juz, keyed by juz number
    JuzChapters,
    /// Verse sets, keyed by `{chapter_id}:{script}`
    Verses,
    /// Translation sets, keyed by chapter id
    Translations,
}

impl CacheCategory {
    /// Every category, in display order.
    pub const ALL: [CacheCategory; 5] = [
        CacheCategory::Chapters,
        CacheCategory::ChapterDetail,
        CacheCategory::JuzChapters,
        CacheCategory::Verses,
        CacheCategory::Translations,
    ];

    /// Stable name used in status reports and logs.
    pub fn name(&self) -> &'static str {
        match self {
            CacheCategory::Chapters => "chapters",
            CacheCategory::ChapterDetail => "chapter_detail",
            CacheCategory::JuzChapters => "juz_chapters",
            CacheCategory::Verses => "verses",
            CacheCategory::Translations => "translations",
        }
    }
}

// == Per-Category TTLs ==
/// TTL assignment per category.
///
/// Chapter catalog and translations change rarely upstream; the assembled
/// chapter detail and juz groupings are refreshed more often.
#[derive(Debug, Clone)]
pub struct CacheTtls {
    pub chapters: Duration,
    pub chapter_detail: Duration,
    pub juz_chapters: Duration,
    pub verses: Duration,
    pub translations: Duration,
}

impl CacheTtls {
    /// TTL for a given category.
    pub fn for_category(&self, category: CacheCategory) -> Duration {
        match category {
            CacheCategory::Chapters => self.chapters,
            CacheCategory::ChapterDetail => self.chapter_detail,
            CacheCategory::JuzChapters => self.juz_chapters,
            CacheCategory::Verses => self.verses,
            CacheCategory::Translations => self.translations,
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            chapters: Duration::from_secs(24 * 3600),
            chapter_detail: Duration::from_secs(12 * 3600),
            juz_chapters: Duration::from_secs(6 * 3600),
            verses: Duration::from_secs(6 * 3600),
            translations: Duration::from_secs(24 * 3600),
        }
    }
}
