//! Cache Store Module
//!
//! Main cache engine: fixed named categories, each an independent key space
//! with its own TTL, over plain HashMap storage.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::{CacheCategory, CacheEntry, CacheStats, CacheTtls, CategoryStatus};

// == Cache Store ==
/// Partitioned TTL cache for upstream payloads.
///
/// Categories are created once at construction and never added or removed;
/// clearing or expiring one category never affects another. Expired entries
/// are evicted lazily on lookup and eagerly by [`CacheStore::sweep`].
#[derive(Debug)]
pub struct CacheStore {
    /// One key space per category
    entries: HashMap<CacheCategory, HashMap<String, CacheEntry>>,
    /// Per-category TTL configuration
    ttls: CacheTtls,
    /// Hit/miss/eviction counters
    stats: CacheStats,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    // == Constructors ==
    /// Creates a store with the default per-category TTLs.
    pub fn new() -> Self {
        Self::with_ttls(CacheTtls::default())
    }

    /// Creates a store with explicit TTLs (used by tests to shorten expiry).
    pub fn with_ttls(ttls: CacheTtls) -> Self {
        let entries = CacheCategory::ALL
            .iter()
            .map(|category| (*category, HashMap::new()))
            .collect();
        Self {
            entries,
            ttls,
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Returns the payload for `key` if a valid entry exists.
    ///
    /// An entry whose TTL has elapsed is evicted as a side effect of the
    /// failed lookup and counted as a miss.
    pub fn get(&mut self, category: CacheCategory, key: &str) -> Option<Value> {
        let partition = self.entries.get_mut(&category).expect("category exists");

        if let Some(entry) = partition.get(key) {
            if entry.is_expired() {
                partition.remove(key);
                self.stats.record_evictions(1);
                self.stats.record_miss();
                return None;
            }

            let payload = entry.payload.clone();
            self.stats.record_hit();
            return Some(payload);
        }

        self.stats.record_miss();
        None
    }

    // == Put ==
    /// Stores `payload` under `key` with the category's TTL, replacing any
    /// prior entry for that key.
    ///
    /// For [`CacheCategory::ChapterDetail`] the write also evicts every other
    /// variant entry for the same chapter id: variant payloads are mutually
    /// exclusive views of one chapter and must not outlive a refresh of any
    /// of them.
    pub fn put(&mut self, category: CacheCategory, key: impl Into<String>, payload: Value) {
        let key = key.into();

        if category == CacheCategory::ChapterDetail {
            let evicted = self.evict_sibling_variants(&key);
            self.stats.record_evictions(evicted);
        }

        let ttl = self.ttls.for_category(category);
        let partition = self.entries.get_mut(&category).expect("category exists");
        partition.insert(key, CacheEntry::new(payload, ttl));
    }

    /// Removes every `chapter_detail` entry sharing the chapter id of `key`
    /// (keys are `{chapter_id}:{script}`), excluding `key` itself.
    fn evict_sibling_variants(&mut self, key: &str) -> usize {
        let Some(prefix) = key.split(':').next() else {
            return 0;
        };
        let prefix = format!("{}:", prefix);

        let partition = self
            .entries
            .get_mut(&CacheCategory::ChapterDetail)
            .expect("category exists");

        let siblings: Vec<String> = partition
            .keys()
            .filter(|k| k.starts_with(&prefix) && k.as_str() != key)
            .cloned()
            .collect();

        let count = siblings.len();
        for sibling in siblings {
            partition.remove(&sibling);
        }
        count
    }

    // == Invalidation ==
    /// Removes one entry. Returns true if it existed.
    pub fn invalidate(&mut self, category: CacheCategory, key: &str) -> bool {
        let partition = self.entries.get_mut(&category).expect("category exists");
        let removed = partition.remove(key).is_some();
        if removed {
            self.stats.record_evictions(1);
        }
        removed
    }

    /// Empties one category. Returns the number of entries removed.
    pub fn invalidate_category(&mut self, category: CacheCategory) -> usize {
        let partition = self.entries.get_mut(&category).expect("category exists");
        let count = partition.len();
        partition.clear();
        self.stats.record_evictions(count);
        count
    }

    /// Empties every category. Returns the total number of entries removed.
    pub fn invalidate_all(&mut self) -> usize {
        CacheCategory::ALL
            .iter()
            .map(|category| self.invalidate_category(*category))
            .sum()
    }

    // == Sweep ==
    /// Evicts every expired entry in every category.
    ///
    /// Bounds memory growth from keys that are never re-accessed; intended to
    /// run from the periodic sweep task, independent of access patterns.
    pub fn sweep(&mut self) -> usize {
        let mut removed = 0;
        for partition in self.entries.values_mut() {
            let expired: Vec<String> = partition
                .iter()
                .filter(|(_, entry)| entry.is_expired())
                .map(|(key, _)| key.clone())
                .collect();
            removed += expired.len();
            for key in expired {
                partition.remove(&key);
            }
        }
        self.stats.record_evictions(removed);
        removed
    }

    // == Introspection ==
    /// Read-only per-category report; performs no eviction and no upstream calls.
    pub fn status(&self) -> Vec<CategoryStatus> {
        CacheCategory::ALL
            .iter()
            .map(|category| {
                let partition = self.entries.get(category).expect("category exists");
                let oldest_age_secs = partition.values().map(|entry| entry.age_secs()).max();
                CategoryStatus {
                    category: category.name(),
                    populated: !partition.is_empty(),
                    entries: partition.len(),
                    oldest_age_secs,
                    ttl_secs: self.ttls.for_category(*category).as_secs(),
                }
            })
            .collect()
    }

    /// Returns current counter values.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Number of entries in one category.
    pub fn len(&self, category: CacheCategory) -> usize {
        self.entries.get(&category).expect("category exists").len()
    }

    /// True if every category is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|partition| partition.is_empty())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    fn short_ttls() -> CacheTtls {
        CacheTtls {
            chapters: Duration::from_millis(40),
            chapter_detail: Duration::from_millis(40),
            juz_chapters: Duration::from_millis(40),
            verses: Duration::from_millis(40),
            translations: Duration::from_millis(40),
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::Chapters, "all", json!([1, 2, 3]));

        let payload = store.get(CacheCategory::Chapters, "all").unwrap();
        assert_eq!(payload, json!([1, 2, 3]));
    }

    #[test]
    fn test_get_absent() {
        let mut store = CacheStore::new();
        assert!(store.get(CacheCategory::Verses, "1:uthmani").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_replaces_whole_entry() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::Translations, "1", json!({"v": 1}));
        store.put(CacheCategory::Translations, "1", json!({"v": 2}));

        assert_eq!(store.len(CacheCategory::Translations), 1);
        let payload = store.get(CacheCategory::Translations, "1").unwrap();
        assert_eq!(payload["v"], 2);
    }

    #[test]
    fn test_expired_entry_never_returned() {
        let mut store = CacheStore::with_ttls(short_ttls());
        store.put(CacheCategory::JuzChapters, "5", json!([]));

        assert!(store.get(CacheCategory::JuzChapters, "5").is_some());
        sleep(Duration::from_millis(60));
        assert!(store.get(CacheCategory::JuzChapters, "5").is_none());
        // Lazy eviction removed the entry on the failed lookup.
        assert_eq!(store.len(CacheCategory::JuzChapters), 0);
    }

    #[test]
    fn test_cross_variant_invalidation() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::ChapterDetail, "1:indopak", json!({"script": "indopak"}));
        store.put(CacheCategory::ChapterDetail, "12:uthmani", json!({"script": "uthmani"}));

        // Writing chapter 1 in another script evicts the indopak entry but
        // leaves chapter 12 (shared digit prefix, different id) alone.
        store.put(CacheCategory::ChapterDetail, "1:uthmani", json!({"script": "uthmani"}));

        assert!(store.get(CacheCategory::ChapterDetail, "1:indopak").is_none());
        assert!(store.get(CacheCategory::ChapterDetail, "1:uthmani").is_some());
        assert!(store.get(CacheCategory::ChapterDetail, "12:uthmani").is_some());
    }

    #[test]
    fn test_cross_variant_invalidation_reverse_direction() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::ChapterDetail, "1:uthmani", json!(1));
        store.put(CacheCategory::ChapterDetail, "1:indopak", json!(2));

        assert!(store.get(CacheCategory::ChapterDetail, "1:uthmani").is_none());
        assert!(store.get(CacheCategory::ChapterDetail, "1:indopak").is_some());
    }

    #[test]
    fn test_cross_variant_policy_is_category_specific() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::Verses, "1:uthmani", json!(1));
        store.put(CacheCategory::Verses, "1:indopak", json!(2));

        // Only chapter_detail carries the mutual-exclusion policy.
        assert!(store.get(CacheCategory::Verses, "1:uthmani").is_some());
        assert!(store.get(CacheCategory::Verses, "1:indopak").is_some());
    }

    #[test]
    fn test_invalidate_single_key() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::ChapterDetail, "1:uthmani", json!(1));

        assert!(store.invalidate(CacheCategory::ChapterDetail, "1:uthmani"));
        assert!(!store.invalidate(CacheCategory::ChapterDetail, "1:uthmani"));
        assert!(store.get(CacheCategory::ChapterDetail, "1:uthmani").is_none());
    }

    #[test]
    fn test_invalidate_category_leaves_others() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::ChapterDetail, "1:uthmani", json!(1));
        store.put(CacheCategory::JuzChapters, "3", json!([2, 3]));

        let removed = store.invalidate_category(CacheCategory::ChapterDetail);
        assert_eq!(removed, 1);
        assert!(store.get(CacheCategory::ChapterDetail, "1:uthmani").is_none());
        assert!(store.get(CacheCategory::JuzChapters, "3").is_some());
    }

    #[test]
    fn test_invalidate_all() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::Chapters, "all", json!([]));
        store.put(CacheCategory::ChapterDetail, "1:uthmani", json!(1));
        store.put(CacheCategory::JuzChapters, "1", json!([]));
        store.put(CacheCategory::Verses, "1:uthmani", json!([]));
        store.put(CacheCategory::Translations, "1", json!([]));

        let removed = store.invalidate_all();
        assert_eq!(removed, 5);
        assert!(store.is_empty());
        for category in CacheCategory::ALL {
            assert!(store.get(category, "all").is_none());
            assert!(store.get(category, "1:uthmani").is_none());
        }
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let mut store = CacheStore::with_ttls(CacheTtls {
            chapters: Duration::from_millis(40),
            ..CacheTtls::default()
        });
        store.put(CacheCategory::Chapters, "all", json!([]));
        store.put(CacheCategory::Translations, "1", json!([]));

        sleep(Duration::from_millis(60));

        let removed = store.sweep();
        assert_eq!(removed, 1);
        assert_eq!(store.len(CacheCategory::Chapters), 0);
        assert_eq!(store.len(CacheCategory::Translations), 1);
    }

    #[test]
    fn test_status_reports_all_categories() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::Chapters, "all", json!([]));

        let status = store.status();
        assert_eq!(status.len(), CacheCategory::ALL.len());

        let chapters = status.iter().find(|s| s.category == "chapters").unwrap();
        assert!(chapters.populated);
        assert_eq!(chapters.entries, 1);
        assert!(chapters.oldest_age_secs.is_some());

        let verses = status.iter().find(|s| s.category == "verses").unwrap();
        assert!(!verses.populated);
        assert_eq!(verses.entries, 0);
        assert!(verses.oldest_age_secs.is_none());
    }

    #[test]
    fn test_stats_counters() {
        let mut store = CacheStore::new();
        store.put(CacheCategory::Chapters, "all", json!([]));
        store.get(CacheCategory::Chapters, "all");
        store.get(CacheCategory::Chapters, "missing");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
