//! Expiry Sweep Task
//!
//! Background task that periodically evicts expired cache entries across all
//! categories, bounding memory growth from keys that are never re-accessed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns the periodic expiry sweep.
///
/// The task loops forever, sleeping for the configured interval and then
/// sweeping the store through the same mutation path request handlers use.
/// The returned handle is aborted during graceful shutdown.
///
/// # Arguments
/// * `cache` - shared reference to the cache store
/// * `sweep_interval_secs` - interval in seconds between sweeps
pub fn spawn_sweep_task(
    cache: Arc<RwLock<CacheStore>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep()
            };

            if removed > 0 {
                info!("Expiry sweep: evicted {} entries", removed);
            } else {
                debug!("Expiry sweep: nothing expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheCategory, CacheTtls};
    use serde_json::json;

    fn store_with_short_chapter_ttl() -> CacheStore {
        CacheStore::with_ttls(CacheTtls {
            chapters: Duration::from_millis(100),
            ..CacheTtls::default()
        })
    }

    #[tokio::test]
    async fn test_sweep_task_evicts_expired_entries() {
        let cache = Arc::new(RwLock::new(store_with_short_chapter_ttl()));

        {
            let mut cache_guard = cache.write().await;
            cache_guard.put(CacheCategory::Chapters, "all", json!([]));
            cache_guard.put(CacheCategory::Translations, "1", json!([]));
        }

        let handle = spawn_sweep_task(cache.clone(), 1);

        // One sweep after the chapter entry's 100ms TTL has elapsed.
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let cache_guard = cache.read().await;
            assert_eq!(cache_guard.len(CacheCategory::Chapters), 0);
            assert_eq!(cache_guard.len(CacheCategory::Translations), 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = Arc::new(RwLock::new(CacheStore::new()));

        let handle = spawn_sweep_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
