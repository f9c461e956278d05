use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::weather::ForecastEntry;

/// A thread-safe cache with TTL (time-to-live) support
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new cache with the specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a value from the cache if it exists and hasn't expired
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Insert a value into the cache
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.data.insert(key, entry);
    }

    /// Remove expired entries from the cache
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Raw forecast series keyed by `LocationQuery::cache_key`.
/// The 3-day and 5-day views of a location are served from the same entry.
pub type ForecastCache = Arc<TtlCache<String, Vec<ForecastEntry>>>;

/// Create the forecast cache, or `None` when caching is switched off (TTL 0)
pub fn create_forecast_cache(ttl_secs: u64) -> Option<ForecastCache> {
    (ttl_secs > 0).then(|| Arc::new(TtlCache::new(Duration::from_secs(ttl_secs))))
}

/// Start a background task that cleans up expired cache entries hourly
pub fn start_cache_cleanup_task(cache: ForecastCache) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            let before = cache.len();
            cache.cleanup();
            let after = cache.len();
            if before != after {
                tracing::debug!(
                    removed = before - after,
                    remaining = after,
                    "Forecast cache cleanup completed"
                );
            }
        }
    });
}
