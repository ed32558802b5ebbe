//! In-memory TTL cache for tool results.
//!
//! Implements the [`ResultCache`] port with a concurrent map: independent
//! entries, no cross-entry locking, safe concurrent get/put from all
//! research workers. Eviction is lazy: an expired entry is removed by the
//! next lookup that touches it; no background sweep runs.

use dashmap::DashMap;
use lexora_application::ports::cache::ResultCache;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// One cached tool result.
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
    hits: AtomicU64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-wide TTL cache keyed by tool name + canonical parameter hash.
///
/// Entries outlive individual requests; no request owns an entry.
#[derive(Default)]
pub struct TtlToolCache {
    entries: DashMap<String, CacheEntry>,
    total_hits: AtomicU64,
    total_misses: AtomicU64,
}

impl TtlToolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total hits across all entries since startup.
    pub fn hit_count(&self) -> u64 {
        self.total_hits.load(Ordering::Relaxed)
    }

    /// Total misses (absent or expired) since startup.
    pub fn miss_count(&self) -> u64 {
        self.total_misses.load(Ordering::Relaxed)
    }

    /// Build the cache key: `tool_name + ":" + stable parameter hash`.
    ///
    /// Parameters are canonicalized (object keys sorted recursively) so
    /// identical calls hash identically regardless of argument order or
    /// map iteration order.
    pub fn cache_key(tool_name: &str, params: &serde_json::Value) -> String {
        let canonical = canonical_json(params);
        let digest = Sha256::digest(canonical.as_bytes());
        format!("{}:{}", tool_name, hex::encode(&digest[..16]))
    }
}

/// Render a JSON value with recursively sorted object keys.
fn canonical_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| {
                    format!(
                        "{}:{}",
                        serde_json::Value::String(k.clone()),
                        canonical_json(&map[k])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        serde_json::Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", rendered.join(","))
        }
        other => other.to_string(),
    }
}

impl ResultCache for TtlToolCache {
    fn get(&self, tool_name: &str, params: &serde_json::Value) -> Option<serde_json::Value> {
        let key = Self::cache_key(tool_name, params);
        let now = Instant::now();

        // Expired entries are misses; remove on access.
        if let Some(entry) = self.entries.get(&key) {
            if entry.is_expired(now) {
                drop(entry);
                self.entries.remove(&key);
                self.total_misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache entry expired; evicted");
                return None;
            }
            entry.hits.fetch_add(1, Ordering::Relaxed);
            self.total_hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Cache hit");
            return Some(entry.value.clone());
        }

        self.total_misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn put(
        &self,
        tool_name: &str,
        params: &serde_json::Value,
        value: serde_json::Value,
        ttl: Duration,
    ) {
        let key = Self::cache_key(tool_name, params);
        trace!(key = %key, ttl_secs = ttl.as_secs(), "Cache store");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
                hits: AtomicU64::new(0),
            },
        );
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> serde_json::Value {
        serde_json::json!({ "query": query, "jurisdiction": "federal" })
    }

    #[test]
    fn test_put_get_roundtrip() {
        let cache = TtlToolCache::new();
        cache.put(
            "search_case_law",
            &params("breach"),
            serde_json::json!("results"),
            Duration::from_secs(60),
        );

        let value = cache.get("search_case_law", &params("breach"));
        assert_eq!(value, Some(serde_json::json!("results")));
        assert_eq!(cache.hit_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss_on_different_params() {
        let cache = TtlToolCache::new();
        cache.put(
            "search_case_law",
            &params("breach"),
            serde_json::json!("results"),
            Duration::from_secs(60),
        );

        assert!(cache.get("search_case_law", &params("fraud")).is_none());
        assert!(cache.get("verify_citation", &params("breach")).is_none());
        assert_eq!(cache.miss_count(), 2);
    }

    #[test]
    fn test_key_ignores_argument_order() {
        let a = serde_json::json!({ "query": "breach", "jurisdiction": "federal" });
        let b = serde_json::json!({ "jurisdiction": "federal", "query": "breach" });
        assert_eq!(
            TtlToolCache::cache_key("search_case_law", &a),
            TtlToolCache::cache_key("search_case_law", &b)
        );
    }

    #[test]
    fn test_key_distinguishes_nested_values() {
        let a = serde_json::json!({ "range": { "from": "2024-01-01", "to": "2025-01-01" } });
        let b = serde_json::json!({ "range": { "from": "2024-01-01", "to": "2025-06-01" } });
        assert_ne!(
            TtlToolCache::cache_key("search_case_law", &a),
            TtlToolCache::cache_key("search_case_law", &b)
        );
    }

    #[test]
    fn test_expired_entry_is_a_miss_and_evicted() {
        let cache = TtlToolCache::new();
        cache.put(
            "search_case_law",
            &params("breach"),
            serde_json::json!("stale"),
            Duration::from_millis(1),
        );

        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.get("search_case_law", &params("breach")).is_none());
        // Lazy eviction removed the entry on access.
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.hit_count(), 0);
    }

    #[test]
    fn test_evict_expired_sweep() {
        let cache = TtlToolCache::new();
        cache.put("a", &params("1"), serde_json::json!(1), Duration::from_millis(1));
        cache.put("b", &params("2"), serde_json::json!(2), Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.evict_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hit_counter_increments_per_hit() {
        let cache = TtlToolCache::new();
        cache.put("a", &params("1"), serde_json::json!(1), Duration::from_secs(60));

        for _ in 0..3 {
            cache.get("a", &params("1"));
        }
        assert_eq!(cache.hit_count(), 3);
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;

        let cache = Arc::new(TtlToolCache::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                let p = serde_json::json!({ "worker": i % 2 });
                cache.put("tool", &p, serde_json::json!(i), Duration::from_secs(60));
                cache.get("tool", &p)
            }));
        }

        for handle in handles {
            assert!(handle.join().unwrap().is_some());
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let value = serde_json::json!({ "b": 1, "a": { "d": 2, "c": 3 } });
        assert_eq!(canonical_json(&value), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }
}
