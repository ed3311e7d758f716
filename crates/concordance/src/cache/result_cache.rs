//! Namespaced, TTL-based memoization over a shared store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

use super::registry::Invalidate;

/// A cached value with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Namespace of the owning cache.
    pub namespace: String,
    /// Deterministic key within the namespace.
    pub key: String,
    /// Opaque structured value.
    pub value: Value,
    /// When the value was stored.
    pub created_at: DateTime<Utc>,
    /// Time to live, in seconds.
    pub ttl_seconds: u64,
    /// Analyzer or model that produced the value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl CacheEntry {
    /// An entry is absent once `now - created_at >= ttl`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl_duration(self.ttl_seconds)
    }
}

fn ttl_duration(seconds: u64) -> Duration {
    let bounded = seconds.min((i64::MAX / 1_000) as u64);
    Duration::seconds(bounded as i64)
}

/// Process-lifetime key/value table shared by every `ResultCache`.
///
/// Cloning is cheap and yields a handle to the same table. Writes are
/// last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: Arc<RwLock<HashMap<(String, String), CacheEntry>>>,
}

impl CacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, namespace: &str, key: &str) -> Option<CacheEntry> {
        self.entries
            .read()
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    fn put(&self, entry: CacheEntry) {
        self.entries
            .write()
            .insert((entry.namespace.clone(), entry.key.clone()), entry);
    }

    fn remove(&self, namespace: &str, key: &str) {
        self.entries
            .write()
            .remove(&(namespace.to_string(), key.to_string()));
    }

    fn clear_namespace(&self, namespace: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(ns, _), _| ns != namespace);
        before - entries.len()
    }

    fn namespace_len(&self, namespace: &str) -> usize {
        self.entries
            .read()
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .count()
    }

    /// Total number of stored entries across namespaces, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Memoizes derived results under one namespace with a maximum age.
pub struct ResultCache {
    store: CacheStore,
    namespace: String,
    max_age_seconds: u64,
    invalidator_name: String,
    clock: Clock,
}

impl ResultCache {
    /// Create a cache for `namespace` whose entries live for `max_age_seconds`.
    pub fn new(store: CacheStore, namespace: impl Into<String>, max_age_seconds: u64) -> Self {
        let namespace = namespace.into();
        Self {
            store,
            invalidator_name: format!("cache:{}", namespace),
            namespace,
            max_age_seconds,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the time source (used to exercise expiry deterministically).
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    /// Full entry for a live key, including provenance.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.store.get(&self.namespace, key)?;
        if entry.is_expired_at((self.clock)()) {
            debug!(namespace = %self.namespace, key, "cache entry expired");
            self.store.remove(&self.namespace, key);
            return None;
        }
        Some(entry)
    }

    /// Stored value if present and younger than the maximum age.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.entry(key) {
            Some(entry) => {
                debug!(namespace = %self.namespace, key, "cache hit");
                Some(entry.value)
            }
            None => {
                debug!(namespace = %self.namespace, key, "cache miss");
                None
            }
        }
    }

    /// Typed `get`. A value that no longer deserializes counts as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                debug!(namespace = %self.namespace, key, error = %e, "discarding undecodable cache entry");
                self.store.remove(&self.namespace, key);
                None
            }
        }
    }

    /// Store a value with an optional provenance tag.
    pub fn set(&self, key: &str, value: Value, model_name: Option<&str>) {
        self.store.put(CacheEntry {
            namespace: self.namespace.clone(),
            key: key.to_string(),
            value,
            created_at: (self.clock)(),
            ttl_seconds: self.max_age_seconds,
            model_name: model_name.map(str::to_string),
        });
    }

    /// Typed `set`.
    pub fn set_as<T: Serialize>(&self, key: &str, value: &T, model_name: Option<&str>) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value, model_name);
        Ok(())
    }

    /// Drop every entry in this namespace. Other namespaces are untouched.
    pub fn clear(&self) -> usize {
        let removed = self.store.clear_namespace(&self.namespace);
        debug!(namespace = %self.namespace, removed, "cache cleared");
        removed
    }

    /// Number of stored entries in this namespace, expired ones included.
    pub fn len(&self) -> usize {
        self.store.namespace_len(&self.namespace)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("namespace", &self.namespace)
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

impl Invalidate for ResultCache {
    fn name(&self) -> &str {
        &self.invalidator_name
    }

    fn invalidate(&self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    fn manual_clock() -> (Arc<Mutex<DateTime<Utc>>>, impl Fn() -> DateTime<Utc> + Send + Sync) {
        let now = Arc::new(Mutex::new(Utc::now()));
        let handle = now.clone();
        (now, move || *handle.lock())
    }

    #[test]
    fn test_set_then_get_with_provenance() {
        let cache = ResultCache::new(CacheStore::new(), "semantic", 60);
        cache.set("peter", json!({"genuine": 2}), Some("lexical"));

        assert_eq!(cache.get("peter"), Some(json!({"genuine": 2})));
        let entry = cache.entry("peter").unwrap();
        assert_eq!(entry.model_name.as_deref(), Some("lexical"));
        assert_eq!(entry.ttl_seconds, 60);
        assert_eq!(cache.get("paul"), None);
    }

    #[test]
    fn test_entry_expires_at_ttl_boundary() {
        let (now, clock) = manual_clock();
        let cache = ResultCache::new(CacheStore::new(), "queue", 10).with_clock(clock);
        cache.set("k", json!(1), None);

        *now.lock() += Duration::seconds(9);
        assert_eq!(cache.get("k"), Some(json!(1)));

        *now.lock() += Duration::seconds(1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_is_never_served() {
        let cache = ResultCache::new(CacheStore::new(), "queue", 0);
        cache.set("k", json!(1), None);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = CacheStore::new();
        let a = ResultCache::new(store.clone(), "a", 60);
        let b = ResultCache::new(store.clone(), "b", 60);

        a.set("same", json!("from a"), None);
        b.set("same", json!("from b"), None);
        assert_eq!(a.get("same"), Some(json!("from a")));
        assert_eq!(b.get("same"), Some(json!("from b")));

        assert_eq!(a.clear(), 1);
        assert_eq!(a.get("same"), None);
        assert_eq!(b.get("same"), Some(json!("from b")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = ResultCache::new(CacheStore::new(), "ns", 60);
        cache.set("k", json!(1), Some("first"));
        cache.set("k", json!(2), Some("second"));
        assert_eq!(cache.get("k"), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_typed_round_trip_and_undecodable_miss() {
        let cache = ResultCache::new(CacheStore::new(), "ns", 60);
        cache.set_as("scores", &vec![0.5_f64, 0.25], None).unwrap();
        assert_eq!(cache.get_as::<Vec<f64>>("scores"), Some(vec![0.5, 0.25]));

        cache.set("scores", json!("not a list"), None);
        assert_eq!(cache.get_as::<Vec<f64>>("scores"), None);
        assert!(cache.is_empty());
    }
}
