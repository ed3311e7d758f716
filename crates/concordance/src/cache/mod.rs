//! Result caching and cache invalidation.
//!
//! Expensive analyses are memoized in a `ResultCache`, one per namespace, all
//! backed by a shared `CacheStore`. Keys are content addressed: `cache_key`
//! hashes a sort-key-normalized serialization of the full input, so
//! semantically identical inputs always hit the same entry.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use concordance::cache::{cache_key, CacheRegistry, CacheStore, Invalidate, ResultCache};
//! use serde_json::json;
//!
//! let store = CacheStore::new();
//! let registry = CacheRegistry::new();
//! let cache = Arc::new(ResultCache::new(store, "conflicts", 3600));
//! registry.register(cache.clone() as Arc<dyn Invalidate>);
//!
//! let key = cache_key(&json!({"id": "peter", "type": "character"})).unwrap();
//! cache.set(&key, json!(["birthplace"]), None);
//! assert!(cache.get(&key).is_some());
//!
//! registry.invalidate_all().unwrap();
//! assert!(cache.get(&key).is_none());
//! ```

mod key;
mod registry;
mod result_cache;

pub use key::{cache_key, canonical_json};
pub use registry::{invalidator, CacheRegistry, Invalidate, NamedInvalidator};
pub use result_cache::{CacheEntry, CacheStore, ResultCache};
