//! Engine configuration.
//!
//! Configuration is plain data with defaults, builder methods, and optional
//! JSON persistence:
//!
//! ```json
//! {
//!   "cache": { "enabled": true, "queue_ttl_secs": 3600 },
//!   "use_semantic": true,
//!   "default_limit": 25
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConcordanceError, Result};

/// Cache lifetimes per namespace, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch. When off, no namespace is consulted or written.
    pub enabled: bool,
    /// Whole curation queues.
    pub queue_ttl_secs: u64,
    /// Per-entity conflict analyses (content addressed).
    pub conflict_ttl_secs: u64,
    /// Semantic uncertainty estimates (content addressed).
    pub uncertainty_ttl_secs: u64,
    /// Edit impact previews.
    pub impact_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_ttl_secs: 3_600,
            conflict_ttl_secs: 86_400,
            uncertainty_ttl_secs: 86_400,
            impact_ttl_secs: 600,
        }
    }
}

impl CacheConfig {
    /// Configuration with caching turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Configuration for a `Concordance` engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcordanceConfig {
    /// Cache settings.
    pub cache: CacheConfig,
    /// Consult the semantic analyzer, if one is attached.
    pub use_semantic: bool,
    /// Queue size used when the caller passes no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,
}

impl Default for ConcordanceConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            use_semantic: true,
            default_limit: None,
        }
    }
}

impl ConcordanceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Enable or disable the semantic analyzer.
    pub fn with_semantic(mut self, enabled: bool) -> Self {
        self.use_semantic = enabled;
        self
    }

    /// Set the default queue size.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = Some(limit);
        self
    }

    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ConcordanceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ConcordanceConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ConcordanceError::Config(format!("failed to parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.default_limit == Some(0) {
            return Err(ConcordanceError::Config(
                "default_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
