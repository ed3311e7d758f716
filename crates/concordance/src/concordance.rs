//! Main Concordance struct and public API.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::cache::{CacheRegistry, CacheStore, Invalidate, ResultCache};
use crate::config::ConcordanceConfig;
use crate::conflict::ConflictRecord;
use crate::curation::{
    Assessor, CurationQueue, CurationQueueBuilder, EditImpact, EntityAssessment, ImpactPreviewer,
};
use crate::entity::{EntityRepository, EntityType};
use crate::error::Result;
use crate::scoring::UncertaintyEstimator;
use crate::semantic::SemanticAnalyzer;

pub const CONFLICTS_NAMESPACE: &str = "entity_conflicts";
pub const UNCERTAINTY_NAMESPACE: &str = "uncertainty";
pub const QUEUE_NAMESPACE: &str = "curation_queue";
pub const IMPACT_NAMESPACE: &str = "json_edit_impact";

/// Per-namespace caches owned by one engine.
#[derive(Debug)]
struct EngineCaches {
    conflicts: Arc<ResultCache>,
    uncertainty: Arc<ResultCache>,
    queue: Arc<ResultCache>,
    impact: Arc<ResultCache>,
}

impl EngineCaches {
    fn new(store: &CacheStore, config: &ConcordanceConfig) -> Self {
        let cache = |namespace: &str, ttl: u64| Arc::new(ResultCache::new(store.clone(), namespace, ttl));
        Self {
            conflicts: cache(CONFLICTS_NAMESPACE, config.cache.conflict_ttl_secs),
            uncertainty: cache(UNCERTAINTY_NAMESPACE, config.cache.uncertainty_ttl_secs),
            queue: cache(QUEUE_NAMESPACE, config.cache.queue_ttl_secs),
            impact: cache(IMPACT_NAMESPACE, config.cache.impact_ttl_secs),
        }
    }

    fn all(&self) -> [&Arc<ResultCache>; 4] {
        [&self.conflicts, &self.uncertainty, &self.queue, &self.impact]
    }
}

/// The curation engine.
///
/// Owns its caches and registers each with the `CacheRegistry` it was given,
/// so any component holding the registry can invalidate them after a data
/// change.
pub struct Concordance {
    config: ConcordanceConfig,
    repository: Arc<dyn EntityRepository>,
    registry: Arc<CacheRegistry>,
    caches: EngineCaches,
    analyzer: Option<Arc<dyn SemanticAnalyzer>>,
}

impl Concordance {
    /// Create an engine with default configuration.
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self::with_config(repository, ConcordanceConfig::default())
    }

    /// Create an engine with a private cache store and registry.
    pub fn with_config(repository: Arc<dyn EntityRepository>, config: ConcordanceConfig) -> Self {
        Self::with_shared(
            repository,
            config,
            CacheStore::new(),
            Arc::new(CacheRegistry::new()),
        )
    }

    /// Create an engine that shares a cache store and registry with other components.
    pub fn with_shared(
        repository: Arc<dyn EntityRepository>,
        config: ConcordanceConfig,
        store: CacheStore,
        registry: Arc<CacheRegistry>,
    ) -> Self {
        let caches = EngineCaches::new(&store, &config);
        for cache in caches.all() {
            registry.register(cache.clone() as Arc<dyn Invalidate>);
        }

        Self {
            config,
            repository,
            registry,
            caches,
            analyzer: None,
        }
    }

    /// Attach a semantic analyzer to refine uncertainty estimates.
    ///
    /// Ignored when `use_semantic` is off in the configuration.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn config(&self) -> &ConcordanceConfig {
        &self.config
    }

    /// The registry this engine's caches are registered with.
    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    fn caching(&self, use_cache: bool) -> bool {
        use_cache && self.config.cache.enabled
    }

    fn assessor(&self, use_cache: bool) -> Assessor {
        let cached = self.caching(use_cache);

        let mut estimator = match (&self.analyzer, self.config.use_semantic) {
            (Some(analyzer), true) => UncertaintyEstimator::with_analyzer(analyzer.clone()),
            _ => UncertaintyEstimator::structural(),
        };
        if cached {
            estimator = estimator.with_cache(self.caches.uncertainty.clone());
        }

        let assessor = Assessor::new(estimator);
        if cached {
            assessor.with_conflict_cache(self.caches.conflicts.clone())
        } else {
            assessor
        }
    }

    /// Rank every entity of `entity_type` by curation priority.
    ///
    /// `limit` falls back to the configured default. With `use_cache` false
    /// no cache layer is read or written.
    pub fn build_curation_review_queue(
        &self,
        entity_type: &str,
        limit: Option<usize>,
        use_cache: bool,
    ) -> Result<CurationQueue> {
        let builder = CurationQueueBuilder::new(self.repository.clone(), self.assessor(use_cache));
        let builder = if self.caching(use_cache) {
            builder.with_queue_cache(self.caches.queue.clone())
        } else {
            builder
        };
        builder.build(entity_type, limit.or(self.config.default_limit), use_cache)
    }

    /// Preview how an edit to a raw entity record changes its curation metrics.
    pub fn describe_json_edit_impact(
        &self,
        before: &Value,
        after: &Value,
        entity_type: &str,
    ) -> Result<EditImpact> {
        let previewer = ImpactPreviewer::new();
        let previewer = if self.caching(true) {
            previewer.with_cache(self.caches.impact.clone())
        } else {
            previewer
        };
        previewer.describe(before, after, entity_type)
    }

    /// Conflict records for one stored entity.
    pub fn entity_conflicts(&self, entity_type: &str, id: &str) -> Result<Vec<ConflictRecord>> {
        let entity_type = EntityType::parse(entity_type)?;
        let entity = self.repository.get(entity_type, id)?;
        self.assessor(true).conflicts(&entity, entity_type)
    }

    /// Full assessment of one stored entity.
    pub fn assess_entity(&self, entity_type: &str, id: &str) -> Result<EntityAssessment> {
        let entity_type = EntityType::parse(entity_type)?;
        let entity = self.repository.get(entity_type, id)?;
        self.assessor(true).assess(&entity, entity_type)
    }

    /// Signal that the underlying data changed: every registered cache is cleared.
    pub fn notify_data_changed(&self) -> Result<()> {
        let count = self.registry.invalidate_all()?;
        info!(invalidators = count, "data changed, caches invalidated");
        Ok(())
    }
}

impl std::fmt::Debug for Concordance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Concordance")
            .field("config", &self.config)
            .field("caches", &self.caches)
            .field("analyzer", &self.analyzer.as_ref().map(|a| a.name()))
            .finish()
    }
}
