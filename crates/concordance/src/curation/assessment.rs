//! Per-entity scoring shared by the review queue and edit previews.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{cache_key, ResultCache};
use crate::conflict::{analyze_entity, ConflictRecord};
use crate::entity::{Entity, EntityType};
use crate::error::Result;
use crate::scoring::{
    priority_breakdown, CompletenessReport, PriorityBreakdown, PriorityInputs, UncertaintyBasis,
    UncertaintyEstimate, UncertaintyEstimator,
};

/// Everything the engine knows about one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAssessment {
    pub completeness: CompletenessReport,
    pub conflicts: Vec<ConflictRecord>,
    pub uncertainty: UncertaintyEstimate,
    pub priority: PriorityBreakdown,
}

/// Metrics bundle reported with each queue item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityMetrics {
    pub completeness_score: f64,
    pub gap_count: usize,
    pub conflict_density: usize,
    pub high_severity_count: usize,
    pub uncertainty: f64,
    pub uncertainty_basis: UncertaintyBasis,
}

impl EntityAssessment {
    /// Number of divergent fields.
    pub fn conflict_density(&self) -> usize {
        self.conflicts.len()
    }

    /// Number of divergent fields rated high or critical.
    pub fn high_severity_count(&self) -> usize {
        self.conflicts.iter().filter(|c| c.severity.is_high()).count()
    }

    pub fn priority_score(&self) -> f64 {
        self.priority.score
    }

    pub fn metrics(&self) -> PriorityMetrics {
        PriorityMetrics {
            completeness_score: self.completeness.score,
            gap_count: self.completeness.gap_count(),
            conflict_density: self.conflict_density(),
            high_severity_count: self.high_severity_count(),
            uncertainty: self.uncertainty.value,
            uncertainty_basis: self.uncertainty.basis,
        }
    }
}

/// Runs comparison, classification, completeness, uncertainty, and priority
/// for one entity at a time.
#[derive(Debug, Clone)]
pub struct Assessor {
    estimator: UncertaintyEstimator,
    conflict_cache: Option<Arc<ResultCache>>,
}

impl Assessor {
    pub fn new(estimator: UncertaintyEstimator) -> Self {
        Self {
            estimator,
            conflict_cache: None,
        }
    }

    /// Memoize conflict analyses by entity content.
    pub fn with_conflict_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.conflict_cache = Some(cache);
        self
    }

    /// Identity of the scoring configuration; `None` when uncertainty is structural.
    pub fn fingerprint(&self) -> Option<String> {
        self.estimator.fingerprint()
    }

    /// Conflict records for an entity, from cache when its content is unchanged.
    pub fn conflicts(&self, entity: &Entity, entity_type: EntityType) -> Result<Vec<ConflictRecord>> {
        let Some(cache) = &self.conflict_cache else {
            return Ok(analyze_entity(entity, entity_type));
        };

        let key = cache_key(&(entity_type, entity))?;
        if let Some(records) = cache.get_as::<Vec<ConflictRecord>>(&key) {
            return Ok(records);
        }

        let records = analyze_entity(entity, entity_type);
        cache.set_as(&key, &records, None)?;
        debug!(entity = %entity.id, conflicts = records.len(), "analyzed conflicts");
        Ok(records)
    }

    /// Score one entity.
    pub fn assess(&self, entity: &Entity, entity_type: EntityType) -> Result<EntityAssessment> {
        let completeness = CompletenessReport::assess(entity, entity_type);
        let conflicts = self.conflicts(entity, entity_type)?;
        let density = conflicts.len();
        let uncertainty = self.estimator.estimate(entity, density)?;

        let high_severity_count = conflicts.iter().filter(|c| c.severity.is_high()).count();
        let priority = priority_breakdown(&PriorityInputs {
            completeness_score: completeness.score,
            conflict_density: density,
            uncertainty: uncertainty.value,
            high_severity_count,
        });

        Ok(EntityAssessment {
            completeness,
            conflicts,
            uncertainty,
            priority,
        })
    }
}
