//! Previewing the effect of a raw-data edit on curation metrics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cache::{cache_key, ResultCache};
use crate::entity::{Entity, EntityType};
use crate::error::Result;
use crate::scoring::UncertaintyEstimator;

use super::assessment::{Assessor, EntityAssessment};

/// Float deltas smaller than this count as no change.
const EPSILON: f64 = 1e-9;

/// Single narrative line when nothing moved.
pub const NO_MATERIAL_CHANGE: &str = "No material change to curation metrics.";

/// Curation metrics of one version of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetrics {
    pub completeness_score: f64,
    pub gap_count: usize,
    pub conflict_density: usize,
    pub high_severity_count: usize,
    pub uncertainty: f64,
    pub priority_score: f64,
}

impl From<&EntityAssessment> for EntityMetrics {
    fn from(assessment: &EntityAssessment) -> Self {
        Self {
            completeness_score: assessment.completeness.score,
            gap_count: assessment.completeness.gap_count(),
            conflict_density: assessment.conflict_density(),
            high_severity_count: assessment.high_severity_count(),
            uncertainty: assessment.uncertainty.value,
            priority_score: assessment.priority_score(),
        }
    }
}

/// `after - before` for every metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDeltas {
    pub completeness_score: f64,
    pub gap_count: i64,
    pub conflict_density: i64,
    pub high_severity_count: i64,
    pub uncertainty: f64,
    pub priority_score: f64,
}

impl MetricDeltas {
    pub fn between(before: &EntityMetrics, after: &EntityMetrics) -> Self {
        Self {
            completeness_score: after.completeness_score - before.completeness_score,
            gap_count: after.gap_count as i64 - before.gap_count as i64,
            conflict_density: after.conflict_density as i64 - before.conflict_density as i64,
            high_severity_count: after.high_severity_count as i64
                - before.high_severity_count as i64,
            uncertainty: after.uncertainty - before.uncertainty,
            priority_score: after.priority_score - before.priority_score,
        }
    }

    /// True when every delta is zero.
    pub fn is_zero(&self) -> bool {
        self.completeness_score.abs() < EPSILON
            && self.gap_count == 0
            && self.conflict_density == 0
            && self.high_severity_count == 0
            && self.uncertainty.abs() < EPSILON
            && self.priority_score.abs() < EPSILON
    }
}

/// Before/after metrics of an edit with a plain-language description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditImpact {
    pub entity_type: EntityType,
    pub before_metrics: EntityMetrics,
    pub after_metrics: EntityMetrics,
    pub deltas: MetricDeltas,
    pub narrative_lines: Vec<String>,
}

/// Computes edit previews. Uncertainty always uses the structural fallback
/// so previews never wait on a semantic analyzer.
#[derive(Debug, Clone)]
pub struct ImpactPreviewer {
    assessor: Assessor,
    cache: Option<Arc<ResultCache>>,
}

impl Default for ImpactPreviewer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImpactPreviewer {
    pub fn new() -> Self {
        Self {
            assessor: Assessor::new(UncertaintyEstimator::structural()),
            cache: None,
        }
    }

    /// Memoize previews by (before, after, entity type).
    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Describe how replacing `before` with `after` changes the entity's metrics.
    ///
    /// Both payloads must be JSON objects that deserialize as an entity and
    /// the entity type must be known; otherwise a validation error is
    /// returned before the cache is consulted.
    pub fn describe(&self, before: &Value, after: &Value, entity_type: &str) -> Result<EditImpact> {
        let entity_type = EntityType::parse(entity_type)?;
        let before_entity = Entity::from_json(before)?;
        let after_entity = Entity::from_json(after)?;

        let key = match &self.cache {
            Some(cache) => {
                let key = cache_key(&(before, after, entity_type))?;
                if let Some(hit) = cache.get_as::<EditImpact>(&key) {
                    debug!(entity = %after_entity.id, "serving cached edit impact");
                    return Ok(hit);
                }
                Some(key)
            }
            None => None,
        };

        let before_metrics = EntityMetrics::from(&self.assessor.assess(&before_entity, entity_type)?);
        let after_metrics = EntityMetrics::from(&self.assessor.assess(&after_entity, entity_type)?);
        let deltas = MetricDeltas::between(&before_metrics, &after_metrics);
        let narrative_lines = narrate(&before_metrics, &after_metrics, &deltas);

        let impact = EditImpact {
            entity_type,
            before_metrics,
            after_metrics,
            deltas,
            narrative_lines,
        };
        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.set_as(&key, &impact, None)?;
        }
        Ok(impact)
    }
}

/// Uncached preview of a raw-data edit.
pub fn describe_json_edit_impact(before: &Value, after: &Value, entity_type: &str) -> Result<EditImpact> {
    ImpactPreviewer::new().describe(before, after, entity_type)
}

fn direction(delta: f64, up: &'static str, down: &'static str) -> &'static str {
    if delta > 0.0 { up } else { down }
}

fn narrate(before: &EntityMetrics, after: &EntityMetrics, deltas: &MetricDeltas) -> Vec<String> {
    if deltas.is_zero() {
        return vec![NO_MATERIAL_CHANGE.to_string()];
    }

    let mut lines = Vec::new();

    if deltas.completeness_score.abs() >= EPSILON {
        lines.push(format!(
            "Completeness {} from {:.0}% to {:.0}%.",
            direction(deltas.completeness_score, "improves", "worsens"),
            before.completeness_score * 100.0,
            after.completeness_score * 100.0
        ));
    }
    if deltas.gap_count != 0 {
        lines.push(format!(
            "Missing fields {} from {} to {}.",
            direction(deltas.gap_count as f64, "rise", "fall"),
            before.gap_count,
            after.gap_count
        ));
    }
    if deltas.conflict_density != 0 {
        lines.push(format!(
            "Conflicting fields {} from {} to {}.",
            direction(deltas.conflict_density as f64, "rise", "fall"),
            before.conflict_density,
            after.conflict_density
        ));
    }
    if deltas.high_severity_count != 0 {
        lines.push(format!(
            "High-severity conflicts {} from {} to {}.",
            direction(deltas.high_severity_count as f64, "rise", "fall"),
            before.high_severity_count,
            after.high_severity_count
        ));
    }
    if deltas.uncertainty.abs() >= EPSILON {
        lines.push(format!(
            "Uncertainty {} from {:.2} to {:.2}.",
            direction(deltas.uncertainty, "rises", "falls"),
            before.uncertainty,
            after.uncertainty
        ));
    }
    if deltas.priority_score.abs() >= EPSILON {
        lines.push(format!(
            "Review priority {} from {:.2} to {:.2}.",
            direction(deltas.priority_score, "rises", "falls"),
            before.priority_score,
            after.priority_score
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::error::ConcordanceError;
    use serde_json::json;

    fn sparse() -> Value {
        json!({
            "id": "peter",
            "name": "Peter",
            "sources": [
                {"source_id": "mark", "traits": {"birthplace": "Capernaum"}},
                {"source_id": "john", "traits": {"birthplace": "Bethsaida"}}
            ]
        })
    }

    fn enriched() -> Value {
        json!({
            "id": "peter",
            "name": "Peter",
            "summary": "Fisherman and apostle.",
            "tags": ["apostle"],
            "sources": [
                {"source_id": "mark", "traits": {"birthplace": "Bethsaida"}},
                {"source_id": "john", "traits": {"birthplace": "Bethsaida"}}
            ]
        })
    }

    #[test]
    fn test_identical_payloads_have_no_impact() {
        let impact = describe_json_edit_impact(&sparse(), &sparse(), "character").unwrap();
        assert!(impact.deltas.is_zero());
        assert_eq!(impact.deltas, MetricDeltas::default());
        assert_eq!(impact.narrative_lines, vec![NO_MATERIAL_CHANGE]);
        assert_eq!(impact.before_metrics, impact.after_metrics);
    }

    #[test]
    fn test_enrichment_improves_metrics() {
        let impact = describe_json_edit_impact(&sparse(), &enriched(), "character").unwrap();

        assert_eq!(impact.deltas.gap_count, -2);
        assert_eq!(impact.deltas.conflict_density, -1);
        assert_eq!(impact.deltas.high_severity_count, -1);
        assert!(impact.deltas.completeness_score > 0.0);
        assert!(impact.deltas.priority_score < 0.0);

        let text = impact.narrative_lines.join("\n");
        assert!(text.contains("Completeness improves"));
        assert!(text.contains("Conflicting fields fall from 1 to 0."));
        assert!(text.contains("Review priority falls"));
    }

    #[test]
    fn test_reverse_edit_worsens() {
        let impact = describe_json_edit_impact(&enriched(), &sparse(), "character").unwrap();
        let text = impact.narrative_lines.join("\n");
        assert!(text.contains("Completeness worsens"));
        assert!(text.contains("Uncertainty rises"));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            describe_json_edit_impact(&sparse(), &sparse(), "place"),
            Err(ConcordanceError::Validation(_))
        ));
        assert!(matches!(
            describe_json_edit_impact(&json!([1, 2]), &sparse(), "character"),
            Err(ConcordanceError::Validation(_))
        ));
        assert!(matches!(
            describe_json_edit_impact(&sparse(), &json!({"name": "no id"}), "character"),
            Err(ConcordanceError::Validation(_))
        ));
    }

    #[test]
    fn test_cache_key_ignores_payload_key_order() {
        let cache = Arc::new(ResultCache::new(CacheStore::new(), "json_edit_impact", 600));
        let previewer = ImpactPreviewer::new().with_cache(cache.clone());

        let a = json!({"id": "x", "name": "X", "tags": ["t"]});
        let b = json!({"tags": ["t"], "name": "X", "id": "x"});
        previewer.describe(&a, &a, "event").unwrap();
        previewer.describe(&b, &b, "event").unwrap();
        assert_eq!(cache.len(), 1);

        previewer.describe(&a, &a, "character").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalid_payload_never_touches_cache() {
        let cache = Arc::new(ResultCache::new(CacheStore::new(), "json_edit_impact", 600));
        let previewer = ImpactPreviewer::new().with_cache(cache.clone());
        assert!(previewer.describe(&json!("text"), &sparse(), "character").is_err());
        assert!(cache.is_empty());
    }
}
