//! Ranked curation review queue.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::{cache_key, ResultCache};
use crate::conflict::Severity;
use crate::entity::{Entity, EntityRepository, EntityType};
use crate::error::Result;
use crate::scoring::{PriorityBand, UncertaintyBasis};

use super::assessment::{Assessor, EntityAssessment, PriorityMetrics};

/// Uncertainty at or above this level is called out to the curator.
const HIGH_UNCERTAINTY: f64 = 0.4;

/// Gaps and fields named individually before summarizing the rest.
const MAX_NAMED: usize = 3;

/// One entity's place in the review queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityItem {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub name: String,
    /// Priority in [0,1]; higher means review sooner.
    pub priority_score: f64,
    pub band: PriorityBand,
    pub metrics: PriorityMetrics,
    /// Why the entity was flagged.
    pub drivers: Vec<String>,
    /// What to do next.
    pub recommended_actions: Vec<String>,
    /// Divergent fields, in discovery order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_fields: Vec<String>,
}

impl PriorityItem {
    /// Build an item from an assessment.
    pub fn from_assessment(entity: &Entity, entity_type: EntityType, assessment: &EntityAssessment) -> Self {
        let score = assessment.priority_score();
        Self {
            entity_id: entity.id.clone(),
            entity_type,
            name: entity.name.clone(),
            priority_score: score,
            band: PriorityBand::of(score),
            metrics: assessment.metrics(),
            drivers: drivers_for(assessment),
            recommended_actions: actions_for(assessment),
            conflicting_fields: assessment.conflicts.iter().map(|c| c.field.clone()).collect(),
        }
    }
}

/// Counts of items per priority band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Summary statistics over the returned items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSummary {
    pub item_count: usize,
    /// Mean priority score; 0 for an empty queue.
    pub mean_priority: f64,
    pub bands: BandCounts,
}

impl QueueSummary {
    pub fn from_items(items: &[PriorityItem]) -> Self {
        let mut bands = BandCounts::default();
        for item in items {
            match item.band {
                PriorityBand::Low => bands.low += 1,
                PriorityBand::Medium => bands.medium += 1,
                PriorityBand::High => bands.high += 1,
            }
        }

        let mean_priority = if items.is_empty() {
            0.0
        } else {
            items.iter().map(|i| i.priority_score).sum::<f64>() / items.len() as f64
        };

        Self {
            item_count: items.len(),
            mean_priority,
            bands,
        }
    }
}

/// A ranked worklist for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationQueue {
    pub entity_type: EntityType,
    /// Sorted by descending priority; ties keep repository order.
    pub items: Vec<PriorityItem>,
    pub summary: QueueSummary,
}

/// Scores every entity of a type, ranks, truncates, and summarizes.
#[derive(Clone)]
pub struct CurationQueueBuilder {
    repository: Arc<dyn EntityRepository>,
    assessor: Assessor,
    queue_cache: Option<Arc<ResultCache>>,
}

impl CurationQueueBuilder {
    pub fn new(repository: Arc<dyn EntityRepository>, assessor: Assessor) -> Self {
        Self {
            repository,
            assessor,
            queue_cache: None,
        }
    }

    /// Memoize whole queues by type, limit, scoring configuration and entity content.
    pub fn with_queue_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.queue_cache = Some(cache);
        self
    }

    /// Build the queue.
    ///
    /// The entity type is validated before anything else, including the cache.
    /// Entities are scored one at a time in repository order. A cached queue
    /// is only served for the same entities under the same scoring setup.
    pub fn build(&self, entity_type: &str, limit: Option<usize>, use_cache: bool) -> Result<CurationQueue> {
        let entity_type = EntityType::parse(entity_type)?;
        let entities = self.repository.list(entity_type)?;

        let cache = self.queue_cache.as_ref().filter(|_| use_cache);
        let key = match cache {
            Some(_) => Some(cache_key(&(entity_type, limit, self.assessor.fingerprint(), &entities))?),
            None => None,
        };
        if let (Some(cache), Some(key)) = (cache, key.as_deref()) {
            if let Some(queue) = cache.get_as::<CurationQueue>(key) {
                debug!(entity_type = %entity_type, "serving cached curation queue");
                return Ok(queue);
            }
        }

        let mut items = Vec::with_capacity(entities.len());
        for entity in &entities {
            let assessment = self.assessor.assess(entity, entity_type)?;
            items.push(PriorityItem::from_assessment(entity, entity_type, &assessment));
        }

        // Stable: equal scores keep repository order.
        items.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
        if let Some(limit) = limit {
            items.truncate(limit);
        }

        let summary = QueueSummary::from_items(&items);
        info!(
            entity_type = %entity_type,
            scored = entities.len(),
            returned = summary.item_count,
            mean_priority = summary.mean_priority,
            "built curation queue"
        );

        let queue = CurationQueue {
            entity_type,
            items,
            summary,
        };
        if let (Some(cache), Some(key)) = (cache, key.as_deref()) {
            cache.set_as(key, &queue, None)?;
        }
        Ok(queue)
    }
}

impl std::fmt::Debug for CurationQueueBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurationQueueBuilder")
            .field("assessor", &self.assessor)
            .field("queue_cache", &self.queue_cache)
            .finish()
    }
}

fn name_some(names: &[String]) -> String {
    let mut listed = names.iter().take(MAX_NAMED).cloned().collect::<Vec<_>>().join(", ");
    if names.len() > MAX_NAMED {
        listed.push_str(&format!(" and {} more", names.len() - MAX_NAMED));
    }
    listed
}

/// Why an entity was flagged, most pressing signal first.
fn drivers_for(assessment: &EntityAssessment) -> Vec<String> {
    let mut drivers = Vec::new();

    let gaps = assessment.completeness.gap_count();
    if gaps > 0 {
        drivers.push(format!(
            "{} expected field(s) missing (completeness {:.0}%)",
            gaps,
            assessment.completeness.score * 100.0
        ));
    }

    let density = assessment.conflict_density();
    if density > 0 {
        drivers.push(format!("{} field(s) disagree across sources", density));
    }

    let serious: Vec<String> = assessment
        .conflicts
        .iter()
        .filter(|c| c.severity.is_high())
        .map(|c| format!("{} ({})", c.field, c.severity.as_str()))
        .collect();
    if !serious.is_empty() {
        drivers.push(format!("High-severity conflicts: {}", name_some(&serious)));
    }

    if assessment.uncertainty.value >= HIGH_UNCERTAINTY {
        drivers.push(format!(
            "High interpretive uncertainty ({:.2})",
            assessment.uncertainty.value
        ));
    }

    if density > 0 && assessment.uncertainty.basis == UncertaintyBasis::Structural {
        drivers.push("Uncertainty estimated from conflict density only".to_string());
    }

    drivers
}

/// What the curator should do next.
fn actions_for(assessment: &EntityAssessment) -> Vec<String> {
    let mut actions = Vec::new();

    if !assessment.completeness.gaps.is_empty() {
        actions.push(format!(
            "Fill missing data: {}",
            name_some(&assessment.completeness.gaps)
        ));
    }

    for conflict in &assessment.conflicts {
        match conflict.severity {
            Severity::Critical => actions.push(format!(
                "Record each source's position on '{}' verbatim with passage references",
                conflict.field
            )),
            Severity::High => actions.push(format!(
                "Document the divergence on '{}' ({} values across {} sources)",
                conflict.field, conflict.distinct_count, conflict.source_count
            )),
            Severity::Medium | Severity::Low => {}
        }
    }

    let minor: Vec<String> = assessment
        .conflicts
        .iter()
        .filter(|c| !c.severity.is_high())
        .map(|c| c.field.clone())
        .collect();
    if !minor.is_empty() {
        actions.push(format!("Note minor variants in: {}", name_some(&minor)));
    }

    if assessment.uncertainty.value >= HIGH_UNCERTAINTY {
        actions.push("Add interpretive notes explaining how the accounts relate".to_string());
    }

    if actions.is_empty() {
        actions.push("Spot-check only; no gaps or conflicts detected".to_string());
    }

    actions
}
