//! Completeness of an entity record.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityType};

/// Top-level fields every character is expected to carry.
pub const CHARACTER_FIELDS: &[&str] = &["summary", "tags", "roles", "relationships"];

/// Top-level fields every event is expected to carry.
pub const EVENT_FIELDS: &[&str] = &["summary", "tags", "participants", "location", "time"];

/// Minimum number of attesting sources for a record to be comparable.
pub const MIN_SOURCES: usize = 2;

/// How much of the expected data an entity has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Satisfied checks over total checks, in [0,1].
    pub score: f64,
    /// Number of satisfied checks.
    pub satisfied: usize,
    /// Number of checks performed.
    pub total: usize,
    /// Labels of failed checks, in check order.
    pub gaps: Vec<String>,
}

impl CompletenessReport {
    /// Run the completeness checks for an entity.
    ///
    /// Checks, in order: expected top-level fields for the type, at least
    /// `MIN_SOURCES` sources, then a summary and at least one reference for
    /// every source attestation.
    pub fn assess(entity: &Entity, entity_type: EntityType) -> Self {
        let expected = match entity_type {
            EntityType::Character => CHARACTER_FIELDS,
            EntityType::Event => EVENT_FIELDS,
        };

        let mut checks: Vec<(String, bool)> = expected
            .iter()
            .map(|field| (field.to_string(), has_field(entity, field)))
            .collect();

        checks.push((
            format!("sources (at least {})", MIN_SOURCES),
            entity.sources.len() >= MIN_SOURCES,
        ));

        for source in &entity.sources {
            let has_summary = source
                .summary
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty());
            let has_references = source.references.iter().any(|r| !r.trim().is_empty());
            checks.push((format!("source:{}:summary", source.source_id), has_summary));
            checks.push((format!("source:{}:references", source.source_id), has_references));
        }

        let total = checks.len();
        let satisfied = checks.iter().filter(|(_, ok)| *ok).count();
        let gaps = checks
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(label, _)| label)
            .collect();

        let score = if total == 0 {
            1.0
        } else {
            satisfied as f64 / total as f64
        };

        Self {
            score,
            satisfied,
            total,
            gaps,
        }
    }

    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }
}

fn has_field(entity: &Entity, field: &str) -> bool {
    match field {
        "summary" => entity
            .summary
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty()),
        "tags" => entity.tags.iter().any(|t| !t.trim().is_empty()),
        other => entity.has_attribute(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SourceAttestation;
    use serde_json::json;

    #[test]
    fn test_complete_character() {
        let entity = Entity::new("peter", "Peter")
            .with_summary("Fisherman turned apostle.")
            .with_tag("apostle")
            .with_attribute("roles", json!(["apostle"]))
            .with_attribute("relationships", json!({"andrew": "brother"}))
            .with_source(
                SourceAttestation::new("mark")
                    .with_summary("Called at the sea.")
                    .with_reference("Mark 1:16"),
            )
            .with_source(
                SourceAttestation::new("john")
                    .with_summary("Introduced by Andrew.")
                    .with_reference("John 1:40-42"),
            );

        let report = CompletenessReport::assess(&entity, EntityType::Character);
        assert_eq!(report.score, 1.0);
        assert_eq!(report.total, 9);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_gaps_are_labelled() {
        let entity = Entity::new("tomb", "Empty Tomb")
            .with_attribute("location", "Jerusalem")
            .with_attribute("participants", json!([]))
            .with_source(SourceAttestation::new("mark").with_reference("Mark 16:1-8"));

        let report = CompletenessReport::assess(&entity, EntityType::Event);
        assert_eq!(
            report.gaps,
            vec![
                "summary",
                "tags",
                "participants",
                "time",
                "sources (at least 2)",
                "source:mark:summary",
            ]
        );
        assert_eq!(report.total, 8);
        assert_eq!(report.satisfied, 2);
        assert!((report.score - 0.25).abs() < 1e-9);
        assert_eq!(report.gap_count(), 6);
    }

    #[test]
    fn test_empty_character_scores_zero() {
        let report = CompletenessReport::assess(&Entity::new("x", "X"), EntityType::Character);
        assert_eq!(report.total, 5);
        assert_eq!(report.score, 0.0);
    }
}
