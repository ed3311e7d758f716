//! Field-level comparison of source attestations.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entity::{render_value, Entity, EntityRepository, EntityType};
use crate::error::Result;

/// A field on which at least two sources disagree.
///
/// Only constructed through `FieldDivergence::new`, which refuses maps with
/// fewer than two distinct non-empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDivergence {
    /// Field name as written by the sources.
    pub field: String,
    /// Source id to rendered value, in discovery order.
    pub values_by_source: IndexMap<String, String>,
}

impl FieldDivergence {
    /// Build a divergence, or `None` if the sources agree.
    pub fn new(field: impl Into<String>, values_by_source: IndexMap<String, String>) -> Option<Self> {
        if distinct_values(&values_by_source).len() < 2 {
            return None;
        }
        Some(Self {
            field: field.into(),
            values_by_source,
        })
    }

    /// Sorted distinct values.
    pub fn distinct_values(&self) -> Vec<String> {
        distinct_values(&self.values_by_source)
    }

    /// Number of sources attesting a value.
    pub fn source_count(&self) -> usize {
        self.values_by_source.len()
    }
}

/// Sorted distinct non-blank values of a source map.
pub fn distinct_values(values_by_source: &IndexMap<String, String>) -> Vec<String> {
    values_by_source
        .values()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Builds per-field source maps for one entity and flags divergent fields.
pub struct FieldComparator;

impl FieldComparator {
    /// Field -> {source: value} over every attestation's traits.
    ///
    /// Blank values are skipped. Fields and sources keep discovery order; if a
    /// source attests the same field twice, its first value is kept.
    pub fn field_map(entity: &Entity) -> IndexMap<String, IndexMap<String, String>> {
        let mut fields: IndexMap<String, IndexMap<String, String>> = IndexMap::new();

        for source in &entity.sources {
            for (field, value) in &source.traits {
                let Some(rendered) = render_value(value) else {
                    continue;
                };
                fields
                    .entry(field.clone())
                    .or_default()
                    .entry(source.source_id.clone())
                    .or_insert(rendered);
            }
        }

        fields
    }

    /// Fields whose distinct non-empty value set has more than one member.
    pub fn divergences(entity: &Entity) -> Vec<FieldDivergence> {
        Self::field_map(entity)
            .into_iter()
            .filter_map(|(field, values)| FieldDivergence::new(field, values))
            .collect()
    }

    /// Look the entity up and compare it. Not-found propagates unchanged.
    pub fn divergences_for(
        repository: &dyn EntityRepository,
        entity_type: EntityType,
        id: &str,
    ) -> Result<Vec<FieldDivergence>> {
        let entity = repository.get(entity_type, id)?;
        Ok(Self::divergences(&entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{InMemoryRepository, SourceAttestation};
    use crate::error::ConcordanceError;
    use serde_json::json;

    fn tomb_event() -> Entity {
        Entity::new("empty_tomb", "The Empty Tomb")
            .with_source(
                SourceAttestation::new("mark")
                    .with_trait("location", "at the tomb")
                    .with_trait("visitors", json!(["Mary Magdalene", "Mary", "Salome"]))
                    .with_trait("messenger", "a young man"),
            )
            .with_source(
                SourceAttestation::new("luke")
                    .with_trait("location", "at the tomb")
                    .with_trait("messenger", "two men")
                    .with_trait("time_of_day", ""),
            )
            .with_source(
                SourceAttestation::new("john")
                    .with_trait("location", "in the garden")
                    .with_trait("messenger", json!(null)),
            )
    }

    #[test]
    fn test_field_map_skips_blank_values_and_keeps_order() {
        let map = FieldComparator::field_map(&tomb_event());

        let fields: Vec<_> = map.keys().cloned().collect();
        assert_eq!(fields, vec!["location", "visitors", "messenger"]);

        let location_sources: Vec<_> = map["location"].keys().cloned().collect();
        assert_eq!(location_sources, vec!["mark", "luke", "john"]);
        assert_eq!(map["messenger"].len(), 2);
        assert_eq!(map["visitors"]["mark"], "Mary Magdalene, Mary, Salome");
    }

    #[test]
    fn test_divergences_require_two_distinct_values() {
        let divergences = FieldComparator::divergences(&tomb_event());
        let fields: Vec<_> = divergences.iter().map(|d| d.field.as_str()).collect();

        // visitors has one source, so it cannot diverge.
        assert_eq!(fields, vec!["location", "messenger"]);
        assert_eq!(
            divergences[0].distinct_values(),
            vec!["at the tomb".to_string(), "in the garden".to_string()]
        );
        assert_eq!(divergences[0].source_count(), 3);
    }

    #[test]
    fn test_brace_text_values_still_diverge() {
        let entity = Entity::new("formula", "Formula")
            .with_source(SourceAttestation::new("mark").with_trait("formula", "{}"))
            .with_source(SourceAttestation::new("luke").with_trait("formula", "[]"));

        let divergences = FieldComparator::divergences(&entity);
        assert_eq!(divergences.len(), 1);
        assert_eq!(
            divergences[0].distinct_values(),
            vec!["[]".to_string(), "{}".to_string()]
        );
    }

    #[test]
    fn test_agreeing_sources_produce_no_divergence() {
        let mut values = IndexMap::new();
        values.insert("mark".to_string(), "Jerusalem".to_string());
        values.insert("luke".to_string(), " Jerusalem ".to_string());
        values.insert("john".to_string(), "".to_string());
        assert!(FieldDivergence::new("city", values).is_none());
    }

    #[test]
    fn test_divergences_for_propagates_not_found() {
        let repo = InMemoryRepository::new().with_event(tomb_event());
        assert_eq!(
            FieldComparator::divergences_for(&repo, EntityType::Event, "empty_tomb")
                .unwrap()
                .len(),
            2
        );
        assert!(matches!(
            FieldComparator::divergences_for(&repo, EntityType::Event, "missing"),
            Err(ConcordanceError::NotFound { .. })
        ));
    }
}
