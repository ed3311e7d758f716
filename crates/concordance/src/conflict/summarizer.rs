//! Enriched conflict records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityType};

use super::classifier::{assess_severity, classify_category, ConflictCategory, Severity};
use super::comparator::{distinct_values, FieldComparator};

/// A divergent field with its classification and commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Field name.
    pub field: String,
    /// Type of the entity the field belongs to.
    pub entity_type: EntityType,
    /// Topical domain.
    pub category: ConflictCategory,
    /// Ordinal importance.
    pub severity: Severity,
    /// Source id to value, as supplied.
    pub sources: IndexMap<String, String>,
    /// Sorted distinct non-blank values.
    pub distinct_values: Vec<String>,
    /// Sources attesting a non-blank value.
    pub source_count: usize,
    /// Number of distinct values.
    pub distinct_count: usize,
    /// Counting note.
    pub notes: String,
    /// Why the field was flagged.
    pub rationale: String,
    /// Scholarly implications triggered by the field name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implications: Vec<String>,
}

/// Implication keyword triggers, tested against the lowercase field name.
/// Every matching rule contributes its implication once, in table order.
pub const IMPLICATION_RULES: &[(&[&str], &str)] = &[
    (
        &["timeline", "sequence", "chronolog"],
        "Ordering differences may reflect independent oral-transmission variants of the tradition.",
    ),
    (
        &["divine", "divinity", "messianic", "resurrection"],
        "Divergent wording may reflect editorial (redactional) shaping of theological claims.",
    ),
    (
        &["location", "place", "route"],
        "Geographic variation may reflect the regional communities that preserved each account.",
    ),
    (
        &["parent", "lineage", "genealog"],
        "Genealogical differences may stem from distinct lineage traditions rather than error.",
    ),
    (
        &["count", "number"],
        "Numeric differences may be rounding or symbolic rather than factual disagreement.",
    ),
];

fn implications_for(field: &str) -> Vec<String> {
    let field = field.to_lowercase();
    IMPLICATION_RULES
        .iter()
        .filter(|(triggers, _)| triggers.iter().any(|t| field.contains(t)))
        .map(|(_, implication)| implication.to_string())
        .collect()
}

fn rationale_for(field: &str, category: ConflictCategory, severity: Severity) -> String {
    let mut rationale = format!(
        "Disagreement in {} domain regarding {}.",
        category.as_str(),
        field
    );
    if severity == Severity::Critical {
        rationale.push_str(
            " This field carries doctrinal emphasis, so each source's position shapes interpretation.",
        );
    }
    rationale
}

/// Classify and annotate one divergent field.
///
/// Pure: the same inputs always produce the same record.
pub fn analyze_conflict(
    field: &str,
    values_by_source: &IndexMap<String, String>,
    entity_type: EntityType,
) -> ConflictRecord {
    let distinct = distinct_values(values_by_source);
    let source_count = values_by_source
        .values()
        .filter(|v| !v.trim().is_empty())
        .count();
    let distinct_count = distinct.len();

    let category = classify_category(field);
    let severity = assess_severity(field, source_count, distinct_count);

    ConflictRecord {
        field: field.to_string(),
        entity_type,
        category,
        severity,
        sources: values_by_source.clone(),
        distinct_values: distinct,
        source_count,
        distinct_count,
        notes: format!(
            "{} source(s) attest {} distinct value(s).",
            source_count, distinct_count
        ),
        rationale: rationale_for(field, category, severity),
        implications: implications_for(field),
    }
}

/// Conflict records for every divergent field of an entity, in discovery order.
pub fn analyze_entity(entity: &Entity, entity_type: EntityType) -> Vec<ConflictRecord> {
    FieldComparator::divergences(entity)
        .iter()
        .map(|d| analyze_conflict(&d.field, &d.values_by_source, entity_type))
        .collect()
}
