//! Category and severity classification of divergent fields.
//!
//! Both classifiers are total: every field name resolves to exactly one
//! category and one severity. The keyword tables are plain data, tested in
//! order, so the rule set can be inspected and extended without touching
//! control flow.

use serde::{Deserialize, Serialize};

/// Topical domain of a disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictCategory {
    /// Dates, order of events, timing.
    Chronological,
    /// Places, routes, settings.
    Geographical,
    /// Doctrinal claims.
    Theological,
    /// Counts and quantities.
    Numerical,
    /// Kinship, discipleship, alliances.
    Relational,
    /// Wording of the account itself.
    Narrative,
    /// Anything the keyword tables do not cover.
    Other,
}

impl ConflictCategory {
    /// Every category, in rule order with the fallback last.
    pub const ALL: [ConflictCategory; 7] = [
        ConflictCategory::Chronological,
        ConflictCategory::Geographical,
        ConflictCategory::Theological,
        ConflictCategory::Numerical,
        ConflictCategory::Relational,
        ConflictCategory::Narrative,
        ConflictCategory::Other,
    ];

    /// Lowercase name used in rationales and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictCategory::Chronological => "chronological",
            ConflictCategory::Geographical => "geographical",
            ConflictCategory::Theological => "theological",
            ConflictCategory::Numerical => "numerical",
            ConflictCategory::Relational => "relational",
            ConflictCategory::Narrative => "narrative",
            ConflictCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for ConflictCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal importance of a disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// High or critical.
    pub fn is_high(&self) -> bool {
        *self >= Severity::High
    }
}

/// Category keyword buckets, tested top to bottom. First match wins.
pub const CATEGORY_RULES: &[(ConflictCategory, &[&str])] = &[
    (
        ConflictCategory::Chronological,
        &[
            "chronolog", "timeline", "sequence", "timing", "date", "year", "day", "hour",
            "time", "when", "period",
        ],
    ),
    (
        ConflictCategory::Geographical,
        &[
            "location", "place", "city", "region", "route", "geograph", "site", "where",
            "journey", "destination", "residence", "home",
        ],
    ),
    (
        ConflictCategory::Theological,
        &[
            "theolog", "divin", "messian", "resurrect", "christolog", "salvation", "prophe",
            "miracle", "spirit", "empty_tomb", "conversion", "faith", "worship", "covenant",
        ],
    ),
    (
        ConflictCategory::Numerical,
        &[
            "_count", "count_", "number", "num_", "amount", "quantity", "total", "how_many",
            "population",
        ],
    ),
    (
        ConflictCategory::Relational,
        &[
            "parent", "father", "mother", "sibling", "brother", "sister", "spouse", "wife",
            "husband", "child", "son_of", "family", "lineage", "genealog", "relationship",
            "disciple", "apostle", "mentor", "companion",
        ],
    ),
    (
        ConflictCategory::Narrative,
        &[
            "summary", "account", "narrative", "story", "speech", "dialogue", "saying",
            "outcome", "trial", "death", "cause", "description", "role", "motive", "reaction",
            "witness",
        ],
    ),
];

/// Severity keyword buckets. Critical is checked before High.
pub const SEVERITY_RULES: &[(Severity, &[&str])] = &[
    (
        Severity::Critical,
        &["resurrection", "divinity", "messianic_status", "death_cause", "empty_tomb"],
    ),
    (
        Severity::High,
        &["birthplace", "parentage", "apostleship", "conversion", "trial_outcome"],
    ),
];

/// Map a field name to its topical category.
pub fn classify_category(field_name: &str) -> ConflictCategory {
    let field = field_name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| field.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(ConflictCategory::Other)
}

/// Stage one: keyword lookup. `None` when no severity keyword matches.
pub fn keyword_severity(field_name: &str) -> Option<Severity> {
    let field = field_name.to_lowercase();
    SEVERITY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| field.contains(k)))
        .map(|(severity, _)| *severity)
}

/// Stage two: severity from how many sources attest how many distinct values.
pub fn structural_severity(source_count: usize, distinct_count: usize) -> Severity {
    if source_count >= 4 && distinct_count >= 3 {
        Severity::High
    } else if source_count >= 3 && distinct_count == 2 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Keyword rules first; structural heuristics only when no keyword matches.
pub fn assess_severity(field_name: &str, source_count: usize, distinct_count: usize) -> Severity {
    keyword_severity(field_name)
        .unwrap_or_else(|| structural_severity(source_count, distinct_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_examples() {
        assert_eq!(classify_category("location"), ConflictCategory::Geographical);
        assert_eq!(classify_category("Crucifixion_Date"), ConflictCategory::Chronological);
        assert_eq!(classify_category("resurrection_body"), ConflictCategory::Theological);
        assert_eq!(classify_category("crowd_count"), ConflictCategory::Numerical);
        assert_eq!(classify_category("parentage"), ConflictCategory::Relational);
        assert_eq!(classify_category("trial_outcome"), ConflictCategory::Narrative);
        assert_eq!(classify_category("color_of_robe"), ConflictCategory::Other);
        assert_eq!(classify_category(""), ConflictCategory::Other);
    }

    #[test]
    fn test_category_rule_order_decides_overlaps() {
        // "birthplace" hits geographical before anything else.
        assert_eq!(classify_category("birthplace"), ConflictCategory::Geographical);
        // "timeline_of_apostleship" is chronological, not relational.
        assert_eq!(classify_category("timeline_of_apostleship"), ConflictCategory::Chronological);
    }

    #[test]
    fn test_rule_table_covers_every_named_category_once() {
        let named: Vec<_> = CATEGORY_RULES.iter().map(|(c, _)| *c).collect();
        assert_eq!(named.as_slice(), &ConflictCategory::ALL[..6]);
    }

    #[test]
    fn test_keyword_severity_short_circuits() {
        assert_eq!(assess_severity("resurrection_body", 0, 0), Severity::Critical);
        assert_eq!(assess_severity("resurrection_body", 10, 10), Severity::Critical);
        assert_eq!(assess_severity("Messianic_Status", 2, 2), Severity::Critical);
        assert_eq!(assess_severity("birthplace", 2, 2), Severity::High);
        assert_eq!(assess_severity("trial_outcome", 1, 1), Severity::High);
    }

    #[test]
    fn test_structural_fallback() {
        assert_eq!(assess_severity("color_of_robe", 4, 3), Severity::High);
        assert_eq!(assess_severity("color_of_robe", 3, 2), Severity::Medium);
        assert_eq!(assess_severity("color_of_robe", 2, 2), Severity::Low);
        assert_eq!(assess_severity("color_of_robe", 4, 2), Severity::Medium);
        assert_eq!(assess_severity("color_of_robe", 3, 3), Severity::Low);
    }

    #[test]
    fn test_stages_are_independent() {
        assert_eq!(keyword_severity("color_of_robe"), None);
        assert_eq!(keyword_severity("death_cause_detail"), Some(Severity::Critical));
        assert_eq!(structural_severity(5, 4), Severity::High);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
        assert!(Severity::Critical.is_high());
        assert!(!Severity::Medium.is_high());
    }

    #[test]
    fn test_severity_as_str_matches_serde() {
        for severity in [Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
            let encoded = serde_json::to_string(&severity).unwrap();
            assert_eq!(encoded, format!("\"{}\"", severity.as_str()));
            assert_eq!(severity.as_str(), severity.label().to_lowercase());
        }
    }
}
