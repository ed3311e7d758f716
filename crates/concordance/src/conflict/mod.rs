//! Conflict detection and classification.
//!
//! `FieldComparator` finds fields on which sources disagree; the classifier
//! assigns each a category and severity; `analyze_conflict` turns a divergent
//! field into an enriched `ConflictRecord`.
//!
//! # Example
//!
//! ```
//! use concordance::conflict::{analyze_conflict, ConflictCategory, Severity};
//! use concordance::EntityType;
//! use indexmap::IndexMap;
//!
//! let mut values = IndexMap::new();
//! values.insert("mark".to_string(), "at the tomb".to_string());
//! values.insert("luke".to_string(), "at the tomb".to_string());
//! values.insert("john".to_string(), "in the garden".to_string());
//!
//! let record = analyze_conflict("location", &values, EntityType::Event);
//! assert_eq!(record.category, ConflictCategory::Geographical);
//! assert_eq!(record.severity, Severity::Medium);
//! ```

mod classifier;
mod comparator;
mod summarizer;

pub use classifier::{
    assess_severity, classify_category, keyword_severity, structural_severity, ConflictCategory,
    Severity, CATEGORY_RULES, SEVERITY_RULES,
};
pub use comparator::{distinct_values, FieldComparator, FieldDivergence};
pub use summarizer::{analyze_conflict, analyze_entity, ConflictRecord, IMPLICATION_RULES};
