//! Property-based tests for classification, scoring, and ranking.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p concordance --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p concordance --test property_tests
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use proptest::prelude::*;

use concordance::cache::{cache_key, canonical_json};
use concordance::conflict::{
    analyze_conflict, assess_severity, classify_category, keyword_severity, ConflictCategory,
    FieldDivergence, Severity, SEVERITY_RULES,
};
use concordance::{priority_score, Concordance, Entity, EntityType, InMemoryRepository, SourceAttestation};

// =============================================================================
// Test Strategies
// =============================================================================

/// Field names shaped like real record keys.
fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,12}(_[a-z]{1,10}){0,3}",
        "[A-Za-z0-9_ \\-]{0,40}",
        Just("resurrection_body".to_string()),
        Just("birthplace".to_string()),
        Just("color_of_robe".to_string()),
    ]
}

/// Short attested values drawn from a small pool so duplicates are common.
fn attested_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Bethlehem".to_string()),
        Just("Nazareth".to_string()),
        Just("Capernaum".to_string()),
        Just("".to_string()),
        "[a-z ]{1,12}",
    ]
}

/// A character with up to five sources and a handful of traits.
fn entity(id: String) -> impl Strategy<Value = Entity> {
    prop::collection::vec(
        prop::collection::vec(("(birthplace|location|nickname|timeline)", attested_value()), 0..4),
        0..5,
    )
    .prop_map(move |sources| {
        let mut entity = Entity::new(id.clone(), id.to_uppercase());
        for (i, traits) in sources.into_iter().enumerate() {
            let mut source = SourceAttestation::new(format!("source{}", i));
            for (field, value) in traits {
                source = source.with_trait(field, value);
            }
            entity = entity.with_source(source);
        }
        entity
    })
}

// =============================================================================
// Classifier Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_classification_is_total_and_idempotent(field in field_name()) {
        let first = classify_category(&field);
        prop_assert!(ConflictCategory::ALL.contains(&first));
        prop_assert_eq!(first, classify_category(&field));
        prop_assert_eq!(first, classify_category(&field.to_uppercase()));
    }

    #[test]
    fn prop_severity_keywords_short_circuit(
        suffix in "[a-z_]{0,10}",
        sources in 0usize..20,
        distinct in 0usize..20,
    ) {
        for (severity, keywords) in SEVERITY_RULES {
            for keyword in *keywords {
                let field = format!("{}{}", keyword, suffix);
                prop_assert!(keyword_severity(&field).is_some_and(|s| s >= *severity));
                prop_assert!(assess_severity(&field, sources, distinct) >= *severity);
            }
        }
        prop_assert_eq!(assess_severity("resurrection_body", sources, distinct), Severity::Critical);
    }

    #[test]
    fn prop_conflict_reported_iff_two_distinct_values(
        values in prop::collection::vec(attested_value(), 0..6),
    ) {
        let mut by_source = IndexMap::new();
        for (i, value) in values.iter().enumerate() {
            by_source.insert(format!("s{}", i), value.clone());
        }
        let record = analyze_conflict("location", &by_source, EntityType::Event);

        let mut distinct: Vec<String> = values
            .iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(&record.distinct_values, &distinct);
        prop_assert_eq!(record.distinct_count, distinct.len());
        prop_assert_eq!(
            FieldDivergence::new("location", by_source).is_some(),
            distinct.len() >= 2
        );
    }
}

// =============================================================================
// Scoring Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_priority_in_unit_interval(
        completeness in 0.0f64..=1.0,
        density in 0usize..1000,
        uncertainty in 0.0f64..=1.0,
        high in 0usize..1000,
    ) {
        let score = priority_score(completeness, density, uncertainty, high);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn prop_priority_tolerates_out_of_range_floats(
        completeness in prop::num::f64::ANY,
        uncertainty in prop::num::f64::ANY,
    ) {
        let score = priority_score(completeness, 3, uncertainty, 1);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn prop_more_completeness_never_raises_priority(
        low in 0.0f64..=1.0,
        bump in 0.0f64..=1.0,
        density in 0usize..10,
        uncertainty in 0.0f64..=1.0,
    ) {
        let high = (low + bump).min(1.0);
        prop_assert!(
            priority_score(high, density, uncertainty, 0) <= priority_score(low, density, uncertainty, 0)
        );
    }
}

// =============================================================================
// Queue and Cache Key Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_queue_is_sorted(entities in prop::collection::vec(
        (0u32..1000).prop_flat_map(|n| entity(format!("e{}", n))),
        0..12,
    )) {
        let mut repo = InMemoryRepository::new();
        for entity in entities {
            repo.insert(EntityType::Character, entity);
        }
        let engine = Concordance::new(Arc::new(repo));
        let queue = engine.build_curation_review_queue("character", None, false).unwrap();

        for pair in queue.items.windows(2) {
            prop_assert!(pair[0].priority_score >= pair[1].priority_score);
        }
        for item in &queue.items {
            prop_assert!((0.0..=1.0).contains(&item.priority_score));
        }
        prop_assert_eq!(queue.summary.item_count, queue.items.len());
    }

    #[test]
    fn prop_cache_key_ignores_object_key_order(
        pairs in prop::collection::btree_map("[a-z]{1,6}", 0i64..100, 0..8),
    ) {
        let forward: serde_json::Map<String, serde_json::Value> =
            pairs.iter().map(|(k, v)| (k.clone(), (*v).into())).collect();
        let reversed: serde_json::Map<String, serde_json::Value> =
            pairs.iter().rev().map(|(k, v)| (k.clone(), (*v).into())).collect();

        let forward = serde_json::Value::Object(forward);
        let reversed = serde_json::Value::Object(reversed);
        prop_assert_eq!(canonical_json(&forward), canonical_json(&reversed));
        prop_assert_eq!(cache_key(&forward).unwrap(), cache_key(&reversed).unwrap());
    }
}
