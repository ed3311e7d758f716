//! Fuzz target for conflict classification.
//!
//! This fuzzer tests that classification:
//! 1. Never panics on any field name or count
//! 2. Always resolves to exactly one category and severity
//! 3. Never lets the structural stage lower a keyword severity

#![no_main]

use arbitrary::Arbitrary;
use concordance::conflict::{assess_severity, classify_category, keyword_severity, ConflictCategory};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    field: String,
    source_count: usize,
    distinct_count: usize,
}

fuzz_target!(|input: Input| {
    let category = classify_category(&input.field);
    assert!(ConflictCategory::ALL.contains(&category));
    assert_eq!(category, classify_category(&input.field));

    let severity = assess_severity(&input.field, input.source_count, input.distinct_count);
    if let Some(keyword) = keyword_severity(&input.field) {
        assert_eq!(severity, keyword);
    }
});
