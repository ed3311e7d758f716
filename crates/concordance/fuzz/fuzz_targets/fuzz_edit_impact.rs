//! Fuzz target for edit impact previews.
//!
//! This fuzzer tests that raw edit payloads:
//! 1. Never panic the parser or scorer
//! 2. Either produce a preview or a validation error
//! 3. Produce zero deltas when before and after are identical

#![no_main]

use concordance::{describe_json_edit_impact, ConcordanceError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    for entity_type in ["character", "event"] {
        match describe_json_edit_impact(&payload, &payload, entity_type) {
            Ok(impact) => assert!(impact.deltas.is_zero()),
            Err(ConcordanceError::Validation(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
});
