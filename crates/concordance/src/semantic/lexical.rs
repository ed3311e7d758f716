//! Token-overlap semantic analyzer.
//!
//! Reads each divergent field's values as bags of words. A value whose words
//! are contained in another's adds detail (complementary); values sharing a
//! good part of their vocabulary differ in emphasis; anything else is a
//! genuine conflict. No model is needed, so this analyzer is always available.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::conflict::FieldComparator;
use crate::entity::Entity;
use crate::error::Result;

use super::provider::{SemanticAnalyzer, SemanticAvailability, SemanticSignals};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid word regex"));

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "at", "by", "for", "from", "in", "into", "of", "on", "or", "the", "to",
    "with",
];

/// How a single divergent field reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reading {
    Complementary,
    Emphasis,
    Genuine,
}

/// Heuristic analyzer based on word overlap between divergent values.
#[derive(Debug, Clone)]
pub struct LexicalAnalyzer {
    emphasis_threshold: f64,
}

impl LexicalAnalyzer {
    /// Create with the default emphasis threshold (Jaccard 0.3).
    pub fn new() -> Self {
        Self {
            emphasis_threshold: 0.3,
        }
    }

    /// Minimum Jaccard overlap for two values to count as a difference in emphasis.
    pub fn with_emphasis_threshold(mut self, threshold: f64) -> Self {
        self.emphasis_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    fn tokens(value: &str) -> HashSet<String> {
        WORD.find_iter(&value.to_lowercase())
            .map(|m| m.as_str().to_string())
            .filter(|t| !STOPWORDS.contains(&t.as_str()))
            .collect()
    }

    fn compare(&self, a: &str, b: &str) -> Reading {
        let left = Self::tokens(a);
        let right = Self::tokens(b);
        if left.is_empty() || right.is_empty() {
            return Reading::Genuine;
        }
        if left.is_subset(&right) || right.is_subset(&left) {
            return Reading::Complementary;
        }

        let shared = left.intersection(&right).count() as f64;
        let union = left.union(&right).count() as f64;
        if shared / union >= self.emphasis_threshold {
            Reading::Emphasis
        } else {
            Reading::Genuine
        }
    }

    /// A field reads as its most serious pairwise reading.
    fn read_field(&self, values: &[String]) -> Reading {
        let mut reading = Reading::Complementary;
        for (i, a) in values.iter().enumerate() {
            for b in &values[i + 1..] {
                match self.compare(a, b) {
                    Reading::Genuine => return Reading::Genuine,
                    Reading::Emphasis => reading = Reading::Emphasis,
                    Reading::Complementary => {}
                }
            }
        }
        reading
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer for LexicalAnalyzer {
    fn name(&self) -> &str {
        "lexical"
    }

    fn fingerprint(&self) -> String {
        format!("lexical@{}", self.emphasis_threshold)
    }

    fn analyze(&self, entity: &Entity) -> Result<SemanticAvailability> {
        let mut signals = SemanticSignals::default();
        for divergence in FieldComparator::divergences(entity) {
            match self.read_field(&divergence.distinct_values()) {
                Reading::Complementary => signals.complementary_details += 1,
                Reading::Emphasis => signals.different_emphases += 1,
                Reading::Genuine => signals.genuine_conflicts += 1,
            }
        }
        Ok(SemanticAvailability::Available(signals))
    }
}
