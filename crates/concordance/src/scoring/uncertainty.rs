//! Interpretive uncertainty of an entity.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{cache_key, ResultCache};
use crate::entity::Entity;
use crate::error::Result;
use crate::semantic::{SemanticAnalyzer, SemanticAvailability, SemanticSignals};

/// Ceiling of the structural fallback.
pub const STRUCTURAL_CAP: f64 = 0.6;
/// Structural uncertainty per divergent field.
pub const STRUCTURAL_PER_CONFLICT: f64 = 0.12;

pub const EMPHASIS_WEIGHT: f64 = 0.2;
pub const COMPLEMENTARY_WEIGHT: f64 = 0.1;
pub const GENUINE_WEIGHT: f64 = 0.05;
/// Density contribution added on top of semantic signals.
pub const SEMANTIC_PER_CONFLICT: f64 = 0.05;

/// Which signal produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyBasis {
    /// Conflict density only; no semantic analyzer, or it was unavailable.
    Structural,
    /// Semantic signals plus conflict density.
    Semantic,
}

/// An uncertainty value in [0,1] with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyEstimate {
    pub value: f64,
    pub basis: UncertaintyBasis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<SemanticSignals>,
}

/// `min(0.6, density * 0.12)`.
pub fn structural_uncertainty(conflict_density: usize) -> f64 {
    (conflict_density as f64 * STRUCTURAL_PER_CONFLICT).min(STRUCTURAL_CAP)
}

/// `min(1.0, emphasis*0.2 + complementary*0.1 + genuine*0.05 + density*0.05)`.
///
/// Differing emphasis needs a curator's judgment and weighs most; genuine
/// contradictions are clear-cut and only need documenting.
pub fn semantic_uncertainty(signals: &SemanticSignals, conflict_density: usize) -> f64 {
    let raw = signals.different_emphases as f64 * EMPHASIS_WEIGHT
        + signals.complementary_details as f64 * COMPLEMENTARY_WEIGHT
        + signals.genuine_conflicts as f64 * GENUINE_WEIGHT;
    (raw + conflict_density as f64 * SEMANTIC_PER_CONFLICT).min(1.0)
}

/// Derives uncertainty from conflict density and, optionally, a semantic analyzer.
#[derive(Clone, Default)]
pub struct UncertaintyEstimator {
    analyzer: Option<Arc<dyn SemanticAnalyzer>>,
    cache: Option<Arc<ResultCache>>,
}

impl UncertaintyEstimator {
    /// Estimator with no semantic analyzer: always structural.
    pub fn structural() -> Self {
        Self::default()
    }

    /// Estimator that consults `analyzer` first.
    pub fn with_analyzer(analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        Self {
            analyzer: Some(analyzer),
            cache: None,
        }
    }

    /// Memoize semantic estimates in `cache`.
    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Name of the configured analyzer, if any.
    pub fn analyzer_name(&self) -> Option<&str> {
        self.analyzer.as_deref().map(|a| a.name())
    }

    /// Configuration fingerprint of the analyzer; `None` when structural.
    pub fn fingerprint(&self) -> Option<String> {
        self.analyzer.as_deref().map(|a| a.fingerprint())
    }

    /// Estimate uncertainty for an entity with `conflict_density` divergent fields.
    ///
    /// An `Unavailable` analyzer outcome is absorbed here and never
    /// propagates; any other analyzer error does.
    pub fn estimate(&self, entity: &Entity, conflict_density: usize) -> Result<UncertaintyEstimate> {
        let Some(analyzer) = self.analyzer.as_deref() else {
            return Ok(Self::fallback(conflict_density, None));
        };

        let key = match &self.cache {
            Some(cache) => {
                let key = cache_key(&(analyzer.fingerprint(), conflict_density, entity))?;
                if let Some(hit) = cache.get_as::<UncertaintyEstimate>(&key) {
                    return Ok(hit);
                }
                Some(key)
            }
            None => None,
        };

        match analyzer.analyze(entity)? {
            SemanticAvailability::Available(signals) => {
                let estimate = UncertaintyEstimate {
                    value: semantic_uncertainty(&signals, conflict_density),
                    basis: UncertaintyBasis::Semantic,
                    signals: Some(signals),
                };
                if let (Some(cache), Some(key)) = (&self.cache, key) {
                    cache.set_as(&key, &estimate, Some(analyzer.name()))?;
                }
                Ok(estimate)
            }
            SemanticAvailability::Unavailable { reason } => {
                Ok(Self::fallback(conflict_density, Some((analyzer.name(), &reason))))
            }
        }
    }

    fn fallback(conflict_density: usize, unavailable: Option<(&str, &str)>) -> UncertaintyEstimate {
        if let Some((name, reason)) = unavailable {
            debug!(analyzer = name, reason, "semantic analyzer unavailable, using structural uncertainty");
        }
        UncertaintyEstimate {
            value: structural_uncertainty(conflict_density),
            basis: UncertaintyBasis::Structural,
            signals: None,
        }
    }
}

impl std::fmt::Debug for UncertaintyEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UncertaintyEstimator")
            .field("analyzer", &self.analyzer_name())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::error::ConcordanceError;
    use crate::entity::SourceAttestation;
    use crate::semantic::{LexicalAnalyzer, MockAnalyzer};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_structural_formula_caps_at_point_six() {
        assert_eq!(structural_uncertainty(0), 0.0);
        assert!(approx(structural_uncertainty(3), 0.36));
        assert!(approx(structural_uncertainty(5), 0.6));
        assert!(approx(structural_uncertainty(40), 0.6));
    }

    #[test]
    fn test_semantic_formula() {
        let signals = SemanticSignals::new(1, 2, 3);
        // 0.2 + 0.2 + 0.15 + 2 * 0.05
        assert!(approx(semantic_uncertainty(&signals, 2), 0.65));
        assert_eq!(semantic_uncertainty(&SemanticSignals::new(10, 0, 0), 0), 1.0);
    }

    #[test]
    fn test_no_analyzer_is_structural() {
        let estimate = UncertaintyEstimator::structural()
            .estimate(&Entity::new("a", "A"), 2)
            .unwrap();
        assert_eq!(estimate.basis, UncertaintyBasis::Structural);
        assert!(approx(estimate.value, 0.24));
    }

    #[test]
    fn test_unavailable_falls_back() {
        let estimator = UncertaintyEstimator::with_analyzer(Arc::new(MockAnalyzer::unavailable()));
        let estimate = estimator.estimate(&Entity::new("a", "A"), 10).unwrap();
        assert_eq!(estimate.basis, UncertaintyBasis::Structural);
        assert!(approx(estimate.value, 0.6));
        assert!(estimate.signals.is_none());
    }

    #[test]
    fn test_available_uses_signals() {
        let estimator = UncertaintyEstimator::with_analyzer(Arc::new(MockAnalyzer::available(
            SemanticSignals::new(2, 0, 1),
        )));
        let estimate = estimator.estimate(&Entity::new("a", "A"), 3).unwrap();
        assert_eq!(estimate.basis, UncertaintyBasis::Semantic);
        assert!(approx(estimate.value, 0.4 + 0.05 + 0.15));
    }

    #[test]
    fn test_other_errors_propagate() {
        let estimator = UncertaintyEstimator::with_analyzer(Arc::new(MockAnalyzer::failing("model crashed")));
        assert!(matches!(
            estimator.estimate(&Entity::new("a", "A"), 1),
            Err(ConcordanceError::Semantic(_))
        ));
    }

    #[test]
    fn test_semantic_estimates_are_cached() {
        let mock = Arc::new(MockAnalyzer::available(SemanticSignals::new(1, 1, 1)));
        let cache = Arc::new(ResultCache::new(CacheStore::new(), "uncertainty", 60));
        let estimator = UncertaintyEstimator::with_analyzer(mock.clone()).with_cache(cache.clone());
        let entity = Entity::new("a", "A");

        let first = estimator.estimate(&entity, 1).unwrap();
        let second = estimator.estimate(&entity, 1).unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.calls(), 1);
        assert_eq!(cache.len(), 1);

        estimator.estimate(&entity, 2).unwrap();
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn test_differently_tuned_analyzers_do_not_share_estimates() {
        let cache = Arc::new(ResultCache::new(CacheStore::new(), "uncertainty", 60));
        let entity = Entity::new("peter", "Peter")
            .with_source(SourceAttestation::new("mark").with_trait("calling", "women found the stone rolled away"))
            .with_source(SourceAttestation::new("luke").with_trait("calling", "women found an angel seated on the stone"));

        let loose = UncertaintyEstimator::with_analyzer(Arc::new(LexicalAnalyzer::new()))
            .with_cache(cache.clone());
        let strict = UncertaintyEstimator::with_analyzer(Arc::new(
            LexicalAnalyzer::new().with_emphasis_threshold(0.9),
        ))
        .with_cache(cache.clone());

        let a = loose.estimate(&entity, 1).unwrap();
        let b = strict.estimate(&entity, 1).unwrap();
        assert_eq!(a.signals, Some(SemanticSignals::new(1, 0, 0)));
        assert_eq!(b.signals, Some(SemanticSignals::new(0, 0, 1)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_fallbacks_are_not_cached() {
        let mock = Arc::new(MockAnalyzer::unavailable());
        let cache = Arc::new(ResultCache::new(CacheStore::new(), "uncertainty", 60));
        let estimator = UncertaintyEstimator::with_analyzer(mock.clone()).with_cache(cache.clone());

        estimator.estimate(&Entity::new("a", "A"), 1).unwrap();
        estimator.estimate(&Entity::new("a", "A"), 1).unwrap();
        assert_eq!(mock.calls(), 2);
        assert!(cache.is_empty());
    }
}
