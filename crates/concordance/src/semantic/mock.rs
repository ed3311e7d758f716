//! Fixed-outcome analyzers for tests, demos, and deployments without a model.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::entity::Entity;
use crate::error::{ConcordanceError, Result};

use super::provider::{SemanticAnalyzer, SemanticAvailability, SemanticSignals};

/// Analyzer that never has a model loaded.
#[derive(Debug, Clone, Default)]
pub struct UnavailableAnalyzer;

impl SemanticAnalyzer for UnavailableAnalyzer {
    fn name(&self) -> &str {
        "none"
    }

    fn analyze(&self, _entity: &Entity) -> Result<SemanticAvailability> {
        Ok(SemanticAvailability::unavailable("no semantic model configured"))
    }
}

enum MockOutcome {
    Fixed(SemanticAvailability),
    Fail(String),
}

/// Mock analyzer that returns a predictable outcome and counts calls.
pub struct MockAnalyzer {
    outcome: MockOutcome,
    calls: AtomicUsize,
}

impl MockAnalyzer {
    /// Always returns the given signals.
    pub fn available(signals: SemanticSignals) -> Self {
        Self {
            outcome: MockOutcome::Fixed(SemanticAvailability::Available(signals)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always reports a missing capability.
    pub fn unavailable() -> Self {
        Self {
            outcome: MockOutcome::Fixed(SemanticAvailability::unavailable("mock model missing")),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with a non-capability error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Fail(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `analyze` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SemanticAnalyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    fn analyze(&self, _entity: &Entity) -> Result<SemanticAvailability> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            MockOutcome::Fixed(outcome) => Ok(outcome.clone()),
            MockOutcome::Fail(message) => Err(ConcordanceError::Semantic(message.clone())),
        }
    }
}
