//! Semantic analyzer trait and types.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::Result;

/// Counts of how an entity's divergences read on closer inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticSignals {
    /// Sources describe the same thing with different emphasis.
    pub different_emphases: usize,
    /// One source adds detail the other omits.
    pub complementary_details: usize,
    /// Sources make incompatible claims.
    pub genuine_conflicts: usize,
}

impl SemanticSignals {
    pub fn new(different_emphases: usize, complementary_details: usize, genuine_conflicts: usize) -> Self {
        Self {
            different_emphases,
            complementary_details,
            genuine_conflicts,
        }
    }

    pub fn total(&self) -> usize {
        self.different_emphases + self.complementary_details + self.genuine_conflicts
    }
}

/// Outcome of asking the semantic analyzer about an entity.
///
/// `Unavailable` means the capability is missing (no model loaded); it is a
/// normal outcome, not an error, and the uncertainty estimator falls back to
/// structural signals when it sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SemanticAvailability {
    Available(SemanticSignals),
    Unavailable { reason: String },
}

impl SemanticAvailability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SemanticAvailability::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Optional collaborator that reads divergent values more deeply.
///
/// Implementations must be thread-safe and hold no mutable state shared
/// across calls; the engine may call them repeatedly for the same entity.
pub trait SemanticAnalyzer: Send + Sync {
    /// Name used for provenance tags and logging.
    fn name(&self) -> &str;

    /// Identity of this analyzer's configuration, used in cache keys.
    ///
    /// Two analyzers with the same fingerprint must produce the same output
    /// for the same entity. Defaults to the name.
    fn fingerprint(&self) -> String {
        self.name().to_string()
    }

    /// Analyze an entity's divergences.
    ///
    /// Return `Ok(SemanticAvailability::Unavailable { .. })` when the
    /// underlying model is missing. Errors are reserved for genuine failures
    /// and propagate to the caller.
    fn analyze(&self, entity: &Entity) -> Result<SemanticAvailability>;
}
