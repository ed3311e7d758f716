//! Concordance: curation analytics for multi-source narrative records.
//!
//! Concordance compares how several sources attest the same character or
//! event, classifies each disagreement, and ranks entities into a review
//! queue so curators work on the most incomplete and contested records first.
//!
//! # Core Principles
//!
//! - **Read-only**: Entities are inputs; the engine never mutates them
//! - **Deterministic**: Same data, same queue, same order
//! - **Graceful degradation**: A missing semantic analyzer lowers fidelity, never fails a request
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use concordance::{Concordance, Entity, InMemoryRepository, SourceAttestation};
//!
//! let repo = InMemoryRepository::new().with_event(
//!     Entity::new("tomb", "Empty Tomb")
//!         .with_source(SourceAttestation::new("mark").with_trait("location", "at the tomb"))
//!         .with_source(SourceAttestation::new("john").with_trait("location", "in the garden")),
//! );
//!
//! let engine = Concordance::new(Arc::new(repo));
//! let queue = engine.build_curation_review_queue("event", Some(10), true).unwrap();
//!
//! println!("Items: {}", queue.items.len());
//! println!("Top priority: {:.2}", queue.items[0].priority_score);
//! ```

pub mod cache;
pub mod config;
pub mod conflict;
pub mod curation;
pub mod entity;
pub mod error;
pub mod scoring;
pub mod semantic;

mod concordance;

pub use crate::concordance::{
    Concordance, CONFLICTS_NAMESPACE, IMPACT_NAMESPACE, QUEUE_NAMESPACE, UNCERTAINTY_NAMESPACE,
};
pub use cache::{cache_key, CacheRegistry, CacheStore, Invalidate, ResultCache};
pub use config::{CacheConfig, ConcordanceConfig};
pub use conflict::{analyze_conflict, ConflictCategory, ConflictRecord, Severity};
pub use curation::{
    describe_json_edit_impact, CurationQueue, EditImpact, EntityAssessment, PriorityItem,
    QueueSummary,
};
pub use entity::{Entity, EntityRepository, EntityType, FileRepository, InMemoryRepository, SourceAttestation};
pub use error::{ConcordanceError, Result};
pub use scoring::{priority_score, PriorityBand};
pub use semantic::{LexicalAnalyzer, SemanticAnalyzer, SemanticAvailability, SemanticSignals};
