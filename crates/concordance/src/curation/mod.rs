//! Curation workflows built on the scoring primitives.
//!
//! - `Assessor` scores one entity: completeness, conflicts, uncertainty, priority
//! - `CurationQueueBuilder` ranks every entity of a type into a review queue
//! - `ImpactPreviewer` compares metrics before and after a raw-data edit

mod assessment;
mod impact;
mod queue;

pub use assessment::{Assessor, EntityAssessment, PriorityMetrics};
pub use impact::{
    describe_json_edit_impact, EditImpact, EntityMetrics, ImpactPreviewer, MetricDeltas,
    NO_MATERIAL_CHANGE,
};
pub use queue::{BandCounts, CurationQueue, CurationQueueBuilder, PriorityItem, QueueSummary};
