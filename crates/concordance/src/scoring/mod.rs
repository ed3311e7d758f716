//! Completeness, uncertainty, and priority scoring.

mod completeness;
mod priority;
mod uncertainty;

pub use completeness::{CompletenessReport, CHARACTER_FIELDS, EVENT_FIELDS, MIN_SOURCES};
pub use priority::{
    priority_breakdown, priority_score, PriorityBand, PriorityBreakdown, PriorityInputs,
    CONFLICT_WEIGHT, DENSITY_PRESSURE, GAP_WEIGHT, HIGH_SEVERITY_PRESSURE, UNCERTAINTY_WEIGHT,
};
pub use uncertainty::{
    semantic_uncertainty, structural_uncertainty, UncertaintyBasis, UncertaintyEstimate,
    UncertaintyEstimator,
};
