//! Curation priority scoring.
//!
//! ```text
//! gap_pressure         = 1 - completeness_score
//! conflict_pressure    = clamp(density * 0.12 + high_count * 0.08, 0, 1)
//! uncertainty_pressure = clamp(uncertainty, 0, 1)
//! priority_score       = clamp(0.45 * gap + 0.35 * conflict + 0.20 * uncertainty, 0, 1)
//! ```
//!
//! Gap closure dominates, conflict resolution comes second, and interpretive
//! ambiguity breaks ties.

use serde::{Deserialize, Serialize};

pub const GAP_WEIGHT: f64 = 0.45;
pub const CONFLICT_WEIGHT: f64 = 0.35;
pub const UNCERTAINTY_WEIGHT: f64 = 0.20;

/// Conflict pressure added per divergent field.
pub const DENSITY_PRESSURE: f64 = 0.12;
/// Conflict pressure added per high or critical field.
pub const HIGH_SEVERITY_PRESSURE: f64 = 0.08;

/// Inputs to the priority formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityInputs {
    /// Completeness in [0,1].
    pub completeness_score: f64,
    /// Number of divergent fields.
    pub conflict_density: usize,
    /// Uncertainty in [0,1].
    pub uncertainty: f64,
    /// Number of high or critical divergent fields.
    pub high_severity_count: usize,
}

/// The three pressures and the blended score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub gap_pressure: f64,
    pub conflict_pressure: f64,
    pub uncertainty_pressure: f64,
    pub score: f64,
}

/// Clamp to [0,1]; non-finite values count as 0.
fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Compute every pressure and the final score.
pub fn priority_breakdown(inputs: &PriorityInputs) -> PriorityBreakdown {
    let gap_pressure = 1.0 - clamp_unit(inputs.completeness_score);
    let conflict_pressure = clamp_unit(
        inputs.conflict_density as f64 * DENSITY_PRESSURE
            + inputs.high_severity_count as f64 * HIGH_SEVERITY_PRESSURE,
    );
    let uncertainty_pressure = clamp_unit(inputs.uncertainty);

    let score = clamp_unit(
        GAP_WEIGHT * gap_pressure
            + CONFLICT_WEIGHT * conflict_pressure
            + UNCERTAINTY_WEIGHT * uncertainty_pressure,
    );

    PriorityBreakdown {
        gap_pressure,
        conflict_pressure,
        uncertainty_pressure,
        score,
    }
}

/// Blend completeness gap, conflict pressure, and uncertainty into one [0,1] score.
pub fn priority_score(
    completeness_score: f64,
    conflict_density: usize,
    uncertainty: f64,
    high_severity_count: usize,
) -> f64 {
    priority_breakdown(&PriorityInputs {
        completeness_score,
        conflict_density,
        uncertainty,
        high_severity_count,
    })
    .score
}

/// Priority band used in queue summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityBand {
    /// [0, 0.33)
    Low,
    /// [0.33, 0.66)
    Medium,
    /// [0.66, 1.0]
    High,
}

impl PriorityBand {
    pub fn of(score: f64) -> Self {
        if score >= 0.66 {
            PriorityBand::High
        } else if score >= 0.33 {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityBand::Low => "low",
            PriorityBand::Medium => "medium",
            PriorityBand::High => "high",
        }
    }
}
