//! Evaluation scoring and final-grade derivation.
//!
//! Supervisor and lecturer evaluations record per-criterion scores (1..=5)
//! plus an overall score on a 0..=100 scale. The final assessment blends
//! the two overall scores with fixed weights and maps the result to a
//! letter grade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Per-criterion score bounds.
pub const MIN_CRITERION_SCORE: i32 = 1;
pub const MAX_CRITERION_SCORE: i32 = 5;

/// Weight of the supervisor's overall score in the final blend.
pub const SUPERVISOR_WEIGHT: f64 = 0.4;

/// Weight of the lecturer's overall score in the final blend.
pub const LECTURER_WEIGHT: f64 = 0.6;

/// Evaluation draft/submitted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
}

impl EvaluationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationStatus::Draft => "draft",
            EvaluationStatus::Submitted => "submitted",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "draft" => Ok(EvaluationStatus::Draft),
            "submitted" => Ok(EvaluationStatus::Submitted),
            other => Err(CoreError::Validation(format!(
                "Invalid evaluation status '{other}'"
            ))),
        }
    }
}

/// Validate a criterion-id → score map: every score must lie in 1..=5.
pub fn validate_criteria_scores(scores: &BTreeMap<DbId, i32>) -> Result<(), CoreError> {
    if scores.is_empty() {
        return Err(CoreError::Validation(
            "At least one criterion score is required".into(),
        ));
    }
    for (criterion_id, score) in scores {
        if !(MIN_CRITERION_SCORE..=MAX_CRITERION_SCORE).contains(score) {
            return Err(CoreError::Validation(format!(
                "Score for criterion {criterion_id} must be between \
                 {MIN_CRITERION_SCORE} and {MAX_CRITERION_SCORE}, got {score}"
            )));
        }
    }
    Ok(())
}

/// Convert a criteria-score map to an overall 0..=100 score (mean of the
/// per-criterion scores, scaled from the 1..=5 range).
pub fn overall_score(scores: &BTreeMap<DbId, i32>) -> Result<f64, CoreError> {
    validate_criteria_scores(scores)?;
    let sum: i32 = scores.values().sum();
    let mean = sum as f64 / scores.len() as f64;
    Ok(mean / MAX_CRITERION_SCORE as f64 * 100.0)
}

/// Blend the supervisor and lecturer overall scores into a final score.
pub fn final_score(supervisor_score: f64, lecturer_score: f64) -> f64 {
    supervisor_score * SUPERVISOR_WEIGHT + lecturer_score * LECTURER_WEIGHT
}

/// Map a 0..=100 final score to a letter grade.
pub fn letter_grade(score: f64) -> &'static str {
    if score >= 80.0 {
        "A"
    } else if score >= 70.0 {
        "B"
    } else if score >= 60.0 {
        "C"
    } else if score >= 50.0 {
        "D"
    } else {
        "E"
    }
}
