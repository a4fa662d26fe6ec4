//! Evaluation models: supervisor/lecturer evaluations and final assessment.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::types::{DbId, Timestamp};

/// A supervisor's or lecturer's criteria-based evaluation of an attachment.
/// Shared row shape; the repository knows which table it came from.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Evaluation {
    pub id: DbId,
    pub attachment_id: DbId,
    pub evaluator_account_id: DbId,
    /// JSON map of criterion-id → score (1..=5).
    pub criteria_scores: serde_json::Value,
    pub overall_score: f64,
    pub comments: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Upsert DTO for either evaluation table.
#[derive(Debug, Deserialize)]
pub struct UpsertEvaluation {
    /// Criterion-id → score (1..=5).
    pub criteria_scores: std::collections::BTreeMap<DbId, i32>,
    #[serde(default)]
    pub comments: String,
    /// `draft` or `submitted`.
    pub status: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FinalAssessment {
    pub id: DbId,
    pub attachment_id: DbId,
    pub supervisor_score: f64,
    pub lecturer_score: f64,
    pub final_score: f64,
    pub grade: String,
    pub comments: String,
    pub assessed_by: DbId,
    pub assessed_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateFinalAssessment {
    pub attachment_id: DbId,
    pub supervisor_score: f64,
    pub lecturer_score: f64,
    pub final_score: f64,
    pub grade: String,
    pub comments: String,
    pub assessed_by: DbId,
}
