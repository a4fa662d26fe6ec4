//! Repository for supervisor/lecturer evaluations and final assessments.

use sqlx::PgPool;

use intrack_core::types::DbId;

use crate::models::evaluation::{CreateFinalAssessment, Evaluation, FinalAssessment};

/// The two evaluation tables share one row shape; this picks the table and
/// the evaluator column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationKind {
    Supervisor,
    Lecturer,
}

impl EvaluationKind {
    fn table(self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor_evaluations",
            Self::Lecturer => "lecturer_evaluations",
        }
    }

    fn evaluator_column(self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor_account_id",
            Self::Lecturer => "lecturer_account_id",
        }
    }
}

pub struct EvaluationRepo;

impl EvaluationRepo {
    /// Insert or replace the evaluation for an attachment. Each table has a
    /// unique constraint on `attachment_id`, so the upsert keys on it.
    pub async fn upsert(
        pool: &PgPool,
        kind: EvaluationKind,
        attachment_id: DbId,
        evaluator_account_id: DbId,
        criteria_scores: &serde_json::Value,
        overall_score: f64,
        comments: &str,
        status: &str,
    ) -> Result<Evaluation, sqlx::Error> {
        let table = kind.table();
        let evaluator = kind.evaluator_column();
        let query = format!(
            "INSERT INTO {table}
                (attachment_id, {evaluator}, criteria_scores, overall_score, comments, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (attachment_id) DO UPDATE SET
                {evaluator} = EXCLUDED.{evaluator},
                criteria_scores = EXCLUDED.criteria_scores,
                overall_score = EXCLUDED.overall_score,
                comments = EXCLUDED.comments,
                status = EXCLUDED.status,
                updated_at = NOW()
             RETURNING id, attachment_id, {evaluator} AS evaluator_account_id,
                       criteria_scores, overall_score, comments, status,
                       created_at, updated_at"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(attachment_id)
            .bind(evaluator_account_id)
            .bind(criteria_scores)
            .bind(overall_score)
            .bind(comments)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_attachment(
        pool: &PgPool,
        kind: EvaluationKind,
        attachment_id: DbId,
    ) -> Result<Option<Evaluation>, sqlx::Error> {
        let table = kind.table();
        let evaluator = kind.evaluator_column();
        let query = format!(
            "SELECT id, attachment_id, {evaluator} AS evaluator_account_id,
                    criteria_scores, overall_score, comments, status,
                    created_at, updated_at
             FROM {table} WHERE attachment_id = $1"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(attachment_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert_final(
        pool: &PgPool,
        input: &CreateFinalAssessment,
    ) -> Result<FinalAssessment, sqlx::Error> {
        sqlx::query_as::<_, FinalAssessment>(
            "INSERT INTO final_assessments
                (attachment_id, supervisor_score, lecturer_score, final_score,
                 grade, comments, assessed_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (attachment_id) DO UPDATE SET
                supervisor_score = EXCLUDED.supervisor_score,
                lecturer_score = EXCLUDED.lecturer_score,
                final_score = EXCLUDED.final_score,
                grade = EXCLUDED.grade,
                comments = EXCLUDED.comments,
                assessed_by = EXCLUDED.assessed_by,
                assessed_at = NOW()
             RETURNING id, attachment_id, supervisor_score, lecturer_score, final_score,
                       grade, comments, assessed_by, assessed_at",
        )
        .bind(input.attachment_id)
        .bind(input.supervisor_score)
        .bind(input.lecturer_score)
        .bind(input.final_score)
        .bind(&input.grade)
        .bind(&input.comments)
        .bind(input.assessed_by)
        .fetch_one(pool)
        .await
    }

    pub async fn find_final(
        pool: &PgPool,
        attachment_id: DbId,
    ) -> Result<Option<FinalAssessment>, sqlx::Error> {
        sqlx::query_as::<_, FinalAssessment>(
            "SELECT id, attachment_id, supervisor_score, lecturer_score, final_score,
                    grade, comments, assessed_by, assessed_at
             FROM final_assessments WHERE attachment_id = $1",
        )
        .bind(attachment_id)
        .fetch_optional(pool)
        .await
    }
}
