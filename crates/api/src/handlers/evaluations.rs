//! Handlers for attachment evaluations and the final assessment.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use intrack_core::error::CoreError;
use intrack_core::grading::{
    final_score, letter_grade, overall_score, EvaluationStatus,
};
use intrack_core::types::DbId;
use intrack_core::Role;
use intrack_db::models::attachment::Attachment;
use intrack_db::models::evaluation::{
    CreateFinalAssessment, Evaluation, FinalAssessment, UpsertEvaluation,
};
use intrack_db::repositories::evaluation_repo::EvaluationKind;
use intrack_db::repositories::{
    AccountRepo, AssignmentRepo, AttachmentRepo, EvaluationRepo, LecturerRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireLecturer, RequireSupervisor};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Both evaluations plus the final assessment, each optional until written.
#[derive(Debug, Serialize)]
pub struct EvaluationSummary {
    pub supervisor: Option<Evaluation>,
    pub lecturer: Option<Evaluation>,
    pub final_assessment: Option<FinalAssessment>,
}

#[derive(Debug, Deserialize)]
pub struct FinalAssessmentRequest {
    #[serde(default)]
    pub comments: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// PUT /api/v1/attachments/{id}/evaluations/supervisor
///
/// Upsert the supervisor evaluation. Scores are validated and the overall
/// score derived server-side; the submitted payload never carries it.
pub async fn upsert_supervisor(
    State(state): State<AppState>,
    RequireSupervisor(user): RequireSupervisor,
    Path(id): Path<DbId>,
    Json(input): Json<UpsertEvaluation>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    let attachment = load_attachment(&state, id).await?;
    require_matched_supervisor(&state, user.account_id, &attachment).await?;
    let evaluation = upsert(&state, EvaluationKind::Supervisor, &attachment, user.account_id, &input).await?;
    Ok(Json(DataResponse { data: evaluation }))
}

/// PUT /api/v1/attachments/{id}/evaluations/lecturer
///
/// Upsert the lecturer evaluation. Restricted to the lecturer assigned to
/// the student for the current academic year.
pub async fn upsert_lecturer(
    State(state): State<AppState>,
    RequireLecturer(user): RequireLecturer,
    Path(id): Path<DbId>,
    Json(input): Json<UpsertEvaluation>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    let attachment = load_attachment(&state, id).await?;
    require_assigned_lecturer(&state, user.account_id, &attachment).await?;
    let evaluation = upsert(&state, EvaluationKind::Lecturer, &attachment, user.account_id, &input).await?;
    Ok(Json(DataResponse { data: evaluation }))
}

/// GET /api/v1/attachments/{id}/evaluations
///
/// Evaluation state for an attachment. Visible to the owning student, the
/// matched supervisor, the assigned lecturer, and admins.
pub async fn get_evaluations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EvaluationSummary>>> {
    let attachment = load_attachment(&state, id).await?;
    authorize_read(&state, &user, &attachment).await?;

    let supervisor =
        EvaluationRepo::find_for_attachment(&state.pool, EvaluationKind::Supervisor, attachment.id)
            .await?;
    let lecturer =
        EvaluationRepo::find_for_attachment(&state.pool, EvaluationKind::Lecturer, attachment.id)
            .await?;
    let final_assessment = EvaluationRepo::find_final(&state.pool, attachment.id).await?;

    Ok(Json(DataResponse {
        data: EvaluationSummary {
            supervisor,
            lecturer,
            final_assessment,
        },
    }))
}

/// POST /api/v1/attachments/{id}/final-assessment
///
/// Derive and store the final assessment. Requires both evaluations to be
/// submitted; the blended score and letter grade are computed here, never
/// accepted from the client.
pub async fn finalize(
    State(state): State<AppState>,
    RequireLecturer(user): RequireLecturer,
    Path(id): Path<DbId>,
    Json(input): Json<FinalAssessmentRequest>,
) -> AppResult<Json<DataResponse<FinalAssessment>>> {
    let attachment = load_attachment(&state, id).await?;
    require_assigned_lecturer(&state, user.account_id, &attachment).await?;

    let supervisor = require_submitted(
        &state,
        EvaluationKind::Supervisor,
        attachment.id,
        "supervisor",
    )
    .await?;
    let lecturer =
        require_submitted(&state, EvaluationKind::Lecturer, attachment.id, "lecturer").await?;

    let blended = final_score(supervisor.overall_score, lecturer.overall_score);
    let assessment = EvaluationRepo::upsert_final(
        &state.pool,
        &CreateFinalAssessment {
            attachment_id: attachment.id,
            supervisor_score: supervisor.overall_score,
            lecturer_score: lecturer.overall_score,
            final_score: blended,
            grade: letter_grade(blended).to_string(),
            comments: input.comments,
            assessed_by: user.account_id,
        },
    )
    .await?;
    Ok(Json(DataResponse { data: assessment }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_attachment(state: &AppState, id: DbId) -> AppResult<Attachment> {
    AttachmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id,
        }))
}

async fn upsert(
    state: &AppState,
    kind: EvaluationKind,
    attachment: &Attachment,
    evaluator_account_id: DbId,
    input: &UpsertEvaluation,
) -> AppResult<Evaluation> {
    let status = EvaluationStatus::parse(&input.status).map_err(AppError::Core)?;
    let overall = overall_score(&input.criteria_scores).map_err(AppError::Core)?;
    let scores_json = serde_json::to_value(&input.criteria_scores)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let evaluation = EvaluationRepo::upsert(
        &state.pool,
        kind,
        attachment.id,
        evaluator_account_id,
        &scores_json,
        overall,
        &input.comments,
        status.as_str(),
    )
    .await?;
    Ok(evaluation)
}

async fn require_submitted(
    state: &AppState,
    kind: EvaluationKind,
    attachment_id: DbId,
    label: &str,
) -> AppResult<Evaluation> {
    let evaluation = EvaluationRepo::find_for_attachment(&state.pool, kind, attachment_id)
        .await?
        .filter(|e| e.status == EvaluationStatus::Submitted.as_str())
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "The {label} evaluation must be submitted before the final assessment"
            )))
        })?;
    Ok(evaluation)
}

async fn require_matched_supervisor(
    state: &AppState,
    account_id: DbId,
    attachment: &Attachment,
) -> AppResult<()> {
    let supervisor = AccountRepo::resolve_supervisor_for(&state.pool, attachment).await?;
    match supervisor {
        Some(account) if account.id == account_id => Ok(()),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "You do not supervise this attachment".into(),
        ))),
    }
}

async fn require_assigned_lecturer(
    state: &AppState,
    account_id: DbId,
    attachment: &Attachment,
) -> AppResult<()> {
    let lecturer = LecturerRepo::find_by_account(&state.pool, account_id)
        .await?
        .ok_or(AppError::Core(CoreError::Forbidden(
            "No lecturer profile is linked to this account".into(),
        )))?;
    let year = state.config.current_academic_year();
    let assignment =
        AssignmentRepo::find_for_student(&state.pool, attachment.student_account_id, year).await?;
    if assignment.is_some_and(|a| a.lecturer_id == lecturer.id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You are not assigned to this student".into(),
        )))
    }
}

async fn authorize_read(
    state: &AppState,
    user: &AuthUser,
    attachment: &Attachment,
) -> AppResult<()> {
    match user.role {
        Role::Admin => return Ok(()),
        Role::Student if attachment.student_account_id == user.account_id => return Ok(()),
        Role::Supervisor => {
            if require_matched_supervisor(state, user.account_id, attachment)
                .await
                .is_ok()
            {
                return Ok(());
            }
        }
        Role::Lecturer => {
            if require_assigned_lecturer(state, user.account_id, attachment)
                .await
                .is_ok()
            {
                return Ok(());
            }
        }
        _ => {}
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You do not have access to these evaluations".into(),
    )))
}
