//! Handlers for attachment placements and their lifecycle.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use intrack_core::attachment::{validate_dates, AttachmentStatus, Progress};
use intrack_core::error::CoreError;
use intrack_core::types::DbId;
use intrack_core::Role;
use intrack_db::models::attachment::{Attachment, CreateAttachment, UpdateAttachment};
use intrack_db::repositories::{AccountRepo, AttachmentRepo};
use intrack_events::notifier::EVENT_ATTACHMENT_STATUS_CHANGED;
use intrack_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireStudent, RequireSupervisor};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response / request types
// ---------------------------------------------------------------------------

/// Attachment enriched with derived progress metrics.
#[derive(Debug, Serialize)]
pub struct AttachmentView {
    #[serde(flatten)]
    pub attachment: Attachment,
    pub progress: Progress,
}

impl AttachmentView {
    fn build(attachment: Attachment) -> AppResult<Self> {
        let today = chrono::Utc::now().date_naive();
        let progress = attachment.progress_on(today).map_err(AppError::Core)?;
        Ok(AttachmentView {
            attachment,
            progress,
        })
    }
}

/// Lifecycle action requested by a supervisor or student.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    /// Supervisor confirms the placement; the attachment starts running.
    Approve,
    /// Supervisor declines a pending placement.
    Reject,
    /// Supervisor marks a running attachment as finished.
    Complete,
    /// Student or supervisor cancels the attachment.
    Cancel,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub action: StatusAction,
}

// ---------------------------------------------------------------------------
// Student handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/attachments
///
/// Create the student's attachment in `pending` state. Each student has at
/// most one; a second application returns a conflict carrying the existing
/// attachment id so the frontend can offer "edit existing" instead.
pub async fn create(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
    Json(input): Json<CreateAttachment>,
) -> AppResult<(StatusCode, Json<DataResponse<AttachmentView>>)> {
    if let Some(existing) = AttachmentRepo::find_by_student(&state.pool, user.account_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "You already have an attachment (id {}); edit it instead",
            existing.id
        ))));
    }

    let today = chrono::Utc::now().date_naive();
    validate_dates(input.start_date, input.end_date, today).map_err(AppError::Core)?;
    if input.organization.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Organization is required".into(),
        )));
    }

    let attachment = AttachmentRepo::create(&state.pool, user.account_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AttachmentView::build(attachment)?,
        }),
    ))
}

/// GET /api/v1/attachments/me
pub async fn my_attachment(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
) -> AppResult<Json<DataResponse<AttachmentView>>> {
    let attachment = AttachmentRepo::find_by_student(&state.pool, user.account_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id: user.account_id,
        }))?;
    Ok(Json(DataResponse {
        data: AttachmentView::build(attachment)?,
    }))
}

/// PUT /api/v1/attachments/me
///
/// Edit attachment details. Allowed only while pending or approved.
pub async fn update_my_attachment(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
    Json(input): Json<UpdateAttachment>,
) -> AppResult<Json<DataResponse<AttachmentView>>> {
    let attachment = AttachmentRepo::find_by_student(&state.pool, user.account_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id: user.account_id,
        }))?;

    let status = attachment.status().map_err(AppError::Core)?;
    if !status.is_editable() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Attachment details cannot be edited while '{status}'"
        ))));
    }

    // Validate the dates that would result from the edit.
    let start = input.start_date.unwrap_or(attachment.start_date);
    let end = input.end_date.unwrap_or(attachment.end_date);
    if input.start_date.is_some() || input.end_date.is_some() {
        let today = chrono::Utc::now().date_naive();
        validate_dates(start, end, today).map_err(AppError::Core)?;
    }

    let updated = AttachmentRepo::update(&state.pool, attachment.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id: attachment.id,
        }))?;
    Ok(Json(DataResponse {
        data: AttachmentView::build(updated)?,
    }))
}

// ---------------------------------------------------------------------------
// Supervisor handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/supervisor/attachments
///
/// All attachments naming the authenticated supervisor's email.
pub async fn supervisor_attachments(
    State(state): State<AppState>,
    RequireSupervisor(user): RequireSupervisor,
) -> AppResult<Json<DataResponse<Vec<AttachmentView>>>> {
    let account = AccountRepo::find_by_id(&state.pool, user.account_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "account",
            id: user.account_id,
        }))?;

    let attachments =
        AttachmentRepo::list_by_supervisor_email(&state.pool, &account.email).await?;
    let views = attachments
        .into_iter()
        .map(AttachmentView::build)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/attachments/{id}/status
///
/// Apply a lifecycle action. Approve/reject/complete are restricted to the
/// supervisor whose email matches the attachment; cancel is additionally
/// open to the owning student.
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<AttachmentView>>> {
    let attachment = AttachmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id,
        }))?;

    authorize_action(&state, &user, &attachment, &input.action).await?;

    let current = attachment.status().map_err(AppError::Core)?;
    let next = match input.action {
        // Approval starts the attachment: pending → approved → ongoing.
        StatusAction::Approve => {
            let approved = current
                .transition(AttachmentStatus::Approved)
                .map_err(AppError::Core)?;
            approved
                .transition(AttachmentStatus::Ongoing)
                .map_err(AppError::Core)?
        }
        StatusAction::Reject | StatusAction::Cancel => current
            .transition(AttachmentStatus::Cancelled)
            .map_err(AppError::Core)?,
        StatusAction::Complete => current
            .transition(AttachmentStatus::Completed)
            .map_err(AppError::Core)?,
    };

    let updated = AttachmentRepo::set_status(&state.pool, attachment.id, next)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id: attachment.id,
        }))?;

    publish_status_change(&state, &user, &updated).await;

    Ok(Json(DataResponse {
        data: AttachmentView::build(updated)?,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn authorize_action(
    state: &AppState,
    user: &AuthUser,
    attachment: &Attachment,
    action: &StatusAction,
) -> AppResult<()> {
    let is_owner =
        user.role == Role::Student && attachment.student_account_id == user.account_id;
    if matches!(action, StatusAction::Cancel) && is_owner {
        return Ok(());
    }

    // All other actions require the matched supervisor.
    let supervisor = AccountRepo::resolve_supervisor_for(&state.pool, attachment).await?;
    match supervisor {
        Some(account) if account.id == user.account_id => Ok(()),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "Only the attachment's supervisor may perform this action".into(),
        ))),
    }
}

/// Notify the student about the status change. Never fails the request;
/// the transition is already committed.
async fn publish_status_change(state: &AppState, actor: &AuthUser, attachment: &Attachment) {
    let student = match AccountRepo::find_by_id(&state.pool, attachment.student_account_id).await {
        Ok(Some(account)) => account,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load student for status notification");
            return;
        }
    };
    state.event_bus.publish(
        PlatformEvent::new(EVENT_ATTACHMENT_STATUS_CHANGED)
            .with_source("attachment", attachment.id)
            .with_actor(actor.account_id)
            .with_payload(serde_json::json!({
                "email": student.email,
                "first_name": student.first_name,
                "status": attachment.status,
            })),
    );
}
