//! Handlers for daily logbook entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use intrack_core::error::CoreError;
use intrack_core::logbook::{record_edit, validate_hours};
use intrack_core::types::DbId;
use intrack_db::models::attachment::Attachment;
use intrack_db::models::logbook_entry::{CreateLogbookEntry, LogbookEntry, UpdateLogbookEntry};
use intrack_db::repositories::{AccountRepo, AttachmentRepo, LogbookRepo};
use intrack_db::repositories::logbook_repo::LogbookStats;
use intrack_events::notifier::EVENT_LOGBOOK_ENTRY_CREATED;
use intrack_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireStudent, RequireSupervisor};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LogbookListResponse {
    pub entries: Vec<LogbookEntry>,
    pub stats: LogbookStats,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comments: String,
}

// ---------------------------------------------------------------------------
// Student handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/logbook/entries
///
/// Create today's entry. The entry date is always the server's current
/// date; one entry per day is enforced with a friendly pre-check and the
/// unique constraint as backstop.
pub async fn create_entry(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
    Json(input): Json<CreateLogbookEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<LogbookEntry>>)> {
    let attachment = require_own_attachment(&state, user.account_id).await?;

    let status = attachment.status().map_err(AppError::Core)?;
    if !status.is_active() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Logbook entries can only be added while the attachment is running (currently '{status}')"
        ))));
    }

    validate_hours(input.hours_worked).map_err(AppError::Core)?;
    if input.tasks.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Tasks are required".into(),
        )));
    }

    // The entry date is never taken from the client; today by definition
    // satisfies the no-future-entries rule.
    let today = chrono::Utc::now().date_naive();

    if LogbookRepo::find_for_date(&state.pool, attachment.id, today)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already submitted an entry for today".into(),
        )));
    }

    let entry = LogbookRepo::create(&state.pool, attachment.id, today, &input).await?;

    publish_entry_created(&state, &user, &attachment, &entry).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/logbook/entries
///
/// The student's entries, newest first, plus aggregate stats.
pub async fn list_entries(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
) -> AppResult<Json<DataResponse<LogbookListResponse>>> {
    let attachment = require_own_attachment(&state, user.account_id).await?;
    let entries = LogbookRepo::list_for_attachment(&state.pool, attachment.id).await?;
    let stats = LogbookRepo::stats_for_attachment(&state.pool, attachment.id).await?;
    Ok(Json(DataResponse {
        data: LogbookListResponse { entries, stats },
    }))
}

/// GET /api/v1/logbook/entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LogbookEntry>>> {
    let (entry, _) = load_entry_authorized(&state, &user, id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/logbook/entries/{id}
///
/// Student edit of an existing entry. Each entry allows at most two edits;
/// the cap is checked here and mirrored by a database constraint.
pub async fn update_entry(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLogbookEntry>,
) -> AppResult<Json<DataResponse<LogbookEntry>>> {
    let attachment = require_own_attachment(&state, user.account_id).await?;
    let entry = LogbookRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|e| e.attachment_id == attachment.id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "logbook entry",
            id,
        }))?;

    record_edit(entry.edit_count).map_err(AppError::Core)?;

    if let Some(hours) = input.hours_worked {
        validate_hours(hours).map_err(AppError::Core)?;
    }

    let updated = LogbookRepo::update(&state.pool, entry.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "logbook entry",
            id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Supervisor handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/supervisor/attachments/{id}/logbook
///
/// A supervised student's entries, newest first.
pub async fn supervisor_list_entries(
    State(state): State<AppState>,
    RequireSupervisor(user): RequireSupervisor,
    Path(attachment_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LogbookListResponse>>> {
    let attachment = require_supervised_attachment(&state, user.account_id, attachment_id).await?;
    let entries = LogbookRepo::list_for_attachment(&state.pool, attachment.id).await?;
    let stats = LogbookRepo::stats_for_attachment(&state.pool, attachment.id).await?;
    Ok(Json(DataResponse {
        data: LogbookListResponse { entries, stats },
    }))
}

/// POST /api/v1/logbook/entries/{id}/comment
///
/// Supervisor feedback on an entry. Does not count against the student's
/// edit cap.
pub async fn comment_entry(
    State(state): State<AppState>,
    RequireSupervisor(user): RequireSupervisor,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<Json<DataResponse<LogbookEntry>>> {
    let entry = LogbookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "logbook entry",
            id,
        }))?;
    require_supervised_attachment(&state, user.account_id, entry.attachment_id).await?;

    if input.comments.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Comments cannot be empty".into(),
        )));
    }

    let updated = LogbookRepo::set_supervisor_comments(&state.pool, entry.id, &input.comments)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "logbook entry",
            id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn require_own_attachment(
    state: &AppState,
    account_id: DbId,
) -> AppResult<Attachment> {
    AttachmentRepo::find_by_student(&state.pool, account_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id: account_id,
        }))
}

/// Load an attachment and verify the supervisor's email matches it.
pub(crate) async fn require_supervised_attachment(
    state: &AppState,
    supervisor_account_id: DbId,
    attachment_id: DbId,
) -> AppResult<Attachment> {
    let attachment = AttachmentRepo::find_by_id(&state.pool, attachment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id: attachment_id,
        }))?;
    let supervisor = AccountRepo::resolve_supervisor_for(&state.pool, &attachment).await?;
    match supervisor {
        Some(account) if account.id == supervisor_account_id => Ok(attachment),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "You do not supervise this attachment".into(),
        ))),
    }
}

/// Authorize entry access for any role: the owning student or the matched
/// supervisor.
async fn load_entry_authorized(
    state: &AppState,
    user: &AuthUser,
    entry_id: DbId,
) -> AppResult<(LogbookEntry, Attachment)> {
    let entry = LogbookRepo::find_by_id(&state.pool, entry_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "logbook entry",
            id: entry_id,
        }))?;
    let attachment = AttachmentRepo::find_by_id(&state.pool, entry.attachment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id: entry.attachment_id,
        }))?;

    if attachment.student_account_id == user.account_id {
        return Ok((entry, attachment));
    }
    let supervisor = AccountRepo::resolve_supervisor_for(&state.pool, &attachment).await?;
    if supervisor.is_some_and(|a| a.id == user.account_id) {
        return Ok((entry, attachment));
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You do not have access to this entry".into(),
    )))
}

/// Email the supervisor about the new entry. Fail-silent: the entry is
/// already committed.
async fn publish_entry_created(
    state: &AppState,
    user: &AuthUser,
    attachment: &Attachment,
    entry: &LogbookEntry,
) {
    if attachment.supervisor_email.is_empty() {
        return;
    }
    let student_name = match AccountRepo::find_by_id(&state.pool, user.account_id).await {
        Ok(Some(account)) => account.full_name(),
        _ => "A student".to_string(),
    };
    state.event_bus.publish(
        PlatformEvent::new(EVENT_LOGBOOK_ENTRY_CREATED)
            .with_source("logbook_entry", entry.id)
            .with_actor(user.account_id)
            .with_payload(serde_json::json!({
                "email": attachment.supervisor_email,
                "first_name": attachment.supervisor_name,
                "student_name": student_name,
                "entry_date": entry.entry_date.to_string(),
            })),
    );
}
