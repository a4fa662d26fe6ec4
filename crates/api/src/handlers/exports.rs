//! Logbook export endpoints (CSV and JSON).

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use intrack_core::error::CoreError;
use intrack_core::export::{logbook_csv, LogbookCsvRow};
use intrack_core::types::DbId;
use intrack_core::Role;
use intrack_db::models::attachment::Attachment;
use intrack_db::repositories::{
    AccountRepo, AssignmentRepo, AttachmentRepo, LecturerRepo, LogbookRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attachments/{id}/export/{format}
///
/// Export an attachment's logbook. `csv` streams a text/csv attachment,
/// `json` returns the entries in the standard envelope. `pdf` is not
/// supported; rendering is delegated to an external service that is not
/// part of this backend.
pub async fn export_logbook(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, format)): Path<(DbId, String)>,
) -> AppResult<Response> {
    let attachment = AttachmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "attachment",
            id,
        }))?;
    authorize_export(&state, &user, &attachment).await?;

    let entries = LogbookRepo::list_for_attachment(&state.pool, attachment.id).await?;

    match format.as_str() {
        "csv" => {
            let rows: Vec<LogbookCsvRow> = entries
                .iter()
                .map(|e| LogbookCsvRow {
                    entry_date: e.entry_date.to_string(),
                    department_section: e.department_section.clone(),
                    tasks: e.tasks.clone(),
                    skills_learned: e.skills_learned.clone(),
                    achievements: e.achievements.clone(),
                    challenges: e.challenges.clone(),
                    hours_worked: e.hours_worked.to_string(),
                    supervisor_comments: e.supervisor_comments.clone(),
                })
                .collect();
            let body = logbook_csv(&rows);
            let file_name = format!("logbook_attachment_{}.csv", attachment.id);
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{file_name}\""),
                    ),
                ],
                body,
            )
                .into_response())
        }
        "json" => Ok(Json(DataResponse { data: entries }).into_response()),
        other => Err(AppError::BadRequest(format!(
            "Unsupported export format: {other}"
        ))),
    }
}

/// Exports are available to the owning student, the matched supervisor,
/// the assigned lecturer, and admins.
async fn authorize_export(
    state: &AppState,
    user: &AuthUser,
    attachment: &Attachment,
) -> AppResult<()> {
    match user.role {
        Role::Admin => return Ok(()),
        Role::Student if attachment.student_account_id == user.account_id => return Ok(()),
        Role::Supervisor => {
            let supervisor = AccountRepo::resolve_supervisor_for(&state.pool, attachment).await?;
            if supervisor.is_some_and(|a| a.id == user.account_id) {
                return Ok(());
            }
        }
        Role::Lecturer => {
            if let Some(lecturer) = LecturerRepo::find_by_account(&state.pool, user.account_id).await? {
                let year = state.config.current_academic_year();
                let assignment = AssignmentRepo::find_for_student(
                    &state.pool,
                    attachment.student_account_id,
                    year,
                )
                .await?;
                if assignment.is_some_and(|a| a.lecturer_id == lecturer.id) {
                    return Ok(());
                }
            }
        }
        _ => {}
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You do not have access to this logbook".into(),
    )))
}
