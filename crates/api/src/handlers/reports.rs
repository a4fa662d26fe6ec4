//! Handlers for final report uploads.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use intrack_core::error::CoreError;
use intrack_core::reports::{check_upload_cap, next_version, validate_file_name};
use intrack_db::models::report::{CreateReport, Report};
use intrack_db::repositories::ReportRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::logbook::require_own_attachment;
use crate::middleware::rbac::RequireStudent;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upload outcome. `warning` is set when the file could not be stored; the
/// upload then carries no metadata row and should be retried.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub report: Option<Report>,
    pub warning: Option<String>,
}

/// POST /api/v1/reports (multipart)
///
/// Upload a report file for the student's attachment. Extensions are
/// whitelisted (pdf/doc/docx) and the per-attachment count is capped by
/// configuration. Version labels auto-increment ("Final v1.0", "Final
/// v1.1", ...).
pub async fn upload(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResponse>>)> {
    let attachment = require_own_attachment(&state, user.account_id).await?;

    // Pull the first field named "file".
    let mut file_name: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
                    .to_vec(),
            );
            break;
        }
    }
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;
    let bytes = bytes.ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Uploaded file is empty".into(),
        )));
    }

    validate_file_name(&file_name).map_err(AppError::Core)?;

    let existing = ReportRepo::count_for_attachment(&state.pool, attachment.id).await?;
    check_upload_cap(existing as u32, state.config.report_max_uploads as u32)
        .map_err(AppError::Core)?;

    let latest = ReportRepo::latest_version(&state.pool, attachment.id).await?;
    let version = next_version(latest.as_deref());

    // Store the file first; metadata is only written for files that made it
    // to disk. A storage failure is reported as a warning, not a 500.
    let stored_path = format!(
        "{}/{}_{}_{}",
        state.config.upload_dir,
        attachment.id,
        Uuid::new_v4(),
        sanitize_file_name(&file_name)
    );
    if let Err(e) = store_file(&state.config.upload_dir, &stored_path, &bytes).await {
        tracing::warn!(error = %e, path = stored_path, "Failed to store report file");
        return Ok((
            StatusCode::OK,
            Json(DataResponse {
                data: UploadResponse {
                    report: None,
                    warning: Some("Failed to store the report file; please try again".into()),
                },
            }),
        ));
    }

    let report = ReportRepo::create(
        &state.pool,
        &CreateReport {
            attachment_id: attachment.id,
            student_account_id: user.account_id,
            file_name,
            stored_path,
            version,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadResponse {
                report: Some(report),
                warning: None,
            },
        }),
    ))
}

/// GET /api/v1/reports
///
/// The student's uploads, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    let attachment = require_own_attachment(&state, user.account_id).await?;
    let reports = ReportRepo::list_for_attachment(&state.pool, attachment.id).await?;
    Ok(Json(DataResponse { data: reports }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn store_file(dir: &str, path: &str, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, bytes).await
}

/// Keep only filesystem-safe characters from a client-supplied file name.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
