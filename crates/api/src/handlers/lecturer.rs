//! Handlers for the lecturer portal.

use axum::extract::State;
use axum::Json;

use intrack_core::error::CoreError;
use intrack_db::repositories::assignment_repo::AssignedStudent;
use intrack_db::repositories::{AssignmentRepo, LecturerRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireLecturer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/lecturer/students
///
/// The lecturer's assigned students for the current academic year.
pub async fn my_students(
    State(state): State<AppState>,
    RequireLecturer(user): RequireLecturer,
) -> AppResult<Json<DataResponse<Vec<AssignedStudent>>>> {
    let lecturer = LecturerRepo::find_by_account(&state.pool, user.account_id)
        .await?
        .ok_or(AppError::Core(CoreError::Forbidden(
            "No lecturer profile is linked to this account".into(),
        )))?;
    let year = state.config.current_academic_year();
    let students =
        AssignmentRepo::list_students_for_lecturer(&state.pool, lecturer.id, year).await?;
    Ok(Json(DataResponse { data: students }))
}
