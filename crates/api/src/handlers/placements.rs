//! Handlers for placement intake forms.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use intrack_core::error::CoreError;
use intrack_db::models::placement_form::{CreatePlacementForm, PlacementForm};
use intrack_db::repositories::PlacementRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStudent;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/placements
///
/// Submit the placement form for the current cycle. One form per student
/// per cycle year; a duplicate submission is a friendly conflict with the
/// unique constraint as backstop.
pub async fn submit(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
    Json(input): Json<CreatePlacementForm>,
) -> AppResult<(StatusCode, Json<DataResponse<PlacementForm>>)> {
    if input.firm_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Firm name is required".into(),
        )));
    }

    let cycle_year = state.config.current_academic_year();
    if PlacementRepo::find_for_cycle(&state.pool, user.account_id, cycle_year)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "You have already submitted a placement form for {cycle_year}"
        ))));
    }

    let form = PlacementRepo::create(&state.pool, user.account_id, cycle_year, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// GET /api/v1/placements/me
pub async fn my_placement(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
) -> AppResult<Json<DataResponse<PlacementForm>>> {
    let cycle_year = state.config.current_academic_year();
    let form = PlacementRepo::find_for_cycle(&state.pool, user.account_id, cycle_year)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "placement form",
            id: user.account_id,
        }))?;
    Ok(Json(DataResponse { data: form }))
}
