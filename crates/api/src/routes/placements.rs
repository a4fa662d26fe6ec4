//! Route definitions for the `/placements` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::placements;
use crate::state::AppState;

/// Routes mounted at `/placements`.
///
/// ```text
/// POST /    -> submit placement form for the current cycle (student)
/// GET  /me  -> own form for the current cycle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(placements::submit))
        .route("/me", get(placements::my_placement))
}
