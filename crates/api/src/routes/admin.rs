//! Route definitions for the admin portal.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin` (all require the admin role).
///
/// ```text
/// GET    /dashboard          -> aggregate platform stats
/// GET    /lecturers          -> lecturer workloads
/// POST   /lecturers          -> create lecturer with generated credentials
/// PUT    /lecturers/{id}     -> update capacity/department/state
/// POST   /assignments        -> manual single assignment
/// POST   /assignments/bulk   -> explicit pairings, per-item outcomes
/// POST   /assignments/auto   -> auto-assignment run
/// DELETE /assignments/{id}   -> unassign
/// GET    /placements         -> placement forms (?department_id)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route(
            "/lecturers",
            get(admin::list_lecturers).post(admin::create_lecturer),
        )
        .route("/lecturers/{id}", put(admin::update_lecturer))
        .route("/assignments", post(admin::assign_student))
        .route("/assignments/bulk", post(admin::bulk_assign))
        .route("/assignments/auto", post(admin::auto_assign))
        .route("/assignments/{id}", delete(admin::unassign))
        .route("/placements", get(admin::list_placements))
}
