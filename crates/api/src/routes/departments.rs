//! Route definitions for the `/departments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::departments;
use crate::state::AppState;

/// Routes mounted at `/departments`.
///
/// ```text
/// GET  /  -> list (any authenticated role)
/// POST /  -> create (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(departments::list).post(departments::create))
}
