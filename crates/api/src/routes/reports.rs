//! Route definitions for the `/reports` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// POST /  -> upload a report file (multipart, student)
/// GET  /  -> own uploads, newest first
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(reports::upload).get(reports::list))
}
