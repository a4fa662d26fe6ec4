//! Route definitions for the lecturer portal.

use axum::routing::get;
use axum::Router;

use crate::handlers::lecturer;
use crate::state::AppState;

/// Routes mounted at `/lecturer`.
///
/// ```text
/// GET /students  -> assigned students for the current academic year
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/students", get(lecturer::my_students))
}
