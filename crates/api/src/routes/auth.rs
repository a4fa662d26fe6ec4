//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login         -> login (public)
/// POST /refresh       -> refresh (public)
/// POST /logout        -> logout (requires auth)
/// GET  /availability  -> email/student-id/staff-id availability (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/availability", get(auth::availability))
}
