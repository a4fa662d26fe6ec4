//! Route definitions for the `/accounts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// ```text
/// POST /register  -> self-registration (student/supervisor only)
/// GET  /me        -> authenticated account profile
/// PUT  /me        -> update base profile fields
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(accounts::register))
        .route("/me", get(accounts::me).put(accounts::update_me))
}
