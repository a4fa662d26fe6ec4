//! Route definitions for the `/logbook` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::logbook;
use crate::state::AppState;

/// Routes mounted at `/logbook`.
///
/// ```text
/// POST /entries               -> create today's entry (student)
/// GET  /entries               -> own entries + stats (student)
/// GET  /entries/{id}          -> one entry (student or supervisor)
/// PUT  /entries/{id}          -> edit, capped at two edits (student)
/// POST /entries/{id}/comment  -> supervisor feedback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/entries",
            post(logbook::create_entry).get(logbook::list_entries),
        )
        .route(
            "/entries/{id}",
            get(logbook::get_entry).put(logbook::update_entry),
        )
        .route("/entries/{id}/comment", post(logbook::comment_entry))
}
