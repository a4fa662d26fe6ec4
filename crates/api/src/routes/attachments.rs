//! Route definitions for the `/attachments` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{attachments, evaluations, exports};
use crate::state::AppState;

/// Routes mounted at `/attachments`.
///
/// ```text
/// POST /                              -> create (student)
/// GET  /me                            -> own attachment with progress
/// PUT  /me                            -> edit while pending/approved
/// POST /{id}/status                   -> lifecycle action
/// GET  /{id}/export/{format}          -> logbook export (csv, json)
/// GET  /{id}/evaluations              -> evaluation summary
/// PUT  /{id}/evaluations/supervisor   -> supervisor evaluation upsert
/// PUT  /{id}/evaluations/lecturer     -> lecturer evaluation upsert
/// POST /{id}/final-assessment         -> derive final grade (lecturer)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(attachments::create))
        .route(
            "/me",
            get(attachments::my_attachment).put(attachments::update_my_attachment),
        )
        .route("/{id}/status", post(attachments::set_status))
        .route("/{id}/export/{format}", get(exports::export_logbook))
        .route("/{id}/evaluations", get(evaluations::get_evaluations))
        .route(
            "/{id}/evaluations/supervisor",
            put(evaluations::upsert_supervisor),
        )
        .route(
            "/{id}/evaluations/lecturer",
            put(evaluations::upsert_lecturer),
        )
        .route("/{id}/final-assessment", post(evaluations::finalize))
}
