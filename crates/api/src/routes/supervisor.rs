//! Route definitions for the supervisor portal.

use axum::routing::get;
use axum::Router;

use crate::handlers::{attachments, logbook};
use crate::state::AppState;

/// Routes mounted at `/supervisor`.
///
/// ```text
/// GET /attachments               -> attachments naming this supervisor
/// GET /attachments/{id}/logbook  -> a supervised student's logbook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attachments", get(attachments::supervisor_attachments))
        .route(
            "/attachments/{id}/logbook",
            get(logbook::supervisor_list_entries),
        )
}
