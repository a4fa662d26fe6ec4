pub mod accounts;
pub mod admin;
pub mod attachments;
pub mod auth;
pub mod departments;
pub mod health;
pub mod lecturer;
pub mod logbook;
pub mod placements;
pub mod reports;
pub mod supervisor;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
/// /auth/availability                        credential availability (public)
///
/// /accounts/register                        self-registration (public)
/// /accounts/me                              profile get, update
///
/// /attachments                              create (student)
/// /attachments/me                           get, update own attachment
/// /attachments/{id}/status                  lifecycle action (POST)
/// /attachments/{id}/export/{format}         logbook export (csv, json)
/// /attachments/{id}/evaluations             evaluation summary (GET)
/// /attachments/{id}/evaluations/supervisor  supervisor evaluation (PUT)
/// /attachments/{id}/evaluations/lecturer    lecturer evaluation (PUT)
/// /attachments/{id}/final-assessment        final grade (POST, lecturer)
///
/// /logbook/entries                          create, list (student)
/// /logbook/entries/{id}                     get, update
/// /logbook/entries/{id}/comment             supervisor comment (POST)
///
/// /supervisor/attachments                   supervised attachments (GET)
/// /supervisor/attachments/{id}/logbook      supervised logbook (GET)
///
/// /placements                               submit form (POST, student)
/// /placements/me                            own form (GET)
///
/// /reports                                  upload (POST, multipart), list (GET)
///
/// /lecturer/students                        assigned students (GET)
///
/// /admin/dashboard                          platform stats (GET)
/// /admin/lecturers                          list, create
/// /admin/lecturers/{id}                     update (PUT)
/// /admin/assignments                        manual assign (POST)
/// /admin/assignments/bulk                   bulk assign (POST)
/// /admin/assignments/auto                   auto-assignment run (POST)
/// /admin/assignments/{id}                   unassign (DELETE)
/// /admin/placements                         placement forms (GET)
///
/// /departments                              list, create (POST admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout, availability).
        .nest("/auth", auth::router())
        // Account registration and profile.
        .nest("/accounts", accounts::router())
        // Attachment lifecycle, exports, and evaluations.
        .nest("/attachments", attachments::router())
        // Daily logbook.
        .nest("/logbook", logbook::router())
        // Supervisor portal.
        .nest("/supervisor", supervisor::router())
        // Placement intake forms.
        .nest("/placements", placements::router())
        // Report uploads.
        .nest("/reports", reports::router())
        // Lecturer portal.
        .nest("/lecturer", lecturer::router())
        // Admin portal.
        .nest("/admin", admin::router())
        // Departments.
        .nest("/departments", departments::router())
}
