//! Logbook entry model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::types::{Date, DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogbookEntry {
    pub id: DbId,
    pub attachment_id: DbId,
    pub entry_date: Date,
    pub department_section: String,
    pub tasks: String,
    pub skills_learned: String,
    pub achievements: String,
    pub challenges: String,
    pub hours_worked: f64,
    pub supervisor_comments: String,
    pub edit_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a new daily entry. The entry date is forced to "today" by the
/// handler, so it is not part of the request body.
#[derive(Debug, Deserialize)]
pub struct CreateLogbookEntry {
    pub department_section: String,
    pub tasks: String,
    pub skills_learned: String,
    #[serde(default)]
    pub achievements: String,
    #[serde(default)]
    pub challenges: String,
    pub hours_worked: f64,
}

/// DTO for a student edit of an existing entry.
#[derive(Debug, Deserialize)]
pub struct UpdateLogbookEntry {
    pub department_section: Option<String>,
    pub tasks: Option<String>,
    pub skills_learned: Option<String>,
    pub achievements: Option<String>,
    pub challenges: Option<String>,
    pub hours_worked: Option<f64>,
}
