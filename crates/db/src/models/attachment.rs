//! Attachment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::attachment::{progress, AttachmentStatus, Progress};
use intrack_core::types::{Date, DbId, Timestamp};
use intrack_core::CoreError;

/// Full row from the `attachments` table. `status` is kept as text at this
/// layer; use [`Attachment::status`] for the typed state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub student_account_id: DbId,
    pub organization: String,
    pub department: String,
    pub supervisor_name: String,
    pub supervisor_email: String,
    pub supervisor_phone: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Attachment {
    pub fn status(&self) -> Result<AttachmentStatus, CoreError> {
        AttachmentStatus::parse(&self.status)
    }

    /// Derived progress metrics for the given day; never stored.
    pub fn progress_on(&self, today: Date) -> Result<Progress, CoreError> {
        Ok(progress(today, self.start_date, self.end_date, self.status()?))
    }
}

/// DTO for creating an attachment (status always starts at `pending`).
#[derive(Debug, Deserialize)]
pub struct CreateAttachment {
    pub organization: String,
    #[serde(default)]
    pub department: String,
    pub supervisor_name: String,
    #[serde(default)]
    pub supervisor_email: String,
    #[serde(default)]
    pub supervisor_phone: String,
    pub start_date: Date,
    pub end_date: Date,
}

/// DTO for editing attachment details. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateAttachment {
    pub organization: Option<String>,
    pub department: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_email: Option<String>,
    pub supervisor_phone: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}
