//! Report upload metadata model.

use serde::Serialize;
use sqlx::FromRow;

use intrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub attachment_id: DbId,
    pub student_account_id: DbId,
    pub file_name: String,
    pub stored_path: String,
    pub version: String,
    pub uploaded_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateReport {
    pub attachment_id: DbId,
    pub student_account_id: DbId,
    pub file_name: String,
    pub stored_path: String,
    pub version: String,
}
