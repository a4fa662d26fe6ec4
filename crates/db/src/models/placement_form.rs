//! Placement intake form model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlacementForm {
    pub id: DbId,
    pub student_account_id: DbId,
    pub cycle_year: i32,
    pub firm_name: String,
    pub firm_address: String,
    pub supervisor_name: String,
    pub supervisor_email: String,
    pub supervisor_phone: String,
    pub off_days: String,
    pub department_id: Option<DbId>,
    pub status: String,
    pub submitted_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlacementForm {
    pub firm_name: String,
    #[serde(default)]
    pub firm_address: String,
    #[serde(default)]
    pub supervisor_name: String,
    #[serde(default)]
    pub supervisor_email: String,
    #[serde(default)]
    pub supervisor_phone: String,
    #[serde(default)]
    pub off_days: String,
    pub department_id: Option<DbId>,
}
