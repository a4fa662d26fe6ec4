//! Lecturer model: wraps an account with department and capacity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lecturer {
    pub id: DbId,
    pub account_id: DbId,
    pub department_id: DbId,
    pub is_active: bool,
    pub max_students: i32,
    pub created_at: Timestamp,
}

/// Lecturer joined with workload counts for the admin dashboard and the
/// assignment engine snapshot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LecturerWorkload {
    pub id: DbId,
    pub account_id: DbId,
    pub department_id: DbId,
    pub is_active: bool,
    pub max_students: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub assigned_count: i64,
}

impl LecturerWorkload {
    pub fn available_slots(&self) -> i64 {
        (self.max_students as i64 - self.assigned_count).max(0)
    }
}

/// Admin request to create a lecturer (account + lecturer row).
#[derive(Debug, Deserialize)]
pub struct CreateLecturer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub staff_id: String,
    pub department_id: DbId,
    #[serde(default)]
    pub phone: String,
    pub faculty: Option<String>,
    pub max_students: Option<i32>,
}

/// Admin update of lecturer capacity/state.
#[derive(Debug, Deserialize)]
pub struct UpdateLecturer {
    pub department_id: Option<DbId>,
    pub is_active: Option<bool>,
    pub max_students: Option<i32>,
}
