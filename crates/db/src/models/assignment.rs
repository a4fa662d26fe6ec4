//! Student-lecturer assignment model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentAssignment {
    pub id: DbId,
    pub student_account_id: DbId,
    pub lecturer_id: DbId,
    pub academic_year: i32,
    pub placement_form_id: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub student_account_id: DbId,
    pub lecturer_id: DbId,
    pub academic_year: i32,
    pub placement_form_id: Option<DbId>,
}

/// One explicit (student, lecturer) pairing in a manual/bulk request.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentPairing {
    pub student_account_id: DbId,
    pub lecturer_id: DbId,
}
