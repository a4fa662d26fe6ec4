use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::types::DbId;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub university: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    #[serde(default)]
    pub university: String,
}
