//! Repository for academic departments.

use sqlx::PgPool;

use intrack_core::types::DbId;

use crate::models::department::{CreateDepartment, Department};

pub struct DepartmentRepo;

impl DepartmentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDepartment,
    ) -> Result<Department, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, university)
             VALUES ($1, $2)
             RETURNING id, name, university",
        )
        .bind(&input.name)
        .bind(&input.university)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Department>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            "SELECT id, name, university FROM departments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            "SELECT id, name, university FROM departments ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }
}
