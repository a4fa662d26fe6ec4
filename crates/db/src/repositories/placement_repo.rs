//! Repository for placement intake forms.

use sqlx::PgPool;

use intrack_core::types::DbId;

use crate::models::placement_form::{CreatePlacementForm, PlacementForm};

const COLUMNS: &str = "id, student_account_id, cycle_year, firm_name, firm_address, \
                       supervisor_name, supervisor_email, supervisor_phone, off_days, \
                       department_id, status, submitted_at";

pub struct PlacementRepo;

impl PlacementRepo {
    /// Insert a placement form for a cycle year. The unique constraint on
    /// `(student_account_id, cycle_year)` enforces one form per student per
    /// cycle.
    pub async fn create(
        pool: &PgPool,
        student_account_id: DbId,
        cycle_year: i32,
        input: &CreatePlacementForm,
    ) -> Result<PlacementForm, sqlx::Error> {
        let query = format!(
            "INSERT INTO placement_forms
                (student_account_id, cycle_year, firm_name, firm_address,
                 supervisor_name, supervisor_email, supervisor_phone, off_days, department_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlacementForm>(&query)
            .bind(student_account_id)
            .bind(cycle_year)
            .bind(&input.firm_name)
            .bind(&input.firm_address)
            .bind(&input.supervisor_name)
            .bind(&input.supervisor_email)
            .bind(&input.supervisor_phone)
            .bind(&input.off_days)
            .bind(input.department_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PlacementForm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM placement_forms WHERE id = $1");
        sqlx::query_as::<_, PlacementForm>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_cycle(
        pool: &PgPool,
        student_account_id: DbId,
        cycle_year: i32,
    ) -> Result<Option<PlacementForm>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM placement_forms
             WHERE student_account_id = $1 AND cycle_year = $2"
        );
        sqlx::query_as::<_, PlacementForm>(&query)
            .bind(student_account_id)
            .bind(cycle_year)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_department(
        pool: &PgPool,
        department_id: DbId,
        cycle_year: i32,
    ) -> Result<Vec<PlacementForm>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM placement_forms
             WHERE department_id = $1 AND cycle_year = $2
             ORDER BY submitted_at DESC"
        );
        sqlx::query_as::<_, PlacementForm>(&query)
            .bind(department_id)
            .bind(cycle_year)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_cycle(
        pool: &PgPool,
        cycle_year: i32,
    ) -> Result<Vec<PlacementForm>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM placement_forms
             WHERE cycle_year = $1
             ORDER BY submitted_at DESC"
        );
        sqlx::query_as::<_, PlacementForm>(&query)
            .bind(cycle_year)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_cycle(pool: &PgPool, cycle_year: i32) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM placement_forms WHERE cycle_year = $1")
                .bind(cycle_year)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
