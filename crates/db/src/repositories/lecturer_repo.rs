//! Repository for lecturers and their capacity snapshots.

use sqlx::{PgConnection, PgPool};

use intrack_core::assignment::LecturerSlot;
use intrack_core::types::DbId;

use crate::models::lecturer::{Lecturer, LecturerWorkload, UpdateLecturer};

const COLUMNS: &str = "id, account_id, department_id, is_active, max_students, created_at";

/// Joined lecturer + account + per-year assignment count. The subquery keeps
/// the count scoped to one academic year.
const WORKLOAD_QUERY: &str = "SELECT l.id, l.account_id, l.department_id, l.is_active, l.max_students,
            a.first_name, a.last_name, a.email,
            (SELECT COUNT(*) FROM student_assignments sa
             WHERE sa.lecturer_id = l.id AND sa.academic_year = $1) AS assigned_count
     FROM lecturers l
     JOIN accounts a ON a.id = l.account_id";

pub struct LecturerRepo;

impl LecturerRepo {
    /// Insert the lecturer row for an existing account. Account creation and
    /// this insert run in one transaction at the call site.
    pub async fn create(
        conn: &mut PgConnection,
        account_id: DbId,
        department_id: DbId,
        max_students: i32,
    ) -> Result<Lecturer, sqlx::Error> {
        let query = format!(
            "INSERT INTO lecturers (account_id, department_id, max_students)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lecturer>(&query)
            .bind(account_id)
            .bind(department_id)
            .bind(max_students)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lecturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lecturers WHERE id = $1");
        sqlx::query_as::<_, Lecturer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_account(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Option<Lecturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lecturers WHERE account_id = $1");
        sqlx::query_as::<_, Lecturer>(&query)
            .bind(account_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLecturer,
    ) -> Result<Option<Lecturer>, sqlx::Error> {
        let query = format!(
            "UPDATE lecturers SET
                department_id = COALESCE($2, department_id),
                is_active = COALESCE($3, is_active),
                max_students = COALESCE($4, max_students)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lecturer>(&query)
            .bind(id)
            .bind(input.department_id)
            .bind(input.is_active)
            .bind(input.max_students)
            .fetch_optional(pool)
            .await
    }

    /// Workload snapshot of every active lecturer for the admin dashboard.
    pub async fn list_workloads(
        pool: &PgPool,
        academic_year: i32,
    ) -> Result<Vec<LecturerWorkload>, sqlx::Error> {
        let query = format!("{WORKLOAD_QUERY} WHERE l.is_active ORDER BY a.last_name, a.first_name");
        sqlx::query_as::<_, LecturerWorkload>(&query)
            .bind(academic_year)
            .fetch_all(pool)
            .await
    }

    pub async fn workload_by_id(
        pool: &PgPool,
        id: DbId,
        academic_year: i32,
    ) -> Result<Option<LecturerWorkload>, sqlx::Error> {
        let query = format!("{WORKLOAD_QUERY} WHERE l.id = $2");
        sqlx::query_as::<_, LecturerWorkload>(&query)
            .bind(academic_year)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock one lecturer row and return its capacity slot. Runs inside the
    /// assignment transaction so concurrent assigners serialize on the row.
    pub async fn slot_for_update(
        conn: &mut PgConnection,
        lecturer_id: DbId,
        academic_year: i32,
    ) -> Result<Option<LecturerSlot>, sqlx::Error> {
        let row: Option<(DbId, DbId, i32)> = sqlx::query_as(
            "SELECT id, department_id, max_students FROM lecturers
             WHERE id = $1 AND is_active
             FOR UPDATE",
        )
        .bind(lecturer_id)
        .fetch_optional(&mut *conn)
        .await?;
        let Some((id, department_id, max_students)) = row else {
            return Ok(None);
        };
        let (assigned_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM student_assignments
             WHERE lecturer_id = $1 AND academic_year = $2",
        )
        .bind(id)
        .bind(academic_year)
        .fetch_one(conn)
        .await?;
        Ok(Some(LecturerSlot {
            lecturer_id: id,
            department_id,
            assigned_count: assigned_count as i32,
            max_students,
        }))
    }

    /// Lock every active lecturer row (optionally one department's) and
    /// return capacity slots for the auto-assignment planner.
    pub async fn all_slots_for_update(
        conn: &mut PgConnection,
        academic_year: i32,
        department_id: Option<DbId>,
    ) -> Result<Vec<LecturerSlot>, sqlx::Error> {
        // FOR UPDATE OF l leaves the aggregated assignment rows unlocked.
        let rows: Vec<(DbId, DbId, i32, i64)> = sqlx::query_as(
            "SELECT l.id, l.department_id, l.max_students,
                    (SELECT COUNT(*) FROM student_assignments sa
                     WHERE sa.lecturer_id = l.id AND sa.academic_year = $1) AS assigned_count
             FROM lecturers l
             WHERE l.is_active
               AND ($2::BIGINT IS NULL OR l.department_id = $2)
             ORDER BY l.id
             FOR UPDATE OF l",
        )
        .bind(academic_year)
        .bind(department_id)
        .fetch_all(conn)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, department_id, max_students, assigned_count)| LecturerSlot {
                lecturer_id: id,
                department_id,
                assigned_count: assigned_count as i32,
                max_students,
            })
            .collect())
    }

    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lecturers WHERE is_active")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
