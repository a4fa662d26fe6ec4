//! Repository for student-lecturer assignments.

use sqlx::{PgConnection, PgPool};

use intrack_core::assignment::UnassignedStudent;
use intrack_core::types::DbId;
use intrack_core::Role;

use crate::models::assignment::{CreateAssignment, StudentAssignment};

const COLUMNS: &str =
    "id, student_account_id, lecturer_id, academic_year, placement_form_id, created_at";

/// Assignment joined with the student's account fields for lecturer views.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct AssignedStudent {
    pub assignment_id: DbId,
    pub student_account_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_id: Option<String>,
    pub course: Option<String>,
    pub academic_year: i32,
}

pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert inside the assignment transaction. The unique constraint on
    /// `(student_account_id, academic_year)` rejects duplicate assignments.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateAssignment,
    ) -> Result<StudentAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO student_assignments
                (student_account_id, lecturer_id, academic_year, placement_form_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentAssignment>(&query)
            .bind(input.student_account_id)
            .bind(input.lecturer_id)
            .bind(input.academic_year)
            .bind(input.placement_form_id)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StudentAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_assignments WHERE id = $1");
        sqlx::query_as::<_, StudentAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_student(
        pool: &PgPool,
        student_account_id: DbId,
        academic_year: i32,
    ) -> Result<Option<StudentAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM student_assignments
             WHERE student_account_id = $1 AND academic_year = $2"
        );
        sqlx::query_as::<_, StudentAssignment>(&query)
            .bind(student_account_id)
            .bind(academic_year)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_for_year(
        conn: &mut PgConnection,
        student_account_id: DbId,
        academic_year: i32,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM student_assignments
             WHERE student_account_id = $1 AND academic_year = $2)",
        )
        .bind(student_account_id)
        .bind(academic_year)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM student_assignments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Students assigned to one lecturer for a year, with account details.
    pub async fn list_students_for_lecturer(
        pool: &PgPool,
        lecturer_id: DbId,
        academic_year: i32,
    ) -> Result<Vec<AssignedStudent>, sqlx::Error> {
        sqlx::query_as::<_, AssignedStudent>(
            "SELECT sa.id AS assignment_id, sa.student_account_id,
                    a.first_name, a.last_name, a.email, a.student_id, a.course,
                    sa.academic_year
             FROM student_assignments sa
             JOIN accounts a ON a.id = sa.student_account_id
             WHERE sa.lecturer_id = $1 AND sa.academic_year = $2
             ORDER BY a.last_name, a.first_name",
        )
        .bind(lecturer_id)
        .bind(academic_year)
        .fetch_all(pool)
        .await
    }

    /// Students with no assignment for the year, as planner input. The
    /// department comes from the student's account profile.
    /// Unassigned active students for one academic year, optionally limited
    /// to a single department.
    pub async fn list_unassigned_students(
        conn: &mut PgConnection,
        academic_year: i32,
        department_id: Option<DbId>,
    ) -> Result<Vec<UnassignedStudent>, sqlx::Error> {
        let rows: Vec<(DbId, Option<DbId>)> = sqlx::query_as(
            "SELECT a.id, a.department_id
             FROM accounts a
             WHERE a.role = $1 AND a.is_active
               AND ($3::BIGINT IS NULL OR a.department_id = $3)
               AND NOT EXISTS (SELECT 1 FROM student_assignments sa
                               WHERE sa.student_account_id = a.id AND sa.academic_year = $2)
             ORDER BY a.id",
        )
        .bind(Role::Student.discriminator())
        .bind(academic_year)
        .bind(department_id)
        .fetch_all(conn)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(account_id, department_id)| UnassignedStudent {
                account_id,
                department_id,
            })
            .collect())
    }

    pub async fn count_for_year(pool: &PgPool, academic_year: i32) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM student_assignments WHERE academic_year = $1")
                .bind(academic_year)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
