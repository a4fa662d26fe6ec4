//! Repository for attachment placements.

use sqlx::PgPool;

use intrack_core::attachment::AttachmentStatus;
use intrack_core::types::DbId;

use crate::models::attachment::{Attachment, CreateAttachment, UpdateAttachment};

const COLUMNS: &str = "id, student_account_id, organization, department, supervisor_name, \
                       supervisor_email, supervisor_phone, start_date, end_date, status, \
                       created_at, updated_at";

pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Insert a new attachment in `pending` state. The unique constraint on
    /// `student_account_id` enforces one attachment per student.
    pub async fn create(
        pool: &PgPool,
        student_account_id: DbId,
        input: &CreateAttachment,
    ) -> Result<Attachment, sqlx::Error> {
        let query = format!(
            "INSERT INTO attachments
                (student_account_id, organization, department, supervisor_name,
                 supervisor_email, supervisor_phone, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(student_account_id)
            .bind(&input.organization)
            .bind(&input.department)
            .bind(&input.supervisor_name)
            .bind(&input.supervisor_email)
            .bind(&input.supervisor_phone)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(AttachmentStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachments WHERE id = $1");
        sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_student(
        pool: &PgPool,
        student_account_id: DbId,
    ) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachments WHERE student_account_id = $1");
        sqlx::query_as::<_, Attachment>(&query)
            .bind(student_account_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a detail edit. Only non-`None` fields change.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAttachment,
    ) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!(
            "UPDATE attachments SET
                organization = COALESCE($2, organization),
                department = COALESCE($3, department),
                supervisor_name = COALESCE($4, supervisor_name),
                supervisor_email = COALESCE($5, supervisor_email),
                supervisor_phone = COALESCE($6, supervisor_phone),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .bind(&input.organization)
            .bind(&input.department)
            .bind(&input.supervisor_name)
            .bind(&input.supervisor_email)
            .bind(&input.supervisor_phone)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Persist a status transition. Legality is validated in the handler
    /// before calling this.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: AttachmentStatus,
    ) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!(
            "UPDATE attachments SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// All attachments naming the given supervisor email, newest first.
    pub async fn list_by_supervisor_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attachments
             WHERE LOWER(supervisor_email) = LOWER($1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_status(pool: &PgPool, status: AttachmentStatus) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attachments WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
