//! Repository for uploaded report metadata.

use sqlx::PgPool;

use intrack_core::types::DbId;

use crate::models::report::{CreateReport, Report};

const COLUMNS: &str =
    "id, attachment_id, student_account_id, file_name, stored_path, version, uploaded_at";

pub struct ReportRepo;

impl ReportRepo {
    pub async fn create(pool: &PgPool, input: &CreateReport) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (attachment_id, student_account_id, file_name, stored_path, version)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(input.attachment_id)
            .bind(input.student_account_id)
            .bind(&input.file_name)
            .bind(&input.stored_path)
            .bind(&input.version)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Uploads for an attachment, newest first.
    pub async fn list_for_attachment(
        pool: &PgPool,
        attachment_id: DbId,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports
             WHERE attachment_id = $1
             ORDER BY uploaded_at DESC, id DESC"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(attachment_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_attachment(
        pool: &PgPool,
        attachment_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM reports WHERE attachment_id = $1")
                .bind(attachment_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Version label of the most recent upload, if any.
    pub async fn latest_version(
        pool: &PgPool,
        attachment_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT version FROM reports
             WHERE attachment_id = $1
             ORDER BY uploaded_at DESC, id DESC
             LIMIT 1",
        )
        .bind(attachment_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(v,)| v))
    }
}
