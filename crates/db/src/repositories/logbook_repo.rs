//! Repository for daily logbook entries.

use sqlx::PgPool;

use intrack_core::types::{Date, DbId};

use crate::models::logbook_entry::{CreateLogbookEntry, LogbookEntry, UpdateLogbookEntry};

const COLUMNS: &str = "id, attachment_id, entry_date, department_section, tasks, skills_learned, \
                       achievements, challenges, hours_worked, supervisor_comments, edit_count, \
                       created_at, updated_at";

/// Aggregate figures for a student's logbook, shown on dashboards.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct LogbookStats {
    pub total_entries: i64,
    pub total_hours: f64,
    pub reviewed_entries: i64,
}

pub struct LogbookRepo;

impl LogbookRepo {
    /// Insert the entry for a given date. The unique constraint on
    /// `(attachment_id, entry_date)` enforces one entry per day.
    pub async fn create(
        pool: &PgPool,
        attachment_id: DbId,
        entry_date: Date,
        input: &CreateLogbookEntry,
    ) -> Result<LogbookEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO logbook_entries
                (attachment_id, entry_date, department_section, tasks, skills_learned,
                 achievements, challenges, hours_worked)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LogbookEntry>(&query)
            .bind(attachment_id)
            .bind(entry_date)
            .bind(&input.department_section)
            .bind(&input.tasks)
            .bind(&input.skills_learned)
            .bind(&input.achievements)
            .bind(&input.challenges)
            .bind(input.hours_worked)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LogbookEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM logbook_entries WHERE id = $1");
        sqlx::query_as::<_, LogbookEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_date(
        pool: &PgPool,
        attachment_id: DbId,
        entry_date: Date,
    ) -> Result<Option<LogbookEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM logbook_entries WHERE attachment_id = $1 AND entry_date = $2");
        sqlx::query_as::<_, LogbookEntry>(&query)
            .bind(attachment_id)
            .bind(entry_date)
            .fetch_optional(pool)
            .await
    }

    /// All entries for an attachment, newest first. `id DESC` breaks ties so
    /// the order is total.
    pub async fn list_for_attachment(
        pool: &PgPool,
        attachment_id: DbId,
    ) -> Result<Vec<LogbookEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM logbook_entries
             WHERE attachment_id = $1
             ORDER BY entry_date DESC, id DESC"
        );
        sqlx::query_as::<_, LogbookEntry>(&query)
            .bind(attachment_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a student edit, bumping `edit_count`. The handler checks the
    /// edit cap before calling this.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLogbookEntry,
    ) -> Result<Option<LogbookEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE logbook_entries SET
                department_section = COALESCE($2, department_section),
                tasks = COALESCE($3, tasks),
                skills_learned = COALESCE($4, skills_learned),
                achievements = COALESCE($5, achievements),
                challenges = COALESCE($6, challenges),
                hours_worked = COALESCE($7, hours_worked),
                edit_count = edit_count + 1,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LogbookEntry>(&query)
            .bind(id)
            .bind(&input.department_section)
            .bind(&input.tasks)
            .bind(&input.skills_learned)
            .bind(&input.achievements)
            .bind(&input.challenges)
            .bind(input.hours_worked)
            .fetch_optional(pool)
            .await
    }

    /// Supervisor feedback does not count against the student's edit cap.
    pub async fn set_supervisor_comments(
        pool: &PgPool,
        id: DbId,
        comments: &str,
    ) -> Result<Option<LogbookEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE logbook_entries SET supervisor_comments = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LogbookEntry>(&query)
            .bind(id)
            .bind(comments)
            .fetch_optional(pool)
            .await
    }

    pub async fn stats_for_attachment(
        pool: &PgPool,
        attachment_id: DbId,
    ) -> Result<LogbookStats, sqlx::Error> {
        sqlx::query_as::<_, LogbookStats>(
            "SELECT COUNT(*) AS total_entries,
                    COALESCE(SUM(hours_worked), 0)::DOUBLE PRECISION AS total_hours,
                    COUNT(*) FILTER (WHERE supervisor_comments <> '') AS reviewed_entries
             FROM logbook_entries WHERE attachment_id = $1",
        )
        .bind(attachment_id)
        .fetch_one(pool)
        .await
    }
}
