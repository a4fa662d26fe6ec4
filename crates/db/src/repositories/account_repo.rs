//! Repository for the `accounts` table, including credential resolution.

use sqlx::PgPool;

use intrack_core::types::DbId;
use intrack_core::Role;

use crate::models::account::{Account, AccountRow, CreateAccount, RoleProfile, UpdateAccount};
use crate::models::attachment::Attachment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role, first_name, last_name, phone, is_active, \
                       student_id, course, year_of_study, department_id, \
                       organization, position, supervisor_department, staff_id, faculty, \
                       created_at, updated_at";

/// Provides CRUD and lookup operations for accounts.
pub struct AccountRepo;

/// Convert a flat row into the typed account, surfacing corrupt rows as a
/// decode error.
fn decode(row: AccountRow) -> Result<Account, sqlx::Error> {
    Account::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn decode_opt(row: Option<AccountRow>) -> Result<Option<Account>, sqlx::Error> {
    row.map(decode).transpose()
}

impl AccountRepo {
    /// Insert a new account with its role profile, returning the created row.
    /// Generic over the executor so admin flows can run it inside a
    /// transaction alongside the lecturer profile insert.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateAccount,
    ) -> Result<Account, sqlx::Error> {
        let (student_id, course, year_of_study, department_id) = match &input.profile {
            RoleProfile::Student {
                student_id,
                course,
                year_of_study,
                department_id,
            } => (
                Some(student_id.as_str()),
                Some(course.as_str()),
                Some(*year_of_study),
                *department_id,
            ),
            _ => (None, None, None, None),
        };
        let (organization, position, supervisor_department) = match &input.profile {
            RoleProfile::Supervisor {
                organization,
                position,
                department,
            } => (
                Some(organization.as_str()),
                Some(position.as_str()),
                department.as_deref(),
            ),
            _ => (None, None, None),
        };
        let (staff_id, faculty) = match &input.profile {
            RoleProfile::Lecturer { staff_id, faculty } => {
                (Some(staff_id.as_str()), faculty.as_deref())
            }
            _ => (None, None),
        };

        let query = format!(
            "INSERT INTO accounts
                (email, password_hash, role, first_name, last_name, phone,
                 student_id, course, year_of_study, department_id,
                 organization, position, supervisor_department, staff_id, faculty)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.discriminator())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(student_id)
            .bind(course)
            .bind(year_of_study)
            .bind(department_id)
            .bind(organization)
            .bind(position)
            .bind(supervisor_department)
            .bind(staff_id)
            .bind(faculty)
            .fetch_one(executor)
            .await?;
        decode(row)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        decode_opt(row)
    }

    /// Find by email, case-insensitive.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE LOWER(email) = LOWER($1)");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;
        decode_opt(row)
    }

    pub async fn find_by_student_id(
        pool: &PgPool,
        student_id: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE LOWER(student_id) = LOWER($1)");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(student_id)
            .fetch_optional(pool)
            .await?;
        decode_opt(row)
    }

    pub async fn find_by_staff_id(
        pool: &PgPool,
        staff_id: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE LOWER(staff_id) = LOWER($1)");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(staff_id)
            .fetch_optional(pool)
            .await?;
        decode_opt(row)
    }

    /// Resolve a login credential to an account.
    ///
    /// Resolution order: student ID, then staff ID, then email. First match
    /// wins; an account is assumed to carry a value in at most one of these
    /// keyed fields, so cross-field ambiguity is not detected.
    pub async fn resolve_credential(
        pool: &PgPool,
        credential: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        if let Some(account) = Self::find_by_student_id(pool, credential).await? {
            return Ok(Some(account));
        }
        if let Some(account) = Self::find_by_staff_id(pool, credential).await? {
            return Ok(Some(account));
        }
        Self::find_by_email(pool, credential).await
    }

    /// Resolve the supervisor account for an attachment.
    ///
    /// Supervisor identity is an email-equality match against the
    /// attachment's stored `supervisor_email`, not a foreign key. Keep every
    /// supervisor-authorization check going through here so a future
    /// link-by-id migration is a one-place change.
    pub async fn resolve_supervisor_for(
        pool: &PgPool,
        attachment: &Attachment,
    ) -> Result<Option<Account>, sqlx::Error> {
        if attachment.supervisor_email.is_empty() {
            return Ok(None);
        }
        let account = Self::find_by_email(pool, &attachment.supervisor_email).await?;
        Ok(account.filter(|a| a.role == Role::Supervisor))
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn student_id_taken(pool: &PgPool, student_id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(student_id) = LOWER($1))",
        )
        .bind(student_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn staff_id_taken(pool: &PgPool, staff_id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(staff_id) = LOWER($1))",
        )
        .bind(staff_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Update base profile fields. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .fetch_optional(pool)
            .await?;
        decode_opt(row)
    }

    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_role(pool: &PgPool, role: Role) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE role = $1")
            .bind(role.discriminator())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
