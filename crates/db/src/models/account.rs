//! Account entity: a base identity plus exactly one role profile.
//!
//! The `accounts` table stores role-specific columns flat and nullable;
//! this module converts a flat row into the [`Account`]/[`RoleProfile`]
//! tagged union so exactly one profile variant is ever populated.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use intrack_core::types::{DbId, Timestamp};
use intrack_core::{CoreError, Role};

/// Flat row shape of the `accounts` table, as fetched by sqlx.
///
/// Contains the password hash -- never serialize this to API responses.
/// Convert to [`Account`] (and [`AccountResponse`]) for external use.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub role: i16,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub student_id: Option<String>,
    pub course: Option<String>,
    pub year_of_study: Option<i32>,
    pub department_id: Option<DbId>,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub supervisor_department: Option<String>,
    pub staff_id: Option<String>,
    pub faculty: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Role-specific profile data; the discriminator selects the variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoleProfile {
    Student {
        student_id: String,
        course: String,
        year_of_study: i32,
        department_id: Option<DbId>,
    },
    Supervisor {
        organization: String,
        position: String,
        department: Option<String>,
    },
    Lecturer {
        staff_id: String,
        faculty: Option<String>,
    },
    Admin,
}

/// A fully-typed account: base identity + exactly one role profile.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub profile: RoleProfile,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<AccountRow> for Account {
    type Error = CoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = Role::try_from(row.role)?;
        let profile = match role {
            Role::Student => RoleProfile::Student {
                student_id: row.student_id.ok_or_else(|| {
                    CoreError::Internal(format!("account {} missing student_id", row.id))
                })?,
                course: row.course.unwrap_or_default(),
                year_of_study: row.year_of_study.unwrap_or(1),
                department_id: row.department_id,
            },
            Role::Supervisor => RoleProfile::Supervisor {
                organization: row.organization.unwrap_or_default(),
                position: row.position.unwrap_or_default(),
                department: row.supervisor_department,
            },
            Role::Lecturer => RoleProfile::Lecturer {
                staff_id: row.staff_id.ok_or_else(|| {
                    CoreError::Internal(format!("account {} missing staff_id", row.id))
                })?,
                faculty: row.faculty,
            },
            Role::Admin => RoleProfile::Admin,
        };
        Ok(Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            is_active: row.is_active,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Safe account representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: DbId,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
    pub profile: RoleProfile,
    pub created_at: Timestamp,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        AccountResponse {
            id: account.id,
            email: account.email,
            role: account.role,
            first_name: account.first_name,
            last_name: account.last_name,
            phone: account.phone,
            is_active: account.is_active,
            profile: account.profile,
            created_at: account.created_at,
        }
    }
}

/// DTO for inserting a new account. The caller supplies an already-hashed
/// password and a profile matching `role`.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub profile: RoleProfile,
}

/// DTO for updating base profile fields. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateAccount {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}
