//! Handlers for self-service registration and the account profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use intrack_core::error::CoreError;
use intrack_core::types::DbId;
use intrack_core::Role;
use intrack_db::models::account::{AccountResponse, CreateAccount, RoleProfile, UpdateAccount};
use intrack_db::repositories::AccountRepo;
use intrack_events::notifier::EVENT_ACCOUNT_REGISTERED;
use intrack_events::PlatformEvent;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length for self-registration.
const MIN_PASSWORD_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
///
/// Only student and supervisor accounts may self-register. Role-specific
/// fields are required for the matching role and ignored otherwise.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub role: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,

    // Student fields.
    pub student_id: Option<String>,
    pub course: Option<String>,
    pub year_of_study: Option<i32>,
    pub department_id: Option<DbId>,

    // Supervisor fields.
    pub organization: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/accounts/register
///
/// Create a student or supervisor account. Returns 201 with the profile.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AccountResponse>>)> {
    let role = Role::from_name(&input.role)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown role: {}", input.role)))?;
    if !role.is_public() {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{role} accounts are created by an administrator"
        ))));
    }

    validate_required(&input)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LEN)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if input.password != input.password_confirm {
        return Err(AppError::Core(CoreError::Validation(
            "Passwords do not match".into(),
        )));
    }

    // Friendly pre-checks; the unique constraints remain the backstop.
    if AccountRepo::email_exists(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let profile = match role {
        Role::Student => {
            let student_id = require(&input.student_id, "student_id")?;
            if AccountRepo::student_id_taken(&state.pool, &student_id).await? {
                return Err(AppError::Core(CoreError::Conflict(
                    "This student ID is already registered".into(),
                )));
            }
            let year = input
                .year_of_study
                .ok_or_else(|| missing_field("year_of_study"))?;
            if !(1..=6).contains(&year) {
                return Err(AppError::Core(CoreError::Validation(
                    "Year of study must be between 1 and 6".into(),
                )));
            }
            RoleProfile::Student {
                student_id,
                course: require(&input.course, "course")?,
                year_of_study: year,
                department_id: input.department_id,
            }
        }
        Role::Supervisor => RoleProfile::Supervisor {
            organization: require(&input.organization, "organization")?,
            position: require(&input.position, "position")?,
            department: input.department.clone(),
        },
        // Unreachable after the is_public check.
        _ => return Err(AppError::Core(CoreError::Forbidden("Invalid role".into()))),
    };

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let account = AccountRepo::create(
        &state.pool,
        &CreateAccount {
            email: input.email.trim().to_string(),
            password_hash,
            role,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            profile,
        },
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_ACCOUNT_REGISTERED)
            .with_source("account", account.id)
            .with_actor(account.id)
            .with_payload(serde_json::json!({
                "email": account.email,
                "first_name": account.first_name,
                "role": account.role.name(),
            })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: account.into(),
        }),
    ))
}

/// GET /api/v1/accounts/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<AccountResponse>>> {
    let account = AccountRepo::find_by_id(&state.pool, auth_user.account_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "account",
            id: auth_user.account_id,
        }))?;
    Ok(Json(DataResponse {
        data: account.into(),
    }))
}

/// PUT /api/v1/accounts/me
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateAccount>,
) -> AppResult<Json<DataResponse<AccountResponse>>> {
    let account = AccountRepo::update(&state.pool, auth_user.account_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "account",
            id: auth_user.account_id,
        }))?;
    Ok(Json(DataResponse {
        data: account.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_required(input: &RegisterRequest) -> AppResult<()> {
    for (value, name) in [
        (&input.email, "email"),
        (&input.first_name, "first_name"),
        (&input.last_name, "last_name"),
    ] {
        if value.trim().is_empty() {
            return Err(missing_field(name));
        }
    }
    Ok(())
}

fn require(value: &Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(missing_field(name)),
    }
}

fn missing_field(name: &str) -> AppError {
    AppError::Core(CoreError::Validation(format!("{name} is required")))
}
