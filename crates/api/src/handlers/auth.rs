//! Handlers for the `/auth` resource (login, refresh, logout, availability).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use intrack_core::error::CoreError;
use intrack_core::types::DbId;
use intrack_core::Role;
use intrack_db::models::account::Account;
use intrack_db::models::session::CreateSession;
use intrack_db::repositories::{AccountRepo, SessionRepo};

use crate::auth::jwt::{mint_refresh_token, refresh_token_digest};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
///
/// `credential` is a student ID, staff ID, or email. `role` is an optional
/// hint naming the portal the client signed in from; a resolved account with
/// a different role is rejected with a distinct error so the frontend can
/// redirect to the right portal.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub credential: String,
    pub password: String,
    pub role: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Where the frontend should send this account after login.
    pub landing_route: &'static str,
    pub user: UserInfo,
}

/// Public account info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Query for `GET /auth/availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// One of `email`, `student_id`, `staff_id`.
    pub field: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with a student ID, staff ID, or email plus password.
/// Returns access and refresh tokens and the role's landing route.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Resolve the credential: student ID, then staff ID, then email.
    let account = AccountRepo::resolve_credential(&state.pool, &input.credential)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    // 2. Verify the password before disclosing anything about the account.
    // A caller without the password must not learn whether the account is
    // disabled or which role it carries.
    let password_valid = verify_password(&input.password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    // 3. Disabled accounts are reported as such, not as bad credentials.
    if !account.is_active {
        return Err(AppError::AccountDisabled("Account disabled".into()));
    }

    // 4. Role hint mismatch is its own error, never folded into 401.
    if let Some(expected) = &input.role {
        let expected_role = Role::from_name(expected)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown role: {expected}")))?;
        if account.role != expected_role {
            return Err(AppError::RoleMismatch(format!(
                "This account is a {} account; use the {} portal",
                account.role,
                account.role.landing_route()
            )));
        }
    }

    // 5. Generate tokens and create a session.
    let response = create_auth_response(&state, &account).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = refresh_token_digest(&input.refresh_token);

    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Token rotation: the old session dies with this exchange.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let account = AccountRepo::find_by_id(&state.pool, session.account_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    if !account.is_active {
        return Err(AppError::AccountDisabled("Account disabled".into()));
    }

    let response = create_auth_response(&state, &account).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated account. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_account(&state.pool, auth_user.account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/availability?field=student_id&value=S123
///
/// Pre-registration check for globally unique identity fields.
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let taken = match query.field.as_str() {
        "email" => AccountRepo::email_exists(&state.pool, &query.value).await?,
        "student_id" => AccountRepo::student_id_taken(&state.pool, &query.value).await?,
        "staff_id" => AccountRepo::staff_id_taken(&state.pool, &query.value).await?,
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown availability field: {other}"
            )))
        }
    };
    Ok(Json(AvailabilityResponse { available: !taken }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the
/// response.
pub(crate) async fn create_auth_response(
    state: &AppState,
    account: &Account,
) -> AppResult<AuthResponse> {
    let access_token = state
        .config
        .jwt
        .sign_access_token(account.id, account.role.name())
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = mint_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = CreateSession {
        account_id: account.id,
        refresh_token_hash: refresh_hash,
        expires_at,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        landing_route: account.role.landing_route(),
        user: UserInfo {
            id: account.id,
            email: account.email.clone(),
            full_name: account.full_name(),
            role: account.role,
        },
    })
}
