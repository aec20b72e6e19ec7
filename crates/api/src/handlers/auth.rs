//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use lgu_core::account::AccountStatus;
use lgu_core::actor::Actor;
use lgu_core::audit::{action_types, NewAuditEntry};
use lgu_core::error::CoreError;
use lgu_core::roles::Role;
use lgu_db::models::user::{CreateUser, UserResponse};
use lgu_db::repositories::{AuditRepo, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Citizen self-registration. The account starts `pending` and cannot log
/// in until an admin verifies it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_identity(&input.username, &input.email, &input.full_name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username: normalize_username(&input.username).to_string(),
        email: input.email.trim().to_string(),
        full_name: input.full_name.trim().to_string(),
        password_hash,
        role: Role::Citizen,
        account_status: AccountStatus::Pending,
    };

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(&mut *tx, &create).await?;
    AuditRepo::insert(
        &mut *tx,
        &NewAuditEntry {
            work_item_id: None,
            actor_id: user.id,
            action: action_types::ACCOUNT_REGISTER.to_string(),
            details: format!("user {} registered as citizen (pending)", user.username),
            created_at: state.engine.now(),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, username = %user.username, "Citizen registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Only verified accounts receive a
/// token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let username = normalize_username(&input.username);
    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(%username, "Failed login attempt");
        return Err(invalid());
    }

    let actor = user.actor()?;
    if actor.account_status != AccountStatus::Verified {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Account is {}",
            actor.account_status
        ))));
    }

    let access_token = generate_access_token(&actor, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %actor.role, "User logged in");
    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user.into(),
    }))
}

/// GET /api/v1/auth/me
///
/// The identity the server will act on for this token.
pub async fn me(auth: AuthUser) -> Json<DataResponse<Actor>> {
    Json(DataResponse { data: auth.actor() })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Usernames are stored and looked up without surrounding whitespace.
pub(crate) fn normalize_username(raw: &str) -> &str {
    raw.trim()
}

/// Reject blank identity fields and obviously malformed emails.
pub(crate) fn validate_identity(username: &str, email: &str, full_name: &str) -> AppResult<()> {
    if username.trim().is_empty() {
        return Err(CoreError::Validation("Username is required".into()).into());
    }
    if full_name.trim().is_empty() {
        return Err(CoreError::Validation("Full name is required".into()).into());
    }
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(CoreError::Validation(format!("'{email}' is not a valid email address")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_and_login_agree_on_the_username() {
        assert_eq!(normalize_username("  jdelacruz\t"), "jdelacruz");
        assert_eq!(normalize_username("jdelacruz"), "jdelacruz");
    }

    #[test]
    fn identity_requires_a_plausible_email() {
        assert!(validate_identity("jdelacruz", "juan@lgu.gov.ph", "Juan dela Cruz").is_ok());
        assert!(validate_identity("jdelacruz", "juan-at-lgu", "Juan dela Cruz").is_err());
        assert!(validate_identity("   ", "juan@lgu.gov.ph", "Juan dela Cruz").is_err());
    }
}
