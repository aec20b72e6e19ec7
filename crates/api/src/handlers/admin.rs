//! Handlers for `/admin/accounts` (account approval and staff accounts).
//!
//! All handlers require a verified admin via [`RequireAdmin`]. Every change
//! writes an audit entry in the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use lgu_core::account::{self, AccountStatus};
use lgu_core::audit::{action_types, AuditEntry, NewAuditEntry};
use lgu_core::error::CoreError;
use lgu_core::roles::Role;
use lgu_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use lgu_core::types::DbId;
use lgu_db::models::user::{CreateUser, UserResponse};
use lgu_db::repositories::{AuditRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::validate_identity;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /admin/accounts`.
#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    pub status: Option<AccountStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /admin/accounts`.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: Role,
}

/// Request body for `POST /admin/accounts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: AccountStatus,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/accounts
///
/// Newest first. `?status=pending` is the approval queue.
pub async fn list_accounts(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AccountListQuery>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(
        &state.pool,
        params.status,
        clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/accounts
///
/// Create an engineer, LGU officer or admin account. Staff accounts are
/// verified immediately; citizens register themselves.
pub async fn create_staff_account(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateStaffRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    if input.role == Role::Citizen {
        return Err(AppError::BadRequest(
            "Citizen accounts are created through self-registration".into(),
        ));
    }
    validate_identity(&input.username, &input.email, &input.full_name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
        full_name: input.full_name.trim().to_string(),
        password_hash,
        role: input.role,
        account_status: AccountStatus::Verified,
    };

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(&mut *tx, &create).await?;
    AuditRepo::insert(
        &mut *tx,
        &NewAuditEntry {
            work_item_id: None,
            actor_id: admin.user_id,
            action: action_types::ACCOUNT_CREATE.to_string(),
            details: format!("user {} created as {}", user.username, input.role),
            created_at: state.engine.now(),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        user_id = user.id,
        role = %input.role,
        admin_id = admin.user_id,
        "Staff account created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}

/// POST /api/v1/admin/accounts/{id}/status
///
/// Approve, reject, deactivate or reactivate an account. The move must be
/// one [`AccountStatus::allowed_next`] permits.
pub async fn change_account_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "Admins cannot change their own account status".into(),
        ));
    }

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let current = user.actor()?.account_status;
    account::validate_transition(current, input.status)?;

    let mut tx = state.pool.begin().await?;
    let updated = UserRepo::update_status(&mut *tx, id, current, input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Account {id} changed status concurrently"
            )))
        })?;
    AuditRepo::insert(
        &mut *tx,
        &NewAuditEntry {
            work_item_id: None,
            actor_id: admin.user_id,
            action: action_types::ACCOUNT_STATUS_CHANGE.to_string(),
            details: format!("user {}: {current} -> {}", updated.username, input.status),
            created_at: state.engine.now(),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        user_id = id,
        from = %current,
        to = %input.status,
        admin_id = admin.user_id,
        "Account status changed"
    );
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// GET /api/v1/admin/accounts/audit
///
/// Account administration entries, newest first.
pub async fn list_account_audit(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<AuditEntry>>>> {
    let page = params.page();
    let rows = AuditRepo::list_account_entries(&state.pool, page.limit, page.offset).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(AuditEntry::from).collect(),
    }))
}
