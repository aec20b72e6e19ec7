//! Route definitions for the `/admin` resource. Admin only.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET, POST  /accounts              -> list_accounts, create_staff_account
/// GET        /accounts/audit        -> list_account_audit
/// POST       /accounts/{id}/status  -> change_account_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts",
            get(admin::list_accounts).post(admin::create_staff_account),
        )
        .route("/accounts/audit", get(admin::list_account_audit))
        .route("/accounts/{id}/status", post(admin::change_account_status))
}
