pub mod admin;
pub mod auth;
pub mod health;
pub mod notification;
pub mod public;
pub mod work_items;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                      citizen self-registration (public)
/// /auth/login                         login (public)
/// /auth/me                            current actor
///
/// /work-items                         list, create
/// /work-items/{id}                    get, edit details
/// /work-items/{id}/transitions        lifecycle action
/// /work-items/{id}/audit              audit trail (admin)
///
/// /public/work-items                  published items (no auth)
///
/// /notifications                      own inbox
/// /notifications/unread-count
/// /notifications/read-all
/// /notifications/{id}/read
///
/// /admin/accounts                     list, create staff (admin)
/// /admin/accounts/audit               account audit entries (admin)
/// /admin/accounts/{id}/status         approve, reject, deactivate, reactivate
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/work-items", work_items::router())
        .nest("/public", public::router())
        .nest("/notifications", notification::router())
        .nest("/admin", admin::router())
}
