//! Route definitions for the `/work-items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work_items;
use crate::state::AppState;

/// Routes mounted at `/work-items`.
///
/// ```text
/// GET, POST  /                   -> list_work_items, create_work_item
/// GET, PUT   /{id}               -> get_work_item, update_work_item
/// POST       /{id}/transitions   -> transition_work_item
/// GET        /{id}/audit         -> get_audit_trail (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(work_items::list_work_items).post(work_items::create_work_item),
        )
        .route(
            "/{id}",
            get(work_items::get_work_item).put(work_items::update_work_item),
        )
        .route("/{id}/transitions", post(work_items::transition_work_item))
        .route("/{id}/audit", get(work_items::get_audit_trail))
}
