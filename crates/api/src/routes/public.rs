//! Unauthenticated routes mounted at `/public`.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/work-items", get(public::list_published))
}
