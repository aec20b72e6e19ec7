use std::sync::Arc;

use lgu_workflow::WorkflowEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Used directly for accounts and the notification inbox.
    pub pool: lgu_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Every work-item read and write goes through the engine.
    pub engine: Arc<WorkflowEngine>,
}
