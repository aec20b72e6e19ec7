use lgu_core::error::CoreError;
use lgu_core::policy;
use lgu_core::store::StoreError;
use lgu_core::types::DbId;
use lgu_core::work_item::{WorkItemAction, WorkItemStatus};

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The access policy refused the action.
    #[error("Denied: {0}")]
    Denied(&'static str),

    /// The action does not apply in the item's current state.
    #[error("Cannot {action} a work item that is {current}")]
    InvalidTransition {
        current: WorkItemStatus,
        action: WorkItemAction,
    },

    /// Details can only be edited while the item is draft or submitted.
    #[error("Work item is {0} and can no longer be edited")]
    NotEditable(WorkItemStatus),

    #[error("Work item {0} not found")]
    NotFound(DbId),

    /// Another request changed the item first. Re-read and try again.
    #[error("Work item {0} was modified concurrently")]
    Conflict(DbId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => WorkflowError::NotFound(id),
            StoreError::Conflict { id, .. } => WorkflowError::Conflict(id),
            StoreError::Unavailable(msg) => WorkflowError::StoreUnavailable(msg),
        }
    }
}

impl From<CoreError> for WorkflowError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) | CoreError::Conflict(msg) => WorkflowError::Validation(msg),
            err @ CoreError::UnknownValue { .. } => WorkflowError::Validation(err.to_string()),
            CoreError::NotFound { id, .. } => WorkflowError::NotFound(id),
            CoreError::Unauthorized(_) => {
                WorkflowError::Denied(policy::REASON_AUTHENTICATION_REQUIRED)
            }
            CoreError::Forbidden(_) => WorkflowError::Denied(policy::REASON_INSUFFICIENT_ROLE),
            CoreError::Internal(msg) => WorkflowError::StoreUnavailable(msg),
        }
    }
}
