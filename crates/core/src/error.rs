//! Domain error type shared by every crate in the workspace.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A stored or submitted enum value that does not name a known variant.
    #[error("Unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn unknown(field: &'static str, value: &str) -> Self {
        CoreError::UnknownValue {
            field,
            value: value.to_string(),
        }
    }
}
