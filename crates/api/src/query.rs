//! Shared query parameter types for API handlers.

use serde::Deserialize;

use lgu_core::search::Page;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped into a [`Page`] using the work-item defaults.
    pub fn page(&self) -> Page {
        Page::from_params(self.limit, self.offset)
    }
}
