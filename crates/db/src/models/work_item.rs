//! Work item rows.

use sqlx::FromRow;

use lgu_core::error::CoreError;
use lgu_core::types::{DbId, Timestamp};
use lgu_core::work_item::{Location, WorkItem};

/// A row from the `work_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct WorkItemRow {
    pub id: DbId,
    pub external_code: String,
    pub kind: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub severity: String,
    pub status: String,
    pub owner_id: DbId,
    pub assignee_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub version: i64,
}

impl TryFrom<WorkItemRow> for WorkItem {
    type Error = CoreError;

    fn try_from(row: WorkItemRow) -> Result<Self, Self::Error> {
        Ok(WorkItem {
            id: row.id,
            external_code: row.external_code,
            kind: row.kind.parse()?,
            location: Location {
                address: row.address,
                latitude: row.latitude,
                longitude: row.longitude,
            },
            severity: row.severity.parse()?,
            status: row.status.parse()?,
            owner_id: row.owner_id,
            assignee_id: row.assignee_id,
            parent_id: row.parent_id,
            payload: row.payload,
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}
