//! Audit entry rows. Immutable once written.

use sqlx::FromRow;

use lgu_core::audit::AuditEntry;
use lgu_core::types::{DbId, Timestamp};

/// A row from the `audit_entries` table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditRow {
    pub id: DbId,
    pub work_item_id: Option<DbId>,
    pub actor_id: DbId,
    pub action: String,
    pub details: String,
    pub created_at: Timestamp,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        AuditEntry {
            id: row.id,
            work_item_id: row.work_item_id,
            actor_id: row.actor_id,
            action: row.action,
            details: row.details,
            created_at: row.created_at,
        }
    }
}
