//! Audit trail entries.
//!
//! Entries are append-only: one per state-changing operation, written in the
//! same transaction as the change they describe.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};
use crate::work_item::{WorkItem, WorkItemAction, WorkItemStatus};

/// Action verbs that are not lifecycle actions. Lifecycle transitions use
/// [`WorkItemAction::as_str`].
pub mod action_types {
    pub const UPDATE: &str = "update";
    pub const ACCOUNT_REGISTER: &str = "account_register";
    pub const ACCOUNT_CREATE: &str = "account_create";
    pub const ACCOUNT_STATUS_CHANGE: &str = "account_status_change";
}

/// A stored audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: DbId,
    /// `None` for account administration entries.
    pub work_item_id: Option<DbId>,
    pub actor_id: DbId,
    pub action: String,
    pub details: String,
    pub created_at: Timestamp,
}

/// An audit entry about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub work_item_id: Option<DbId>,
    pub actor_id: DbId,
    pub action: String,
    pub details: String,
    pub created_at: Timestamp,
}

/// Describe a lifecycle transition for the `details` column.
///
/// `note` is free text supplied by the caller (a rejection reason, a
/// cancellation note) and is appended verbatim.
pub fn transition_details(
    item: &WorkItem,
    action: WorkItemAction,
    from: WorkItemStatus,
    to: WorkItemStatus,
    note: Option<&str>,
) -> String {
    let mut details = if from == to {
        format!("{} {}: {action} ({from})", item.kind, item.external_code)
    } else {
        format!("{} {}: {from} -> {to}", item.kind, item.external_code)
    };
    if let Some(assignee) = item.assignee_id.filter(|_| action == WorkItemAction::Assign) {
        details.push_str(&format!("; assignee {assignee}"));
    }
    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
        details.push_str("; ");
        details.push_str(note);
    }
    details
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::work_item::{Location, Severity, WorkItemKind};

    fn item() -> WorkItem {
        WorkItem {
            id: 3,
            external_code: "DR-2026-003".into(),
            kind: WorkItemKind::DamageReport,
            location: Location {
                address: "Bonifacio Dr".into(),
                latitude: None,
                longitude: None,
            },
            severity: Severity::High,
            status: WorkItemStatus::UnderReview,
            owner_id: 1,
            assignee_id: Some(8),
            parent_id: None,
            payload: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
        }
    }

    #[test]
    fn describes_status_change() {
        let details = transition_details(
            &item(),
            WorkItemAction::Reject,
            WorkItemStatus::UnderReview,
            WorkItemStatus::Rejected,
            Some("duplicate of DR-2026-001"),
        );
        assert_eq!(
            details,
            "damage_report DR-2026-003: under_review -> rejected; duplicate of DR-2026-001"
        );
    }

    #[test]
    fn describes_assignment() {
        let details = transition_details(
            &item(),
            WorkItemAction::Assign,
            WorkItemStatus::Approved,
            WorkItemStatus::Approved,
            None,
        );
        assert_eq!(details, "damage_report DR-2026-003: assign (approved); assignee 8");
    }

    #[test]
    fn blank_note_is_ignored() {
        let details = transition_details(
            &item(),
            WorkItemAction::Approve,
            WorkItemStatus::UnderReview,
            WorkItemStatus::Approved,
            Some("   "),
        );
        assert!(!details.contains(';'));
    }
}
