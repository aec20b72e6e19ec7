//! Notification types and the messages the workflow sends.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};
use crate::work_item::WorkItem;

/// Known notification type strings.
pub mod types {
    pub const SUBMITTED_FOR_APPROVAL: &str = "submitted_for_approval";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
    pub const COMPLETED: &str = "completed";
    pub const ASSIGNED: &str = "assigned";
    pub const MAINTENANCE_CREATED: &str = "maintenance_created";
}

/// A notification handed to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub recipient_id: DbId,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub created_at: Timestamp,
}

impl NewNotification {
    fn about(
        recipient_id: DbId,
        notification_type: &str,
        title: String,
        message: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            recipient_id,
            notification_type: notification_type.to_string(),
            title,
            message,
            created_at,
        }
    }

    pub fn submitted(recipient_id: DbId, item: &WorkItem, at: Timestamp) -> Self {
        Self::about(
            recipient_id,
            types::SUBMITTED_FOR_APPROVAL,
            format!("{} submitted for approval", item.external_code),
            format!("A {} at {} is waiting for review.", item.kind, item.location.address),
            at,
        )
    }

    pub fn approved(item: &WorkItem, at: Timestamp) -> Self {
        Self::about(
            item.owner_id,
            types::APPROVED,
            format!("{} approved", item.external_code),
            format!("Your {} at {} has been approved.", item.kind, item.location.address),
            at,
        )
    }

    pub fn rejected(item: &WorkItem, reason: Option<&str>, at: Timestamp) -> Self {
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let message = match reason {
            Some(reason) => format!("Your {} was rejected: {reason}", item.kind),
            None => format!("Your {} was rejected.", item.kind),
        };
        Self::about(
            item.owner_id,
            types::REJECTED,
            format!("{} rejected", item.external_code),
            message,
            at,
        )
    }

    pub fn completed(item: &WorkItem, at: Timestamp) -> Self {
        Self::about(
            item.owner_id,
            types::COMPLETED,
            format!("{} completed", item.external_code),
            format!("Work on your {} at {} is complete.", item.kind, item.location.address),
            at,
        )
    }

    pub fn assigned(assignee_id: DbId, item: &WorkItem, at: Timestamp) -> Self {
        Self::about(
            assignee_id,
            types::ASSIGNED,
            format!("{} assigned to you", item.external_code),
            format!("You are now responsible for the {} at {}.", item.kind, item.location.address),
            at,
        )
    }

    pub fn maintenance_created(spawned: &WorkItem, inspection: &WorkItem, at: Timestamp) -> Self {
        Self::about(
            spawned.owner_id,
            types::MAINTENANCE_CREATED,
            format!("{} created", spawned.external_code),
            format!(
                "Maintenance task {} was opened from approved inspection {}.",
                spawned.external_code, inspection.external_code
            ),
            at,
        )
    }
}
