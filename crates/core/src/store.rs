//! Collaborator traits the workflow engine is written against.
//!
//! The engine never talks to a database directly. `lgu-db` implements these
//! traits over PostgreSQL and `lgu-workflow::memory` implements them in
//! memory for tests.

use async_trait::async_trait;
use chrono::Utc;

use crate::actor::Actor;
use crate::audit::{AuditEntry, NewAuditEntry};
use crate::notification::NewNotification;
use crate::search::Page;
use crate::types::{DbId, Timestamp};
use crate::work_item::{Location, Severity, WorkItem, WorkItemKind, WorkItemStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Work item {0} not found")]
    NotFound(DbId),

    /// The stored row changed since the caller read it.
    #[error("Work item {id} is no longer {expected}")]
    Conflict { id: DbId, expected: WorkItemStatus },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A work item to insert. The store allocates `id`, `external_code` and sets
/// the status to `draft`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkItem {
    pub kind: WorkItemKind,
    pub location: Location,
    pub severity: Severity,
    pub owner_id: DbId,
    pub assignee_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

/// Everything a single transition writes, committed atomically.
///
/// The row is written only if its stored `status` and `version` still equal
/// the ones the caller read, and the write bumps `version`. The audit entry
/// and the optional spawned item are part of the same unit.
#[derive(Debug, Clone)]
pub struct TransitionCommit {
    pub expected_status: WorkItemStatus,
    pub expected_version: i64,
    /// The item as it should look afterwards. Only `status`, `assignee_id`,
    /// `location`, `severity`, `payload` and `updated_at` are written.
    pub updated: WorkItem,
    pub audit: NewAuditEntry,
    pub spawn: Option<NewWorkItem>,
}

#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub item: WorkItem,
    pub spawned: Option<WorkItem>,
}

/// Listing filter. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemFilter {
    pub kind: Option<WorkItemKind>,
    pub status: Option<WorkItemStatus>,
    pub owner_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    /// Restrict to approved, in-progress and completed items.
    pub published_only: bool,
}

impl WorkItemFilter {
    pub fn matches(&self, item: &WorkItem) -> bool {
        self.kind.map_or(true, |k| item.kind == k)
            && self.status.map_or(true, |s| item.status == s)
            && self.owner_id.map_or(true, |o| item.owner_id == o)
            && self.assignee_id.map_or(true, |a| item.assignee_id == Some(a))
            && (!self.published_only || item.status.is_published())
    }
}

/// Persistence for work items and their audit trail.
#[async_trait]
pub trait WorkItemStore: Send + Sync {
    async fn get(&self, id: DbId) -> Result<WorkItem, StoreError>;

    async fn create(&self, item: NewWorkItem) -> Result<WorkItem, StoreError>;

    /// Compare-and-swap on `status` and `version`. Fails with [`StoreError::Conflict`]
    /// when another writer got there first; nothing is written in that case.
    async fn commit(&self, commit: TransitionCommit) -> Result<CommitOutcome, StoreError>;

    /// Newest first.
    async fn list(&self, filter: &WorkItemFilter, page: Page) -> Result<Vec<WorkItem>, StoreError>;

    /// Oldest first.
    async fn audit_trail(&self, work_item_id: DbId) -> Result<Vec<AuditEntry>, StoreError>;
}

/// Lookup of actors by id and role.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// Verified LGU officers and admins: who hears about new submissions.
    async fn reviewer_ids(&self) -> Result<Vec<DbId>, StoreError>;

    /// `None` when no account has this id.
    async fn find_actor(&self, id: DbId) -> Result<Option<Actor>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &NewNotification) -> Result<(), NotifyError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: WorkItemStatus, owner_id: DbId) -> WorkItem {
        WorkItem {
            id: 1,
            external_code: "MT-2026-001".into(),
            kind: WorkItemKind::Maintenance,
            location: Location {
                address: "J.P. Rizal St".into(),
                latitude: None,
                longitude: None,
            },
            severity: Severity::Low,
            status,
            owner_id,
            assignee_id: None,
            parent_id: Some(9),
            payload: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(WorkItemFilter::default().matches(&item(WorkItemStatus::Draft, 1)));
    }

    #[test]
    fn filter_fields_are_conjunctive() {
        let filter = WorkItemFilter {
            kind: Some(WorkItemKind::Maintenance),
            owner_id: Some(1),
            ..Default::default()
        };
        assert!(filter.matches(&item(WorkItemStatus::Draft, 1)));
        assert!(!filter.matches(&item(WorkItemStatus::Draft, 2)));
    }

    #[test]
    fn published_only_hides_unapproved_items() {
        let filter = WorkItemFilter {
            published_only: true,
            ..Default::default()
        };
        assert!(!filter.matches(&item(WorkItemStatus::UnderReview, 1)));
        assert!(filter.matches(&item(WorkItemStatus::InProgress, 1)));
    }
}
