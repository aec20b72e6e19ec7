//! Notification side effects of committed transitions.
//!
//! Runs after the commit, outside the transaction. Every failure here is
//! logged and swallowed: a lost notification never undoes a transition.

use std::sync::Arc;

use lgu_core::notification::NewNotification;
use lgu_core::store::{ActorDirectory, NotificationSink};
use lgu_core::types::{DbId, Timestamp};
use lgu_core::work_item::{WorkItem, WorkItemAction};

/// A committed transition, as seen by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct TransitionEvent<'a> {
    pub action: WorkItemAction,
    /// The item after the transition.
    pub item: &'a WorkItem,
    /// The maintenance item spawned by an inspection approval.
    pub spawned: Option<&'a WorkItem>,
    pub reason: Option<&'a str>,
    /// Whether this transition set a new assignee.
    pub assignee_changed: bool,
    pub at: Timestamp,
}

/// Delivers the notifications a transition calls for.
pub struct Dispatcher {
    sink: Arc<dyn NotificationSink>,
    directory: Arc<dyn ActorDirectory>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>, directory: Arc<dyn ActorDirectory>) -> Self {
        Self { sink, directory }
    }

    /// Deliver every notification for `event`. Never fails.
    pub async fn dispatch(&self, event: TransitionEvent<'_>) {
        let reviewers = if event.action == WorkItemAction::Submit {
            match self.directory.reviewer_ids().await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!(
                        work_item_id = event.item.id,
                        error = %e,
                        "Could not resolve reviewers, skipping submission notifications"
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        for notification in notifications_for(&event, &reviewers) {
            if let Err(e) = self.sink.deliver(&notification).await {
                tracing::warn!(
                    work_item_id = event.item.id,
                    recipient_id = notification.recipient_id,
                    notification_type = %notification.notification_type,
                    error = %e,
                    "Notification delivery failed"
                );
            }
        }
    }
}

/// The notifications `event` produces. `reviewers` is only consulted for
/// submissions.
pub fn notifications_for(event: &TransitionEvent<'_>, reviewers: &[DbId]) -> Vec<NewNotification> {
    let item = event.item;
    let at = event.at;
    let mut out = Vec::new();

    match event.action {
        WorkItemAction::Submit => {
            out.extend(
                reviewers
                    .iter()
                    .map(|id| NewNotification::submitted(*id, item, at)),
            );
        }
        WorkItemAction::Approve => out.push(NewNotification::approved(item, at)),
        WorkItemAction::Reject => out.push(NewNotification::rejected(item, event.reason, at)),
        WorkItemAction::Complete => out.push(NewNotification::completed(item, at)),
        WorkItemAction::BeginReview
        | WorkItemAction::Assign
        | WorkItemAction::Start
        | WorkItemAction::Cancel => {}
    }

    if event.assignee_changed {
        if let Some(assignee) = item.assignee_id {
            out.push(NewNotification::assigned(assignee, item, at));
        }
    }

    if let Some(spawned) = event.spawned {
        out.push(NewNotification::maintenance_created(spawned, item, at));
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lgu_core::notification::types;
    use lgu_core::work_item::{Location, Severity, WorkItemKind, WorkItemStatus};

    use super::*;

    fn item(status: WorkItemStatus) -> WorkItem {
        WorkItem {
            id: 4,
            external_code: "INSP-2026-004".into(),
            kind: WorkItemKind::Inspection,
            location: Location {
                address: "Aguinaldo Hwy km 12".into(),
                latitude: Some(14.35),
                longitude: Some(120.94),
            },
            severity: Severity::Urgent,
            status,
            owner_id: 2,
            assignee_id: Some(7),
            parent_id: None,
            payload: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
        }
    }

    fn event<'a>(action: WorkItemAction, item: &'a WorkItem) -> TransitionEvent<'a> {
        TransitionEvent {
            action,
            item,
            spawned: None,
            reason: None,
            assignee_changed: false,
            at: Utc::now(),
        }
    }

    #[test]
    fn submission_fans_out_to_reviewers() {
        let item = item(WorkItemStatus::Submitted);
        let out = notifications_for(&event(WorkItemAction::Submit, &item), &[50, 51]);
        let recipients: Vec<_> = out.iter().map(|n| n.recipient_id).collect();
        assert_eq!(recipients, vec![50, 51]);
        assert!(out.iter().all(|n| n.notification_type == types::SUBMITTED_FOR_APPROVAL));
    }

    #[test]
    fn rejection_carries_the_reason() {
        let item = item(WorkItemStatus::Rejected);
        let mut ev = event(WorkItemAction::Reject, &item);
        ev.reason = Some("outside city limits");
        let out = notifications_for(&ev, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient_id, 2);
        assert!(out[0].message.contains("outside city limits"));
    }

    #[test]
    fn review_start_and_cancel_are_silent() {
        let item = item(WorkItemStatus::UnderReview);
        for action in [
            WorkItemAction::BeginReview,
            WorkItemAction::Start,
            WorkItemAction::Cancel,
        ] {
            assert!(notifications_for(&event(action, &item), &[50]).is_empty());
        }
    }

    #[test]
    fn approval_with_spawn_notifies_owner_and_spawned_owner() {
        let inspection = item(WorkItemStatus::Approved);
        let mut spawned = item(WorkItemStatus::Draft);
        spawned.id = 9;
        spawned.kind = WorkItemKind::Maintenance;
        spawned.external_code = "MT-2026-001".into();
        spawned.owner_id = 7;
        spawned.parent_id = Some(4);

        let mut ev = event(WorkItemAction::Approve, &inspection);
        ev.spawned = Some(&spawned);
        let out = notifications_for(&ev, &[]);
        let summary: Vec<_> = out
            .iter()
            .map(|n| (n.recipient_id, n.notification_type.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(2, types::APPROVED), (7, types::MAINTENANCE_CREATED)]
        );
    }

    #[test]
    fn assignment_notifies_the_new_assignee() {
        let item = item(WorkItemStatus::Approved);
        let mut ev = event(WorkItemAction::Assign, &item);
        ev.assignee_changed = true;
        let out = notifications_for(&ev, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient_id, 7);
        assert_eq!(out[0].notification_type, types::ASSIGNED);
    }
}
