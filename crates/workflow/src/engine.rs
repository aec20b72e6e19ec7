//! The workflow engine.
//!
//! Every state change follows the same sequence:
//!
//! 1. load the item (`NotFound`)
//! 2. compare the caller's `expected_status`, if given (`Conflict`)
//! 3. check the action against the lifecycle table (`InvalidTransition`)
//! 4. ask the access policy (`Denied`)
//! 5. validate the request itself: reasons, assignees, payloads (`Validation`)
//! 6. commit the new state and its audit entry atomically, compare-and-swap
//!    on the status and version read in step 1 (`Conflict`)
//! 7. dispatch notifications, best effort
//!
//! Nothing is written unless every check passes.

use std::sync::Arc;

use serde::Deserialize;

use lgu_core::account::AccountStatus;
use lgu_core::actor::Actor;
use lgu_core::audit::{self, action_types, AuditEntry, NewAuditEntry};
use lgu_core::payload::{validate_location, validate_payload};
use lgu_core::policy::{self, authorize, is_assignable, Access, Decision};
use lgu_core::search::Page;
use lgu_core::store::{
    ActorDirectory, Clock, NewWorkItem, NotificationSink, TransitionCommit, WorkItemFilter,
    WorkItemStore,
};
use lgu_core::transitions::{is_editable, next_status};
use lgu_core::types::{DbId, Timestamp};
use lgu_core::work_item::{
    WorkItem, WorkItemAction, WorkItemChanges, WorkItemInput, WorkItemKind, WorkItemStatus,
};

use crate::dispatch::{Dispatcher, TransitionEvent};
use crate::error::WorkflowError;

/// A lifecycle action against an existing work item.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRequest {
    pub action: WorkItemAction,
    /// The status the caller last saw. A mismatch is a `Conflict`.
    #[serde(default)]
    pub expected_status: Option<WorkItemStatus>,
    /// Required for `reject`; recorded in the audit entry for `cancel`.
    #[serde(default)]
    pub reason: Option<String>,
    /// Required for `assign`; optional on `approve`.
    #[serde(default)]
    pub assignee_id: Option<DbId>,
}

impl TransitionRequest {
    pub fn new(action: WorkItemAction) -> Self {
        Self {
            action,
            expected_status: None,
            reason: None,
            assignee_id: None,
        }
    }

    pub fn expecting(mut self, status: WorkItemStatus) -> Self {
        self.expected_status = Some(status);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn assigning(mut self, assignee_id: DbId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    fn reason(&self) -> Option<&str> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub item: WorkItem,
    /// Set when approving an inspection opened a maintenance task.
    pub spawned: Option<WorkItem>,
}

pub struct WorkflowEngine {
    store: Arc<dyn WorkItemStore>,
    directory: Arc<dyn ActorDirectory>,
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
}

impl WorkflowEngine {
    pub fn new(
        store: Arc<dyn WorkItemStore>,
        directory: Arc<dyn ActorDirectory>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            dispatcher: Dispatcher::new(sink, directory.clone()),
            directory,
            clock,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Open a new work item in `draft`, owned by `actor`.
    pub async fn create_work_item(
        &self,
        actor: &Actor,
        kind: WorkItemKind,
        input: WorkItemInput,
    ) -> Result<WorkItem, WorkflowError> {
        ensure(authorize(Some(actor), Access::Create(kind), None))?;

        validate_location(&input.location)?;
        let payload = validate_payload(kind, &input.payload)?;

        let item = self
            .store
            .create(NewWorkItem {
                kind,
                location: input.location,
                severity: input.severity,
                owner_id: actor.id,
                assignee_id: None,
                parent_id: None,
                payload,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            work_item_id = item.id,
            code = %item.external_code,
            kind = %kind,
            actor_id = actor.id,
            "Work item created"
        );
        Ok(item)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub async fn transition(
        &self,
        actor: &Actor,
        id: DbId,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let item = self.store.get(id).await?;
        let from = item.status;

        if request.expected_status.is_some_and(|expected| expected != from) {
            return Err(WorkflowError::Conflict(id));
        }

        let action = request.action;
        let to = next_status(from, action).ok_or(WorkflowError::InvalidTransition {
            current: from,
            action,
        })?;

        ensure(authorize(
            Some(actor),
            Access::Transition(action),
            Some(&item),
        ))?;

        let reason = request.reason();
        match action {
            WorkItemAction::Reject if reason.is_none() => {
                return Err(WorkflowError::Validation(
                    "A rejection requires a reason".into(),
                ));
            }
            WorkItemAction::Assign if request.assignee_id.is_none() => {
                return Err(WorkflowError::Validation(
                    "Assigning requires an assignee_id".into(),
                ));
            }
            _ => {}
        }
        let assigns = matches!(action, WorkItemAction::Assign | WorkItemAction::Approve);
        if let Some(assignee_id) = request.assignee_id.filter(|_| assigns) {
            self.ensure_assignable(assignee_id).await?;
        }

        let now = self.clock.now();
        let mut updated = item.clone();
        updated.status = to;
        updated.updated_at = now;
        let assignee_changed = assigns
            && request
                .assignee_id
                .is_some_and(|a| item.assignee_id != Some(a));
        if assignee_changed {
            updated.assignee_id = request.assignee_id;
        }

        let spawn = (item.kind == WorkItemKind::Inspection && action == WorkItemAction::Approve)
            .then(|| maintenance_from(&updated, actor, now));

        let commit = TransitionCommit {
            expected_status: from,
            expected_version: item.version,
            audit: NewAuditEntry {
                work_item_id: Some(id),
                actor_id: actor.id,
                action: action.as_str().to_string(),
                details: audit::transition_details(&updated, action, from, to, reason),
                created_at: now,
            },
            updated,
            spawn,
        };
        let outcome = self.store.commit(commit).await?;

        tracing::info!(
            work_item_id = id,
            code = %outcome.item.external_code,
            from = %from,
            to = %to,
            action = %action,
            actor_id = actor.id,
            "Work item transitioned"
        );
        if let Some(spawned) = &outcome.spawned {
            tracing::info!(
                work_item_id = spawned.id,
                parent_id = id,
                owner_id = spawned.owner_id,
                "Maintenance task spawned from inspection"
            );
        }

        self.dispatcher
            .dispatch(TransitionEvent {
                action,
                item: &outcome.item,
                spawned: outcome.spawned.as_ref(),
                reason,
                assignee_changed,
                at: now,
            })
            .await;

        Ok(TransitionOutcome {
            item: outcome.item,
            spawned: outcome.spawned,
        })
    }

    /// Edit location, severity or payload while the item is still draft or
    /// submitted. Audited, not notified.
    pub async fn update_details(
        &self,
        actor: &Actor,
        id: DbId,
        changes: WorkItemChanges,
        expected_status: Option<WorkItemStatus>,
    ) -> Result<WorkItem, WorkflowError> {
        let item = self.store.get(id).await?;

        if expected_status.is_some_and(|expected| expected != item.status) {
            return Err(WorkflowError::Conflict(id));
        }
        if !is_editable(item.status) {
            return Err(WorkflowError::NotEditable(item.status));
        }
        ensure(authorize(Some(actor), Access::Update, Some(&item)))?;

        if changes.is_empty() {
            return Err(WorkflowError::Validation("No changes supplied".into()));
        }

        let now = self.clock.now();
        let mut updated = item.clone();
        let mut fields = Vec::new();
        if let Some(location) = changes.location {
            validate_location(&location)?;
            updated.location = location;
            fields.push("location");
        }
        if let Some(severity) = changes.severity {
            updated.severity = severity;
            fields.push("severity");
        }
        if let Some(payload) = changes.payload {
            updated.payload = validate_payload(item.kind, &payload)?;
            fields.push("payload");
        }
        updated.updated_at = now;

        let commit = TransitionCommit {
            expected_status: item.status,
            expected_version: item.version,
            audit: NewAuditEntry {
                work_item_id: Some(id),
                actor_id: actor.id,
                action: action_types::UPDATE.to_string(),
                details: format!(
                    "{} {}: updated {}",
                    item.kind,
                    item.external_code,
                    fields.join(", ")
                ),
                created_at: now,
            },
            updated,
            spawn: None,
        };
        let outcome = self.store.commit(commit).await?;

        tracing::info!(work_item_id = id, actor_id = actor.id, fields = ?fields, "Work item updated");
        Ok(outcome.item)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_work_item(&self, actor: &Actor, id: DbId) -> Result<WorkItem, WorkflowError> {
        let item = self.store.get(id).await?;
        ensure(authorize(Some(actor), Access::Read, Some(&item)))?;
        Ok(item)
    }

    /// List work items visible to `actor`.
    ///
    /// Citizens are pinned to their own items unless the filter asks for
    /// published items only. A citizen's published listing cannot be narrowed
    /// by owner or assignee.
    pub async fn list_work_items(
        &self,
        actor: &Actor,
        mut filter: WorkItemFilter,
        page: Page,
    ) -> Result<Vec<WorkItem>, WorkflowError> {
        if actor.account_status != AccountStatus::Verified {
            return Err(WorkflowError::Denied(policy::REASON_ACCOUNT_NOT_VERIFIED));
        }
        if !actor.role.is_elevated() {
            if filter.published_only {
                filter.owner_id = None;
                filter.assignee_id = None;
            } else {
                filter.owner_id = Some(actor.id);
            }
        }
        Ok(self.store.list(&filter, page).await?)
    }

    /// The unauthenticated transparency listing.
    pub async fn list_published(
        &self,
        mut filter: WorkItemFilter,
        page: Page,
    ) -> Result<Vec<WorkItem>, WorkflowError> {
        filter.published_only = true;
        Ok(self.store.list(&filter, page).await?)
    }

    /// Audit entries for one work item, oldest first. Admin only.
    pub async fn audit_trail(
        &self,
        actor: &Actor,
        id: DbId,
    ) -> Result<Vec<AuditEntry>, WorkflowError> {
        let item = self.store.get(id).await?;
        ensure(authorize(Some(actor), Access::ViewAuditTrail, Some(&item)))?;
        Ok(self.store.audit_trail(id).await?)
    }

    async fn ensure_assignable(&self, assignee_id: DbId) -> Result<(), WorkflowError> {
        match self.directory.find_actor(assignee_id).await? {
            Some(candidate) if is_assignable(&candidate) => Ok(()),
            Some(_) => Err(WorkflowError::Validation(format!(
                "User {assignee_id} cannot be assigned work items"
            ))),
            None => Err(WorkflowError::Validation(format!(
                "Assignee {assignee_id} does not exist"
            ))),
        }
    }
}

fn ensure(decision: Decision) -> Result<(), WorkflowError> {
    match decision {
        Decision::Allowed => Ok(()),
        Decision::Denied(reason) => Err(WorkflowError::Denied(reason)),
    }
}

/// The maintenance task opened when an inspection is approved. Owned by the
/// inspection's assignee, or the approver when nobody was assigned.
fn maintenance_from(inspection: &WorkItem, approver: &Actor, now: Timestamp) -> NewWorkItem {
    let mut payload = serde_json::json!({
        "description": format!("Repair work from inspection {}", inspection.external_code),
        "source_inspection": inspection.external_code,
    });
    if let Some(findings) = inspection.payload.get("findings") {
        payload["findings"] = findings.clone();
    }

    NewWorkItem {
        kind: WorkItemKind::Maintenance,
        location: inspection.location.clone(),
        severity: inspection.severity,
        owner_id: inspection.assignee_id.unwrap_or(approver.id),
        assignee_id: None,
        parent_id: Some(inspection.id),
        payload,
        created_at: now,
    }
}
