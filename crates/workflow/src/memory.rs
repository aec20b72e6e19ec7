//! In-memory collaborators.
//!
//! Used by the test suites and for running the engine without a database.
//! [`InMemoryStore`] serializes every call through one mutex, which gives the
//! same compare-and-swap behaviour as the Postgres store's conditional
//! `UPDATE`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Datelike, Duration};
use tokio::sync::Mutex as AsyncMutex;

use lgu_core::account::AccountStatus;
use lgu_core::actor::Actor;
use lgu_core::audit::{AuditEntry, NewAuditEntry};
use lgu_core::external_code::code_for;
use lgu_core::notification::NewNotification;
use lgu_core::roles::Role;
use lgu_core::search::Page;
use lgu_core::store::{
    ActorDirectory, Clock, CommitOutcome, NewWorkItem, NotificationSink, NotifyError, StoreError,
    TransitionCommit, WorkItemFilter, WorkItemStore,
};
use lgu_core::types::{DbId, Timestamp};
use lgu_core::work_item::{WorkItem, WorkItemStatus};

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct State {
    items: BTreeMap<DbId, WorkItem>,
    audit: Vec<AuditEntry>,
    sequences: HashMap<(&'static str, i32), i64>,
    actors: Vec<Actor>,
    last_item_id: DbId,
    last_audit_id: DbId,
}

impl State {
    fn insert(&mut self, new: NewWorkItem) -> WorkItem {
        let year = new.created_at.year();
        let sequence = self
            .sequences
            .entry((new.kind.code_prefix(), year))
            .or_insert(0);
        *sequence += 1;

        self.last_item_id += 1;
        let item = WorkItem {
            id: self.last_item_id,
            external_code: code_for(new.kind, year, *sequence),
            kind: new.kind,
            location: new.location,
            severity: new.severity,
            status: WorkItemStatus::Draft,
            owner_id: new.owner_id,
            assignee_id: new.assignee_id,
            parent_id: new.parent_id,
            payload: new.payload,
            created_at: new.created_at,
            updated_at: new.created_at,
            version: 1,
        };
        self.items.insert(item.id, item.clone());
        item
    }

    fn append_audit(&mut self, entry: NewAuditEntry) {
        self.last_audit_id += 1;
        self.audit.push(AuditEntry {
            id: self.last_audit_id,
            work_item_id: entry.work_item_id,
            actor_id: entry.actor_id,
            action: entry.action,
            details: entry.details,
            created_at: entry.created_at,
        });
    }
}

/// Work items, audit entries and a roster of actors held in memory.
#[derive(Default)]
pub struct InMemoryStore {
    state: AsyncMutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an actor known to the [`ActorDirectory`] side of the store.
    pub async fn register_actor(&self, actor: Actor) {
        let mut state = self.state.lock().await;
        state.actors.retain(|a| a.id != actor.id);
        state.actors.push(actor);
    }
}

#[async_trait]
impl WorkItemStore for InMemoryStore {
    async fn get(&self, id: DbId) -> Result<WorkItem, StoreError> {
        let state = self.state.lock().await;
        state.items.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, item: NewWorkItem) -> Result<WorkItem, StoreError> {
        Ok(self.state.lock().await.insert(item))
    }

    async fn commit(&self, commit: TransitionCommit) -> Result<CommitOutcome, StoreError> {
        let mut state = self.state.lock().await;
        let id = commit.updated.id;

        let stored = state.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if stored.status != commit.expected_status || stored.version != commit.expected_version {
            return Err(StoreError::Conflict {
                id,
                expected: commit.expected_status,
            });
        }

        stored.status = commit.updated.status;
        stored.assignee_id = commit.updated.assignee_id;
        stored.location = commit.updated.location;
        stored.severity = commit.updated.severity;
        stored.payload = commit.updated.payload;
        stored.updated_at = commit.updated.updated_at;
        stored.version += 1;
        let item = stored.clone();

        state.append_audit(commit.audit);
        let spawned = commit.spawn.map(|new| state.insert(new));

        Ok(CommitOutcome { item, spawned })
    }

    async fn list(&self, filter: &WorkItemFilter, page: Page) -> Result<Vec<WorkItem>, StoreError> {
        let state = self.state.lock().await;
        let mut items: Vec<WorkItem> = state
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(items
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .collect())
    }

    async fn audit_trail(&self, work_item_id: DbId) -> Result<Vec<AuditEntry>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .audit
            .iter()
            .filter(|e| e.work_item_id == Some(work_item_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActorDirectory for InMemoryStore {
    async fn reviewer_ids(&self) -> Result<Vec<DbId>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .actors
            .iter()
            .filter(|a| a.account_status == AccountStatus::Verified)
            .filter(|a| matches!(a.role, Role::LguOfficer | Role::Admin))
            .map(|a| a.id)
            .collect())
    }

    async fn find_actor(&self, id: DbId) -> Result<Option<Actor>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.actors.iter().find(|a| a.id == id).copied())
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Records delivered notifications. Can be switched to fail every delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: AsyncMutex<Vec<NewNotification>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn delivered(&self) -> Vec<NewNotification> {
        self.delivered.lock().await.clone()
    }

    pub async fn delivered_to(&self, recipient_id: DbId) -> Vec<NewNotification> {
        self.delivered
            .lock()
            .await
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn deliver(&self, notification: &NewNotification) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError("sink offline".into()));
        }
        self.delivered.lock().await.push(notification.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
