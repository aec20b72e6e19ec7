//! PostgreSQL implementations of the workflow collaborator traits.

use async_trait::async_trait;

use lgu_core::actor::Actor;
use lgu_core::audit::AuditEntry;
use lgu_core::error::CoreError;
use lgu_core::notification::NewNotification;
use lgu_core::search::Page;
use lgu_core::store::{
    ActorDirectory, CommitOutcome, NewWorkItem, NotificationSink, NotifyError, StoreError,
    TransitionCommit, WorkItemFilter, WorkItemStore,
};
use lgu_core::types::DbId;
use lgu_core::work_item::WorkItem;

use crate::models::work_item::WorkItemRow;
use crate::repositories::{AuditRepo, NotificationRepo, UserRepo, WorkItemRepo};
use crate::DbPool;

fn unavailable(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Work item store query failed");
    StoreError::Unavailable(err.to_string())
}

fn to_domain(row: WorkItemRow) -> Result<WorkItem, StoreError> {
    let id = row.id;
    WorkItem::try_from(row).map_err(|e: CoreError| {
        tracing::error!(work_item_id = id, error = %e, "Stored work item failed to decode");
        StoreError::Unavailable(e.to_string())
    })
}

/// Work items and audit entries in PostgreSQL.
#[derive(Clone)]
pub struct PgWorkItemStore {
    pool: DbPool,
}

impl PgWorkItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkItemStore for PgWorkItemStore {
    async fn get(&self, id: DbId) -> Result<WorkItem, StoreError> {
        match WorkItemRepo::find_by_id(&self.pool, id).await.map_err(unavailable)? {
            Some(row) => to_domain(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn create(&self, item: NewWorkItem) -> Result<WorkItem, StoreError> {
        let row = WorkItemRepo::create(&self.pool, &item)
            .await
            .map_err(unavailable)?;
        to_domain(row)
    }

    async fn commit(&self, commit: TransitionCommit) -> Result<CommitOutcome, StoreError> {
        let id = commit.updated.id;
        let applied = WorkItemRepo::apply_transition(&self.pool, &commit)
            .await
            .map_err(unavailable)?;

        match applied {
            Some((item, spawned)) => Ok(CommitOutcome {
                item: to_domain(item)?,
                spawned: spawned.map(to_domain).transpose()?,
            }),
            // Nothing was written; tell a lost race apart from a deleted row.
            None => match WorkItemRepo::find_by_id(&self.pool, id).await.map_err(unavailable)? {
                Some(_) => Err(StoreError::Conflict {
                    id,
                    expected: commit.expected_status,
                }),
                None => Err(StoreError::NotFound(id)),
            },
        }
    }

    async fn list(&self, filter: &WorkItemFilter, page: Page) -> Result<Vec<WorkItem>, StoreError> {
        WorkItemRepo::list(&self.pool, filter, page)
            .await
            .map_err(unavailable)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn audit_trail(&self, work_item_id: DbId) -> Result<Vec<AuditEntry>, StoreError> {
        let rows = AuditRepo::list_for_work_item(&self.pool, work_item_id)
            .await
            .map_err(unavailable)?;
        Ok(rows.into_iter().map(AuditEntry::from).collect())
    }
}

#[async_trait]
impl ActorDirectory for PgWorkItemStore {
    async fn reviewer_ids(&self) -> Result<Vec<DbId>, StoreError> {
        UserRepo::reviewer_ids(&self.pool).await.map_err(unavailable)
    }

    async fn find_actor(&self, id: DbId) -> Result<Option<Actor>, StoreError> {
        let Some(user) = UserRepo::find_by_id(&self.pool, id).await.map_err(unavailable)? else {
            return Ok(None);
        };
        user.actor().map(Some).map_err(|e| {
            tracing::error!(user_id = id, error = %e, "Stored user failed to decode");
            StoreError::Unavailable(e.to_string())
        })
    }
}

/// Writes notifications to the `notifications` table.
#[derive(Clone)]
pub struct PgNotificationSink {
    pool: DbPool,
}

impl PgNotificationSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn deliver(&self, notification: &NewNotification) -> Result<(), NotifyError> {
        NotificationRepo::create(&self.pool, notification)
            .await
            .map(|_| ())
            .map_err(|e| NotifyError(e.to_string()))
    }
}
