//! Repository for the `work_items` table.

use chrono::Datelike;
use sqlx::{PgConnection, PgPool};

use lgu_core::external_code::code_for;
use lgu_core::search::Page;
use lgu_core::store::{NewWorkItem, TransitionCommit, WorkItemFilter};
use lgu_core::types::DbId;
use lgu_core::work_item::WorkItemStatus;

use crate::models::work_item::WorkItemRow;
use crate::repositories::{AuditRepo, CodeSequenceRepo};

const COLUMNS: &str = "id, external_code, kind, address, latitude, longitude, severity, status, \
                       owner_id, assignee_id, parent_id, payload, created_at, updated_at, version";

pub struct WorkItemRepo;

impl WorkItemRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_items WHERE id = $1");
        sqlx::query_as::<_, WorkItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a draft work item with a freshly allocated external code.
    pub async fn create(pool: &PgPool, input: &NewWorkItem) -> Result<WorkItemRow, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let row = Self::insert(&mut *tx, input).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Insert inside the caller's transaction.
    async fn insert(conn: &mut PgConnection, input: &NewWorkItem) -> Result<WorkItemRow, sqlx::Error> {
        let year = input.created_at.year();
        let sequence = CodeSequenceRepo::next(conn, input.kind.code_prefix(), year).await?;

        let query = format!(
            "INSERT INTO work_items \
                (external_code, kind, address, latitude, longitude, severity, status, \
                 owner_id, assignee_id, parent_id, payload, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkItemRow>(&query)
            .bind(code_for(input.kind, year, sequence))
            .bind(input.kind.as_str())
            .bind(&input.location.address)
            .bind(input.location.latitude)
            .bind(input.location.longitude)
            .bind(input.severity.as_str())
            .bind(WorkItemStatus::Draft.as_str())
            .bind(input.owner_id)
            .bind(input.assignee_id)
            .bind(input.parent_id)
            .bind(&input.payload)
            .bind(input.created_at)
            .fetch_one(&mut *conn)
            .await
    }

    /// Apply a transition in one transaction: the conditional update, the
    /// audit entry and the optional spawned item.
    ///
    /// Returns `None` without writing anything when the stored status or
    /// version no longer match the commit's expectations (or the row is gone).
    pub async fn apply_transition(
        pool: &PgPool,
        commit: &TransitionCommit,
    ) -> Result<Option<(WorkItemRow, Option<WorkItemRow>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let item = &commit.updated;

        let query = format!(
            "UPDATE work_items SET \
                status = $3, assignee_id = $4, address = $5, latitude = $6, longitude = $7, \
                severity = $8, payload = $9, updated_at = $10, version = version + 1 \
             WHERE id = $1 AND status = $2 AND version = $11 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WorkItemRow>(&query)
            .bind(item.id)
            .bind(commit.expected_status.as_str())
            .bind(item.status.as_str())
            .bind(item.assignee_id)
            .bind(&item.location.address)
            .bind(item.location.latitude)
            .bind(item.location.longitude)
            .bind(item.severity.as_str())
            .bind(&item.payload)
            .bind(item.updated_at)
            .bind(commit.expected_version)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        AuditRepo::insert(&mut *tx, &commit.audit).await?;

        let spawned = match &commit.spawn {
            Some(spawn) => Some(Self::insert(&mut *tx, spawn).await?),
            None => None,
        };

        tx.commit().await?;
        Ok(Some((updated, spawned)))
    }

    /// Filtered listing, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkItemFilter,
        page: Page,
    ) -> Result<Vec<WorkItemRow>, sqlx::Error> {
        let published: Vec<&str> = WorkItemStatus::published()
            .into_iter()
            .map(WorkItemStatus::as_str)
            .collect();

        let query = format!(
            "SELECT {COLUMNS} FROM work_items \
             WHERE ($1::TEXT IS NULL OR kind = $1) \
               AND ($2::TEXT IS NULL OR status = $2) \
               AND ($3::BIGINT IS NULL OR owner_id = $3) \
               AND ($4::BIGINT IS NULL OR assignee_id = $4) \
               AND (NOT $5 OR status = ANY($6)) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, WorkItemRow>(&query)
            .bind(filter.kind.map(|k| k.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.owner_id)
            .bind(filter.assignee_id)
            .bind(filter.published_only)
            .bind(&published)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }
}
