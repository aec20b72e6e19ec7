//! Repository for the append-only `audit_entries` table.

use sqlx::{PgConnection, PgPool};

use lgu_core::audit::NewAuditEntry;
use lgu_core::types::DbId;

use crate::models::audit::AuditRow;

const COLUMNS: &str = "id, work_item_id, actor_id, action, details, created_at";

pub struct AuditRepo;

impl AuditRepo {
    /// Append an entry inside the caller's transaction.
    pub async fn insert(conn: &mut PgConnection, entry: &NewAuditEntry) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO audit_entries (work_item_id, actor_id, action, details, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(entry.work_item_id)
        .bind(entry.actor_id)
        .bind(&entry.action)
        .bind(&entry.details)
        .bind(entry.created_at)
        .fetch_one(&mut *conn)
        .await
    }

    /// Every entry for a work item, in the order written.
    pub async fn list_for_work_item(
        pool: &PgPool,
        work_item_id: DbId,
    ) -> Result<Vec<AuditRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_entries \
             WHERE work_item_id = $1 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, AuditRow>(&query)
            .bind(work_item_id)
            .fetch_all(pool)
            .await
    }

    /// Entries not tied to a work item (account administration), newest first.
    pub async fn list_account_entries(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_entries \
             WHERE work_item_id IS NULL \
             ORDER BY id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AuditRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
