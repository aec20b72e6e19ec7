//! Repository for `work_item_code_sequences`.

use sqlx::PgConnection;

/// Allocates the `NNN` part of external codes.
pub struct CodeSequenceRepo;

impl CodeSequenceRepo {
    /// Reserve the next sequence number for `(prefix, year)`, starting at 1.
    ///
    /// The upsert takes a row lock on the counter, so concurrent callers in
    /// separate transactions receive distinct values.
    pub async fn next(conn: &mut PgConnection, prefix: &str, year: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO work_item_code_sequences (prefix, year, last_value) \
             VALUES ($1, $2, 1) \
             ON CONFLICT (prefix, year) \
             DO UPDATE SET last_value = work_item_code_sequences.last_value + 1 \
             RETURNING last_value",
        )
        .bind(prefix)
        .bind(year)
        .fetch_one(&mut *conn)
        .await
    }
}
