//! Repository for the `users` table.

use sqlx::{PgConnection, PgPool};

use lgu_core::account::AccountStatus;
use lgu_core::roles::{ROLE_ADMIN, ROLE_LGU_OFFICER};
use lgu_core::types::DbId;

use crate::models::user::{CreateUser, User};

const COLUMNS: &str = "id, username, email, full_name, password_hash, role, account_status, \
                       created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row. Runs on the caller's
    /// connection so the account audit entry can share the transaction.
    ///
    /// Duplicate usernames or emails fail on `uq_users_username` /
    /// `uq_users_email`.
    pub async fn create(conn: &mut PgConnection, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, full_name, password_hash, role, account_status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .bind(input.account_status.as_str())
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List users, optionally restricted to one account status, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<AccountStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE ($1::TEXT IS NULL OR account_status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(status.map(AccountStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Move an account from `current` to `next`.
    ///
    /// Conditional on the stored status so two admins acting at once cannot
    /// both apply. Returns `None` if the row no longer has `current`.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        current: AccountStatus,
        next: AccountStatus,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET account_status = $3, updated_at = NOW() \
             WHERE id = $1 AND account_status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(current.as_str())
            .bind(next.as_str())
            .fetch_optional(&mut *conn)
            .await
    }

    /// IDs of verified LGU officers and admins.
    pub async fn reviewer_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM users \
             WHERE role IN ($1, $2) AND account_status = $3 \
             ORDER BY id",
        )
        .bind(ROLE_LGU_OFFICER)
        .bind(ROLE_ADMIN)
        .bind(AccountStatus::Verified.as_str())
        .fetch_all(pool)
        .await
    }
}
