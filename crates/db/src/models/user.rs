//! User rows and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use lgu_core::account::AccountStatus;
use lgu_core::actor::Actor;
use lgu_core::error::CoreError;
use lgu_core::roles::Role;
use lgu_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash. Never serialize this; use [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub account_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The workflow identity of this user.
    pub fn actor(&self) -> Result<Actor, CoreError> {
        Ok(Actor::new(
            self.id,
            self.role.parse::<Role>()?,
            self.account_status.parse::<AccountStatus>()?,
        ))
    }
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub account_status: String,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            account_status: user.account_status,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub account_status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(role: &str, status: &str) -> User {
        User {
            id: 3,
            username: "jdelacruz".into(),
            email: "jdelacruz@example.ph".into(),
            full_name: "Juan dela Cruz".into(),
            password_hash: "$argon2id$...".into(),
            role: role.into(),
            account_status: status.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn builds_actor_from_row() {
        let actor = user("lgu_officer", "verified").actor().unwrap();
        assert_eq!(actor.role, Role::LguOfficer);
        assert_eq!(actor.account_status, AccountStatus::Verified);
    }

    #[test]
    fn unknown_role_fails() {
        assert!(user("mayor", "verified").actor().is_err());
    }

    #[test]
    fn response_drops_the_hash() {
        let json = serde_json::to_value(UserResponse::from(user("citizen", "pending"))).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["account_status"], "pending");
    }
}
