//! The caller identity threaded explicitly into every engine and policy call.

use serde::{Deserialize, Serialize};

use crate::account::AccountStatus;
use crate::roles::Role;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
    pub account_status: AccountStatus,
}

impl Actor {
    pub fn new(id: DbId, role: Role, account_status: AccountStatus) -> Self {
        Self {
            id,
            role,
            account_status,
        }
    }

    /// A verified actor, the common case for anyone holding a valid token.
    pub fn verified(id: DbId, role: Role) -> Self {
        Self::new(id, role, AccountStatus::Verified)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
