//! Account status values and the admin approval transitions between them.
//!
//! Accounts are never deleted. Self-registered citizens start `pending` and
//! only an admin can move an account between statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_VERIFIED: &str = "verified";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_DEACTIVATED: &str = "deactivated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Verified,
    Rejected,
    Deactivated,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Pending => STATUS_PENDING,
            AccountStatus::Verified => STATUS_VERIFIED,
            AccountStatus::Rejected => STATUS_REJECTED,
            AccountStatus::Deactivated => STATUS_DEACTIVATED,
        }
    }

    /// Statuses an admin may move an account to from `self`.
    ///
    /// - `pending`     -> `verified`, `rejected`
    /// - `verified`    -> `deactivated`
    /// - `deactivated` -> `verified` (reactivate)
    /// - `rejected`    -> nothing
    pub fn allowed_next(self) -> &'static [AccountStatus] {
        match self {
            AccountStatus::Pending => &[AccountStatus::Verified, AccountStatus::Rejected],
            AccountStatus::Verified => &[AccountStatus::Deactivated],
            AccountStatus::Deactivated => &[AccountStatus::Verified],
            AccountStatus::Rejected => &[],
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(AccountStatus::Pending),
            STATUS_VERIFIED => Ok(AccountStatus::Verified),
            STATUS_REJECTED => Ok(AccountStatus::Rejected),
            STATUS_DEACTIVATED => Ok(AccountStatus::Deactivated),
            other => Err(CoreError::unknown("account status", other)),
        }
    }
}

/// Validate that an admin may move an account from `current` to `next`.
pub fn validate_transition(current: AccountStatus, next: AccountStatus) -> Result<(), CoreError> {
    if current.allowed_next().contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot change account status from '{current}' to '{next}'"
        )))
    }
}
