//! Actor roles.
//!
//! The string forms must match the CHECK constraint on `users.role`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_CITIZEN: &str = "citizen";
pub const ROLE_ENGINEER: &str = "engineer";
pub const ROLE_LGU_OFFICER: &str = "lgu_officer";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_CITIZEN, ROLE_ENGINEER, ROLE_LGU_OFFICER, ROLE_ADMIN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Engineer,
    LguOfficer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Citizen => ROLE_CITIZEN,
            Role::Engineer => ROLE_ENGINEER,
            Role::LguOfficer => ROLE_LGU_OFFICER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Engineers and LGU officers: the roles that move work toward resolution.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Engineer | Role::LguOfficer)
    }

    /// Staff or admin.
    pub fn is_elevated(self) -> bool {
        self.is_staff() || self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CITIZEN => Ok(Role::Citizen),
            ROLE_ENGINEER => Ok(Role::Engineer),
            ROLE_LGU_OFFICER => Ok(Role::LguOfficer),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::unknown("role", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_valid_role_parses() {
        for name in VALID_ROLES {
            let role: Role = name.parse().expect("valid role should parse");
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn only_engineer_and_officer_are_staff() {
        assert!(Role::Engineer.is_staff());
        assert!(Role::LguOfficer.is_staff());
        assert!(!Role::Citizen.is_staff());
        assert!(!Role::Admin.is_staff());
        assert!(Role::Admin.is_elevated());
        assert!(!Role::Citizen.is_elevated());
    }
}
