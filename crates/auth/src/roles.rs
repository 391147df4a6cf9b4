use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role claim carried by a verified identity.
///
/// The set is closed: roles are not ordered and do not imply each other. A
/// route either lists a role or it doesn't.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Applies for loans.
    User,
    /// Reviews loan applications.
    Officer,
    /// Approves loans and manages roles.
    Manager,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Officer, Role::Manager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Officer => "officer",
            Role::Manager => "manager",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "officer" => Ok(Role::Officer),
            "manager" => Ok(Role::Manager),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
