//! Role model and authorization rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of account roles.
///
/// Admins manage user accounts; they hold no special power over links and
/// see only their own, exactly like a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated caller identity, attached to requests by the bearer
/// middleware after token verification and the user-existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// Everything a caller can attempt against a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateLink,
    ViewLink,
    UpdateLink,
    DeleteLink,
    ListUsers,
    UpdateUser,
    DeleteUser,
}

/// Pure authorization decision.
///
/// `resource_owner_id` is the id of the account the action targets (the
/// link's owner, the user row being changed); for owner-less actions the
/// caller passes their own id. Callers translate `false` into `Forbidden`,
/// except on link paths where ownership mismatches are masked as `NotFound`.
pub fn permits(role: Role, action: Action, resource_owner_id: Uuid, caller_id: Uuid) -> bool {
    match action {
        Action::CreateLink => true,
        Action::ViewLink | Action::UpdateLink | Action::DeleteLink => {
            resource_owner_id == caller_id
        }
        Action::ListUsers => role == Role::Admin,
        Action::UpdateUser => resource_owner_id == caller_id,
        // Admins may remove any account except their own.
        Action::DeleteUser => role == Role::Admin && resource_owner_id != caller_id,
    }
}
