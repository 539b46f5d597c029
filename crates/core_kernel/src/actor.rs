//! Caller identity
//!
//! Every core operation receives the acting user explicitly. There is no
//! ambient "current user" context: handlers extract the identity from the
//! bearer token and pass it down as an [`Actor`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identifiers::UserId;

/// Portal roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Taxpayer filing returns and paying service bills
    Client,
    /// Firm employee preparing and verifying returns
    Employee,
    /// Revenue officer issuing final decisions
    FbrOfficer,
}

impl Role {
    /// Returns the wire name used in token claims and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Employee => "employee",
            Role::FbrOfficer => "fbr",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a role string is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "employee" => Ok(Role::Employee),
            "fbr" => Ok(Role::FbrOfficer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated caller of a core operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier from the token subject
    pub user_id: UserId,
    /// Display name, recorded on messages and audit entries
    pub name: String,
    /// Role the caller holds
    pub role: Role,
}

impl Actor {
    /// Creates an actor
    pub fn new(user_id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
        }
    }

    /// Returns true if the actor holds the given role
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Client, Role::Employee, Role::FbrOfficer] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("auditor".parse::<Role>().is_err());
    }

    #[test]
    fn test_actor_has_role() {
        let actor = Actor::new(UserId::new(), "Sara Khan", Role::Employee);
        assert!(actor.has_role(Role::Employee));
        assert!(!actor.has_role(Role::Client));
    }
}
