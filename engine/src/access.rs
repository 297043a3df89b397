//! Role-based capabilities for the listing screens.
//!
//! The caller's role is carried explicitly in an [`AccessContext`] rather
//! than looked up from ambient session state.

use crate::{EntityKind, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Accepts both the API's group names and English names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "administrador" | "administrator" | "admin" => Ok(Role::Administrator),
            "maestro" | "teacher" => Ok(Role::Teacher),
            "alumno" | "student" => Ok(Role::Student),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// What a role may do on one entity's screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        view: false,
        edit: false,
        delete: false,
    };

    pub const READ_ONLY: Capabilities = Capabilities {
        view: true,
        edit: false,
        delete: false,
    };

    pub const FULL: Capabilities = Capabilities {
        view: true,
        edit: true,
        delete: true,
    };

    /// Capability table.
    pub fn for_role(role: Role, entity: EntityKind) -> Self {
        match (entity, role) {
            (EntityKind::Administrators | EntityKind::Teachers, Role::Administrator) => Self::FULL,
            (EntityKind::Administrators | EntityKind::Teachers, _) => Self::READ_ONLY,
            (EntityKind::Students, Role::Administrator | Role::Teacher) => Self::FULL,
            (EntityKind::Students, Role::Student) => Self::READ_ONLY,
            (EntityKind::Subjects, Role::Administrator) => Self::FULL,
            (EntityKind::Subjects, Role::Teacher) => Self::READ_ONLY,
            (EntityKind::Subjects, Role::Student) => Self::NONE,
        }
    }
}

/// Caller identity passed into screen operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    pub role: Role,
    /// Session token forwarded to the data source, if any.
    pub token: Option<String>,
}

impl AccessContext {
    pub fn new(role: Role, token: Option<String>) -> Self {
        Self { role, token }
    }

    pub fn capabilities(&self, entity: EntityKind) -> Capabilities {
        Capabilities::for_role(self.role, entity)
    }
}
