//! Actor roles and explicit role dispatch.
//!
//! Every authenticated caller is resolved to an [`Actor`] up front. Decision
//! points match on the variants exhaustively instead of probing for an
//! optional profile.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Role assigned to a user through its profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    Volunteer,
    Administrator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Volunteer => "volunteer",
            Self::Administrator => "administrator",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "donor" => Ok(Self::Donor),
            "volunteer" => Ok(Self::Volunteer),
            "administrator" => Ok(Self::Administrator),
            other => Err(EngineError::InvalidName(format!("invalid role: {other}"))),
        }
    }
}

/// An authenticated caller with its role resolved.
///
/// `Unassigned` covers users whose profile row is missing; they can
/// authenticate but are rejected at every role-guarded operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Donor { username: String },
    Volunteer { username: String },
    Administrator { username: String },
    Unassigned { username: String },
}

impl Actor {
    pub fn from_role(username: String, role: Option<Role>) -> Self {
        match role {
            Some(Role::Donor) => Self::Donor { username },
            Some(Role::Volunteer) => Self::Volunteer { username },
            Some(Role::Administrator) => Self::Administrator { username },
            None => Self::Unassigned { username },
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Self::Donor { username }
            | Self::Volunteer { username }
            | Self::Administrator { username }
            | Self::Unassigned { username } => username,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Donor { .. } => Some(Role::Donor),
            Self::Volunteer { .. } => Some(Role::Volunteer),
            Self::Administrator { .. } => Some(Role::Administrator),
            Self::Unassigned { .. } => None,
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, Self::Administrator { .. })
    }
}
