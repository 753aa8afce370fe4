//! Users

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{camps::CampId, ids::TypedId};

/// User Id
pub type UserId = TypedId<User>;

/// Unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Session role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Ministry reviewer
    Ministry,

    /// Camp representative
    Camp,
}

impl Role {
    /// Claim value carried by the auth record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ministry => "ministry",
            Self::Camp => "camp",
        }
    }

    /// Display name for a signed-in user of this role.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ministry => "Администратор Министерства",
            Self::Camp => "Директор Лагеря",
        }
    }

    /// Display name for a locally synthesized offline user.
    #[must_use]
    pub const fn offline_display_name(self) -> &'static str {
        match self {
            Self::Ministry => "Министерство (Тест)",
            Self::Camp => "Лагерь (Тест)",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ministry" | "admin" => Ok(Self::Ministry),
            "camp" | "camp_user" => Ok(Self::Camp),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Signed-in user. Rebuilt on every login, never persisted by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account id
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Session role
    pub role: Role,

    /// Linked camp for camp representatives
    pub camp_id: Option<CampId>,

    /// Synthesized locally while the record store is unreachable
    pub offline: bool,
}

impl User {
    /// Whether the user may review the registry.
    pub fn is_ministry(&self) -> bool {
        self.role == Role::Ministry
    }

    /// Whether the user may edit `camp`.
    pub fn can_edit(&self, camp: &CampId) -> bool {
        match self.role {
            Role::Ministry => true,
            Role::Camp => self.camp_id.as_ref() == Some(camp),
        }
    }
}
