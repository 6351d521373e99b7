//! Portal roles and the permissions they carry.
//!
//! Role strings arrive from the auth provider in several spellings
//! (`"ADMIN"`, `"admin"`, `"guest"`). [`Role::normalize`] is the one place they
//! are converted; everything past the boundary works with the enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Public,
    Applicant,
    Committee,
    Admin,
}

impl Role {
    pub fn normalize(raw: &str) -> Result<Self, RoleParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "public" | "guest" => Ok(Self::Public),
            "applicant" => Ok(Self::Applicant),
            "committee" => Ok(Self::Committee),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError {
                value: raw.to_string(),
            }),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Public => "public",
            Role::Applicant => "applicant",
            Role::Committee => "committee",
            Role::Admin => "admin",
        }
    }

    pub const fn permissions(self) -> Permissions {
        match self {
            Role::Public => Permissions {
                can_submit: false,
                can_score: false,
                can_manage: false,
                can_export: false,
                can_vote: true,
                view_restricted: false,
            },
            Role::Applicant => Permissions {
                can_submit: true,
                can_score: false,
                can_manage: false,
                can_export: false,
                can_vote: true,
                view_restricted: false,
            },
            // Committee members abstain from the public vote.
            Role::Committee => Permissions {
                can_submit: false,
                can_score: true,
                can_manage: false,
                can_export: false,
                can_vote: false,
                view_restricted: true,
            },
            Role::Admin => Permissions {
                can_submit: true,
                can_score: true,
                can_manage: true,
                can_export: true,
                can_vote: true,
                view_restricted: true,
            },
        }
    }

    /// Landing dashboard after sign-in.
    pub const fn dashboard(self) -> Dashboard {
        match self {
            Role::Admin => Dashboard::Admin,
            Role::Committee => Dashboard::Committee,
            Role::Applicant | Role::Public => Dashboard::Applicant,
        }
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_submit: bool,
    pub can_score: bool,
    pub can_manage: bool,
    pub can_export: bool,
    pub can_vote: bool,
    pub view_restricted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    Admin,
    Committee,
    Applicant,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown portal role '{value}'")]
pub struct RoleParseError {
    pub value: String,
}
