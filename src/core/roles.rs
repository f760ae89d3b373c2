// Caller roles and the role sets stored on documents

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Role entries as stored in `visibility.userTypes`, `permissions.canEdit`
/// and `permissions.canView`.
///
/// `All` only has meaning inside `userTypes`; `Public` inside `canView` is the
/// "anyone" sentinel. Stored values outside the known set deserialize into
/// `Unrecognized` and never match a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    All,
    Admin,
    Institution,
    Regular,
    Public,
    #[serde(other)]
    Unrecognized,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::All => "all",
            Role::Admin => "admin",
            Role::Institution => "institution",
            Role::Regular => "regular",
            Role::Public => "public",
            Role::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role a request is made under.
///
/// Anything outside the four known roles is kept verbatim as `Unrecognized`.
/// Such callers are not rejected up front; they simply match no role entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerRole {
    Admin,
    Institution,
    Regular,
    Public,
    Unrecognized(String),
}

impl ViewerRole {
    /// The stored role this caller matches, if any
    pub fn as_role(&self) -> Option<Role> {
        match self {
            ViewerRole::Admin => Some(Role::Admin),
            ViewerRole::Institution => Some(Role::Institution),
            ViewerRole::Regular => Some(Role::Regular),
            ViewerRole::Public => Some(Role::Public),
            ViewerRole::Unrecognized(_) => None,
        }
    }

    /// Membership test against a stored role list
    pub fn is_in(&self, roles: &[Role]) -> bool {
        self.as_role().is_some_and(|role| roles.contains(&role))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ViewerRole::Admin => "admin",
            ViewerRole::Institution => "institution",
            ViewerRole::Regular => "regular",
            ViewerRole::Public => "public",
            ViewerRole::Unrecognized(raw) => raw,
        }
    }
}

impl Default for ViewerRole {
    fn default() -> Self {
        ViewerRole::Public
    }
}

impl FromStr for ViewerRole {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "admin" => ViewerRole::Admin,
            "institution" => ViewerRole::Institution,
            "regular" => ViewerRole::Regular,
            "public" => ViewerRole::Public,
            _ => ViewerRole::Unrecognized(s.to_string()),
        })
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
