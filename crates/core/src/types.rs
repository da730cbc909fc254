//! Identity and credential types shared across the console.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display};

/// Permission marker that grants every permission check.
pub const WILDCARD_PERMISSION: &str = "*";

/// Which side of the console a user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Platform,
    Merchant,
}

impl Role {
    /// Stable string form used in persisted storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Merchant => "merchant",
        }
    }

    /// Parse the persisted string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "platform" => Some(Self::Platform),
            "merchant" => Some(Self::Merchant),
            _ => None,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of the logged-in user.
///
/// Field spellings on the wire (`name`, `type`, `merchantId`) match the
/// identity JSON the console persists under [`crate::SessionKeys::USER_INFO`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: u64,
    pub username: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(rename = "merchantId", default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<u64>,
    #[serde(default)]
    pub permissions: HashSet<String>,
}

impl UserInfo {
    /// True when the user holds `permission`, honoring the wildcard marker.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(WILDCARD_PERMISSION) || self.permissions.contains(permission)
    }
}

/// Login form input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
