//! Profile Model

use serde::{Deserialize, Serialize};

/// Account role stored on the profile row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Profile row (`profiles` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// A row without a role is an ordinary user
    #[serde(default = "default_role", deserialize_with = "role_or_user")]
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
}

fn default_role() -> Role {
    Role::User
}

fn role_or_user<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let role = Option::<Role>::deserialize(deserializer)?;
    Ok(role.unwrap_or(Role::User))
}

impl Profile {
    /// Profile used when the signed-in user has no row
    pub fn unknown() -> Self {
        Self {
            role: Role::Unknown,
            email: None,
        }
    }
}
