//! Auth DTOs shared between the client and its callers
//!
//! Shapes follow the backend's auth service (password grant, signup, user).

use serde::{Deserialize, Serialize};

/// Email/password credentials, used for both sign-in and sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

/// Authenticated user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session returned by a successful password grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token` in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Sign-up response
///
/// When email confirmation is enabled no session is issued and only the user
/// is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

impl SignUpResponse {
    pub fn user(&self) -> &AuthUser {
        match self {
            Self::Session(s) => &s.user,
            Self::User(u) => u,
        }
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::Session(s) => Some(s),
            Self::User(_) => None,
        }
    }
}
