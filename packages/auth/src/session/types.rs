// ABOUTME: Core type definitions for authenticated sessions
// ABOUTME: Users, provider sessions and credential payloads

use serde::{Deserialize, Serialize};

/// Optional profile data stored alongside the account
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Authenticated user as reported by the auth provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    /// Name to show in the UI: full name, then email, then the id
    pub fn display_name(&self) -> &str {
        self.user_metadata
            .full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Session issued by the auth provider after a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Result of a sign-up. `session` is present only when the provider
/// does not require email confirmation.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    pub session: Option<AuthSession>,
}

/// Email/password credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
