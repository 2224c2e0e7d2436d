use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Tag naming the mechanism a user authenticated with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantType(String);

impl GrantType {
    pub const PASSWORD: &'static str = "password";
    const OAUTH_PREFIX: &'static str = "oauth2:";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Primary credential (username and password) grant.
    pub fn password() -> Self {
        Self(Self::PASSWORD.to_string())
    }

    /// OAuth grant for the given provider, e.g. `oauth2:github`.
    pub fn oauth(provider: &str) -> Self {
        Self(format!("{}{}", Self::OAUTH_PREFIX, provider))
    }

    pub fn is_oauth(&self) -> bool {
        self.0.starts_with(Self::OAUTH_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Verified identity produced by an authentication strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    pub user_id: String,
    pub username: String,
    pub grant_type: GrantType,
}

impl LoginUser {
    pub fn new(user_id: impl ToString, username: impl Into<String>, grant_type: GrantType) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.into(),
            grant_type,
        }
    }
}
