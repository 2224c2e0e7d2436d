use std::fmt;

use serde::Deserialize;

/// Username/password login request.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequest {
    pub username: String,
    pub password: String,
}

impl AuthenticateRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthenticateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticateRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Login with an access token issued by an OAuth provider.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct OauthAuthenticateRequest {
    pub provider: String,
    pub access_token: String,
}

impl OauthAuthenticateRequest {
    pub fn new(provider: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for OauthAuthenticateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OauthAuthenticateRequest")
            .field("provider", &self.provider)
            .field("access_token", &"***")
            .finish()
    }
}
