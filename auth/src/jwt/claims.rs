use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::GrantType;
use crate::pipeline::LoginUser;

/// Claims carried by session tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginClaims {
    /// Subject (user identifier)
    pub sub: String,

    pub username: String,

    /// Grant the session was opened with
    pub grant_type: GrantType,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,
}

impl LoginClaims {
    /// Claims for a freshly authenticated user.
    ///
    /// # Arguments
    /// * `user` - Verified user
    /// * `issuer` - Value of the `iss` claim
    /// * `expiration_hours` - Hours until the token expires
    pub fn for_login(user: &LoginUser, issuer: &str, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(expiration_hours);

        Self {
            sub: user.user_id.clone(),
            username: user.username.clone(),
            grant_type: user.grant_type.clone(),
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Rebuild the user the token was issued to.
    pub fn login_user(&self) -> LoginUser {
        LoginUser::new(&self.sub, self.username.clone(), self.grant_type.clone())
    }

    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
