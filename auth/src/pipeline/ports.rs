use async_trait::async_trait;

use super::errors::EventPublishError;
use super::errors::LoginError;
use super::event::LoginEvent;
use super::user::LoginUser;

/// Verifies one flavor of login request.
#[async_trait]
pub trait AuthenticationStrategy<R>: Send + Sync + 'static {
    /// Verify `request` and produce the authenticated user.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Credentials or grant were rejected
    /// * `AuthenticationFailed` - Verification could not identify a user
    async fn authenticate(&self, request: &R) -> Result<LoginUser, LoginError>;
}

/// Mints session tokens for verified users.
#[async_trait]
pub trait TokenIssuer: Send + Sync + 'static {
    /// # Errors
    /// * `TokenIssuance` - The token could not be produced
    async fn create_token(&self, user: &LoginUser) -> Result<String, LoginError>;
}

/// Receives login notifications. Publication must not block the caller.
pub trait LoginEventSink: Send + Sync + 'static {
    fn publish(&self, event: LoginEvent) -> Result<(), EventPublishError>;
}
