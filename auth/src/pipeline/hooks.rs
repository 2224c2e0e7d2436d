use async_trait::async_trait;

use super::errors::LoginError;
use super::user::LoginUser;

/// Runs before the strategy for requests of type `R`.
///
/// Every registered hook sees the same request instance. Returning an
/// error aborts the login.
#[async_trait]
pub trait BeforeAuthenticateHook<R>: Send + Sync + 'static {
    async fn before_authenticate(&self, request: &R) -> Result<(), LoginError>;
}

/// Runs after a request of type `R` authenticated.
///
/// Hooks observe the verified user but cannot replace it or stop the
/// login; failures are theirs to report.
#[async_trait]
pub trait AfterAuthenticateHook<R>: Send + Sync + 'static {
    async fn after_authenticate(&self, user: &LoginUser);
}
