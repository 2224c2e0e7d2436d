use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AfterAuthenticateHook;
use auth::BeforeAuthenticateHook;
use auth::LoginError;
use auth::LoginUser;
use chrono::Utc;

use super::models::AuthenticateRequest;
use super::models::OauthAuthenticateRequest;
use crate::account::models::AccountId;
use crate::account::ports::AccountRepository;
use crate::account::ports::OauthIdentityResolver;

/// Rejects password logins with a blank username or password before any
/// lookup happens.
#[derive(Debug, Default)]
pub struct CredentialsPresentHook;

#[async_trait]
impl BeforeAuthenticateHook<AuthenticateRequest> for CredentialsPresentHook {
    async fn before_authenticate(&self, request: &AuthenticateRequest) -> Result<(), LoginError> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(LoginError::InvalidRequest(
                "username and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rejects OAuth logins for providers that are not configured, or without
/// an access token.
pub struct SupportedProviderHook<IR: OauthIdentityResolver> {
    identity_resolver: Arc<IR>,
}

impl<IR: OauthIdentityResolver> SupportedProviderHook<IR> {
    pub fn new(identity_resolver: Arc<IR>) -> Self {
        Self { identity_resolver }
    }
}

#[async_trait]
impl<IR: OauthIdentityResolver> BeforeAuthenticateHook<OauthAuthenticateRequest>
    for SupportedProviderHook<IR>
{
    async fn before_authenticate(
        &self,
        request: &OauthAuthenticateRequest,
    ) -> Result<(), LoginError> {
        if !self.identity_resolver.supports(&request.provider) {
            return Err(LoginError::InvalidRequest(format!(
                "unsupported oauth provider: {}",
                request.provider
            )));
        }
        if request.access_token.trim().is_empty() {
            return Err(LoginError::InvalidRequest(
                "access_token is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stamps `last_login_at` on the account that just authenticated.
///
/// Storage failures are logged; the login still completes.
pub struct LastLoginRecorder<AR: AccountRepository> {
    repository: Arc<AR>,
}

impl<AR: AccountRepository> LastLoginRecorder<AR> {
    pub fn new(repository: Arc<AR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<AR, R> AfterAuthenticateHook<R> for LastLoginRecorder<AR>
where
    AR: AccountRepository,
    R: Send + Sync + 'static,
{
    async fn after_authenticate(&self, user: &LoginUser) {
        let account_id = match AccountId::from_string(&user.user_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "Cannot record login for non-account user");
                return;
            }
        };

        if let Err(e) = self.repository.record_login(&account_id, Utc::now()).await {
            tracing::error!(
                "Failed to record last login for account {}: {}",
                account_id,
                e
            );
        }
    }
}

/// Logs each authenticated user under this module's target. The audit
/// trail itself comes from the login event subscribers.
pub struct LoginAuditHook<R> {
    flavor: &'static str,
    _request: PhantomData<fn(&R)>,
}

impl<R> LoginAuditHook<R> {
    pub fn new(flavor: &'static str) -> Self {
        Self {
            flavor,
            _request: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Send + Sync + 'static> AfterAuthenticateHook<R> for LoginAuditHook<R> {
    async fn after_authenticate(&self, user: &LoginUser) {
        tracing::info!(
            flavor = self.flavor,
            user_id = %user.user_id,
            username = %user.username,
            grant_type = %user.grant_type,
            "User authenticated"
        );
    }
}
