use std::sync::Arc;

use auth::LoginEventSink;
use auth::LoginPipeline;
use auth::PasswordHasher;
use auth::TokenIssuer;

use super::hooks::CredentialsPresentHook;
use super::hooks::LastLoginRecorder;
use super::hooks::LoginAuditHook;
use super::hooks::SupportedProviderHook;
use super::models::AuthenticateRequest;
use super::models::OauthAuthenticateRequest;
use super::strategies::OauthAuthenticationStrategy;
use super::strategies::PasswordAuthenticationStrategy;
use crate::account::ports::AccountRepository;
use crate::account::ports::OauthIdentityResolver;

pub type PasswordLoginPipeline = LoginPipeline<AuthenticateRequest>;
pub type OauthLoginPipeline = LoginPipeline<OauthAuthenticateRequest>;

/// Hook priorities; lower runs first.
pub mod priority {
    pub const VALIDATION: i32 = -100;
    pub const RECORD_LOGIN: i32 = 0;
    pub const AUDIT: i32 = 100;
}

/// The login pipelines served over HTTP.
#[derive(Clone)]
pub struct LoginPipelines {
    pub password: Arc<PasswordLoginPipeline>,
    pub oauth: Arc<OauthLoginPipeline>,
}

impl LoginPipelines {
    /// Wire both flavors with their strategies and built-in hooks.
    ///
    /// # Arguments
    /// * `repository` - Account lookups and last-login stamping
    /// * `identity_resolver` - OAuth token resolution
    /// * `password_hasher` - Same hasher the account service registers with
    /// * `token_issuer` - Session token minting
    /// * `events` - Login event sink shared by both flavors
    pub fn assemble<AR, IR>(
        repository: Arc<AR>,
        identity_resolver: Arc<IR>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<dyn TokenIssuer>,
        events: Arc<dyn LoginEventSink>,
    ) -> Self
    where
        AR: AccountRepository,
        IR: OauthIdentityResolver,
    {
        let last_login = Arc::new(LastLoginRecorder::new(Arc::clone(&repository)));

        let password = PasswordLoginPipeline::builder(
            "password",
            Arc::new(PasswordAuthenticationStrategy::new(
                Arc::clone(&repository),
                password_hasher,
            )),
            Arc::clone(&token_issuer),
            Arc::clone(&events),
        )
        .before(
            "credentials_present",
            priority::VALIDATION,
            Arc::new(CredentialsPresentHook),
        )
        .after("last_login", priority::RECORD_LOGIN, last_login.clone())
        .after(
            "audit",
            priority::AUDIT,
            Arc::new(LoginAuditHook::<AuthenticateRequest>::new("password")),
        )
        .build();

        let oauth = OauthLoginPipeline::builder(
            "oauth",
            Arc::new(OauthAuthenticationStrategy::new(
                repository,
                Arc::clone(&identity_resolver),
            )),
            token_issuer,
            events,
        )
        .before(
            "supported_provider",
            priority::VALIDATION,
            Arc::new(SupportedProviderHook::new(identity_resolver)),
        )
        .after("last_login", priority::RECORD_LOGIN, last_login)
        .after(
            "audit",
            priority::AUDIT,
            Arc::new(LoginAuditHook::<OauthAuthenticateRequest>::new("oauth")),
        )
        .build();

        Self {
            password: Arc::new(password),
            oauth: Arc::new(oauth),
        }
    }
}
