use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationStrategy;
use auth::GrantType;
use auth::LoginError;
use auth::LoginUser;
use auth::PasswordError;
use auth::PasswordHasher;

use super::models::AuthenticateRequest;
use super::models::OauthAuthenticateRequest;
use crate::account::errors::AccountError;
use crate::account::errors::OauthResolveError;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;
use crate::account::ports::OauthIdentityResolver;

/// Verifies a username and password against the stored Argon2 hash.
///
/// Unknown usernames and wrong passwords fail alike with
/// `InvalidCredentials`.
pub struct PasswordAuthenticationStrategy<AR: AccountRepository> {
    repository: Arc<AR>,
    password_hasher: Arc<PasswordHasher>,
}

impl<AR: AccountRepository> PasswordAuthenticationStrategy<AR> {
    pub fn new(repository: Arc<AR>, password_hasher: Arc<PasswordHasher>) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    fn reject_unknown(&self, password: &str) -> LoginError {
        self.password_hasher.verify_decoy(password);
        LoginError::InvalidCredentials
    }
}

#[async_trait]
impl<AR: AccountRepository> AuthenticationStrategy<AuthenticateRequest>
    for PasswordAuthenticationStrategy<AR>
{
    async fn authenticate(&self, request: &AuthenticateRequest) -> Result<LoginUser, LoginError> {
        let Ok(username) = Username::new(request.username.clone()) else {
            return Err(self.reject_unknown(&request.password));
        };

        let account = match self.repository.find_by_username(&username).await {
            Ok(Some(account)) => account,
            Ok(None) => return Err(self.reject_unknown(&request.password)),
            Err(e) => return Err(collaborator_failure(e)),
        };

        match self
            .password_hasher
            .verify(&request.password, &account.password_hash)
        {
            Ok(()) => Ok(LoginUser::new(
                account.id,
                account.username.as_str(),
                GrantType::password(),
            )),
            Err(PasswordError::Mismatch) => Err(LoginError::InvalidCredentials),
            Err(e) => {
                tracing::error!(account_id = %account.id, error = %e, "Stored password hash is unusable");
                Err(LoginError::Collaborator(e.to_string()))
            }
        }
    }
}

/// Resolves the provider identity behind an access token and maps it to
/// the account it is linked to.
pub struct OauthAuthenticationStrategy<AR, IR>
where
    AR: AccountRepository,
    IR: OauthIdentityResolver,
{
    repository: Arc<AR>,
    identity_resolver: Arc<IR>,
}

impl<AR, IR> OauthAuthenticationStrategy<AR, IR>
where
    AR: AccountRepository,
    IR: OauthIdentityResolver,
{
    pub fn new(repository: Arc<AR>, identity_resolver: Arc<IR>) -> Self {
        Self {
            repository,
            identity_resolver,
        }
    }
}

#[async_trait]
impl<AR, IR> AuthenticationStrategy<OauthAuthenticateRequest> for OauthAuthenticationStrategy<AR, IR>
where
    AR: AccountRepository,
    IR: OauthIdentityResolver,
{
    async fn authenticate(
        &self,
        request: &OauthAuthenticateRequest,
    ) -> Result<LoginUser, LoginError> {
        let identity = self
            .identity_resolver
            .resolve(&request.provider, &request.access_token)
            .await
            .map_err(|e| match e {
                OauthResolveError::UnsupportedProvider(_) => {
                    LoginError::InvalidRequest(e.to_string())
                }
                OauthResolveError::Rejected(_) => LoginError::InvalidCredentials,
                OauthResolveError::Unavailable(_) | OauthResolveError::MalformedResponse(_) => {
                    LoginError::Collaborator(e.to_string())
                }
            })?;

        let account = self
            .repository
            .find_by_oauth_identity(&identity)
            .await
            .map_err(collaborator_failure)?
            .ok_or_else(|| {
                LoginError::AuthenticationFailed(format!(
                    "no account is linked to this {} identity",
                    identity.provider
                ))
            })?;

        Ok(LoginUser::new(
            account.id,
            account.username.as_str(),
            GrantType::oauth(&identity.provider),
        ))
    }
}

fn collaborator_failure(err: AccountError) -> LoginError {
    tracing::error!(error = %err, "Account lookup failed during login");
    LoginError::Collaborator(err.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::account::models::Account;
    use crate::account::models::AccountId;
    use crate::account::models::EmailAddress;
    use crate::account::models::NewAccount;
    use crate::account::models::OauthIdentity;

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AccountError>;
            async fn find_by_oauth_identity(&self, identity: &OauthIdentity) -> Result<Option<Account>, AccountError>;
            async fn link_oauth_identity(&self, id: &AccountId, identity: &OauthIdentity) -> Result<(), AccountError>;
            async fn record_login(&self, id: &AccountId, at: DateTime<Utc>) -> Result<(), AccountError>;
        }
    }

    mock! {
        pub TestIdentityResolver {}

        #[async_trait]
        impl OauthIdentityResolver for TestIdentityResolver {
            fn supports(&self, provider: &str) -> bool;
            async fn resolve(&self, provider: &str, access_token: &str) -> Result<OauthIdentity, OauthResolveError>;
        }
    }

    fn account_with_password(hasher: &PasswordHasher, password: &str) -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: hasher.hash(password).unwrap(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn test_password_strategy_success() {
        let hasher = Arc::new(PasswordHasher::new());
        let account = account_with_password(&hasher, "password123");
        let account_id = account.id;
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let strategy = PasswordAuthenticationStrategy::new(Arc::new(repository), hasher);

        let user = strategy
            .authenticate(&AuthenticateRequest::new("alice", "password123"))
            .await
            .unwrap();

        assert_eq!(user.user_id, account_id.to_string());
        assert_eq!(user.username, "alice");
        assert_eq!(user.grant_type, GrantType::password());
    }

    #[tokio::test]
    async fn test_password_strategy_wrong_password() {
        let hasher = Arc::new(PasswordHasher::new());
        let account = account_with_password(&hasher, "password123");
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(account.clone())));

        let strategy = PasswordAuthenticationStrategy::new(Arc::new(repository), hasher);

        assert_eq!(
            strategy
                .authenticate(&AuthenticateRequest::new("alice", "wrong-password"))
                .await,
            Err(LoginError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_password_strategy_unknown_user_looks_like_wrong_password() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let strategy = PasswordAuthenticationStrategy::new(
            Arc::new(repository),
            Arc::new(PasswordHasher::new()),
        );

        assert_eq!(
            strategy
                .authenticate(&AuthenticateRequest::new("nobody", "password123"))
                .await,
            Err(LoginError::InvalidCredentials)
        );
        // Not a valid username at all: no lookup, same answer.
        assert_eq!(
            strategy
                .authenticate(&AuthenticateRequest::new("no", "password123"))
                .await,
            Err(LoginError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_password_strategy_database_failure() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Err(AccountError::DatabaseError("connection reset".to_string())));

        let strategy = PasswordAuthenticationStrategy::new(
            Arc::new(repository),
            Arc::new(PasswordHasher::new()),
        );

        assert!(matches!(
            strategy
                .authenticate(&AuthenticateRequest::new("alice", "password123"))
                .await,
            Err(LoginError::Collaborator(_))
        ));
    }

    #[tokio::test]
    async fn test_oauth_strategy_success() {
        let hasher = PasswordHasher::new();
        let account = account_with_password(&hasher, "password123");
        let account_id = account.id;
        let mut repository = MockTestAccountRepository::new();
        let mut resolver = MockTestIdentityResolver::new();

        resolver
            .expect_resolve()
            .withf(|provider, token| provider == "github" && token == "gh-token")
            .times(1)
            .returning(|provider, _| Ok(OauthIdentity::new(provider, "1234")));
        repository
            .expect_find_by_oauth_identity()
            .withf(|identity| identity == &OauthIdentity::new("github", "1234"))
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let strategy = OauthAuthenticationStrategy::new(Arc::new(repository), Arc::new(resolver));

        let user = strategy
            .authenticate(&OauthAuthenticateRequest::new("github", "gh-token"))
            .await
            .unwrap();

        assert_eq!(user.user_id, account_id.to_string());
        assert_eq!(user.grant_type.as_str(), "oauth2:github");
    }

    #[tokio::test]
    async fn test_oauth_strategy_unlinked_identity() {
        let mut repository = MockTestAccountRepository::new();
        let mut resolver = MockTestIdentityResolver::new();

        resolver
            .expect_resolve()
            .returning(|provider, _| Ok(OauthIdentity::new(provider, "1234")));
        repository
            .expect_find_by_oauth_identity()
            .returning(|_| Ok(None));

        let strategy = OauthAuthenticationStrategy::new(Arc::new(repository), Arc::new(resolver));

        assert!(matches!(
            strategy
                .authenticate(&OauthAuthenticateRequest::new("github", "gh-token"))
                .await,
            Err(LoginError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_oauth_strategy_maps_resolver_errors() {
        let cases = vec![
            (
                OauthResolveError::Rejected("github".to_string()),
                LoginError::InvalidCredentials,
            ),
            (
                OauthResolveError::UnsupportedProvider("gitlab".to_string()),
                LoginError::InvalidRequest("Unsupported OAuth provider: gitlab".to_string()),
            ),
            (
                OauthResolveError::Unavailable("timeout".to_string()),
                LoginError::Collaborator("OAuth provider unavailable: timeout".to_string()),
            ),
        ];

        for (resolver_error, expected) in cases {
            let mut resolver = MockTestIdentityResolver::new();
            resolver
                .expect_resolve()
                .returning(move |_, _| Err(resolver_error.clone()));
            let mut repository = MockTestAccountRepository::new();
            repository.expect_find_by_oauth_identity().times(0);

            let strategy =
                OauthAuthenticationStrategy::new(Arc::new(repository), Arc::new(resolver));

            assert_eq!(
                strategy
                    .authenticate(&OauthAuthenticateRequest::new("github", "gh-token"))
                    .await,
                Err(expected)
            );
        }
    }
}
