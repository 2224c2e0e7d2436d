use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::errors::OauthResolveError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::NewAccount;
use crate::account::models::OauthIdentity;
use crate::account::models::RegisterAccountCommand;
use crate::account::models::Username;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new password account.
    ///
    /// # Arguments
    /// * `command` - Validated username, email and password
    ///
    /// # Returns
    /// Persisted account
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;

    /// Link the identity behind an OAuth access token to an account.
    ///
    /// Linking an identity that is already linked to the same account is a no-op.
    ///
    /// # Arguments
    /// * `id` - Account to link
    /// * `provider` - Configured OAuth provider name
    /// * `access_token` - Provider access token
    ///
    /// # Returns
    /// The linked identity
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `OauthResolve` - Token could not be resolved
    /// * `OauthIdentityAlreadyLinked` - Identity belongs to another account
    /// * `DatabaseError` - Database operation failed
    async fn link_oauth_identity(
        &self,
        id: &AccountId,
        provider: &str,
        access_token: &str,
    ) -> Result<OauthIdentity, AccountError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account, stamping its audit timestamps.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Account>, AccountError>;

    /// Account the identity is linked to, if any.
    async fn find_by_oauth_identity(
        &self,
        identity: &OauthIdentity,
    ) -> Result<Option<Account>, AccountError>;

    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `OauthIdentityAlreadyLinked` - Identity belongs to an account already
    /// * `DatabaseError` - Database operation failed
    async fn link_oauth_identity(
        &self,
        id: &AccountId,
        identity: &OauthIdentity,
    ) -> Result<(), AccountError>;

    /// Stamp `last_login_at` and refresh `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn record_login(&self, id: &AccountId, at: DateTime<Utc>) -> Result<(), AccountError>;
}

/// Resolves OAuth access tokens into provider identities.
#[async_trait]
pub trait OauthIdentityResolver: Send + Sync + 'static {
    /// Whether `provider` is configured.
    fn supports(&self, provider: &str) -> bool;

    /// # Errors
    /// * `UnsupportedProvider` - Provider is not configured
    /// * `Rejected` - Provider refused the token
    /// * `Unavailable` - Provider could not be reached or failed
    /// * `MalformedResponse` - Subject missing from the provider response
    async fn resolve(
        &self,
        provider: &str,
        access_token: &str,
    ) -> Result<OauthIdentity, OauthResolveError>;
}
