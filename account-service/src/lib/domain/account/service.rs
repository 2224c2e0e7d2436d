use std::sync::Arc;

use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::PasswordPolicyError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::NewAccount;
use crate::account::models::OauthIdentity;
use crate::account::models::RegisterAccountCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::ports::OauthIdentityResolver;

/// Domain service implementation for account operations.
pub struct AccountService<AR, IR>
where
    AR: AccountRepository,
    IR: OauthIdentityResolver,
{
    repository: Arc<AR>,
    identity_resolver: Arc<IR>,
    password_hasher: Arc<auth::PasswordHasher>,
}

impl<AR, IR> AccountService<AR, IR>
where
    AR: AccountRepository,
    IR: OauthIdentityResolver,
{
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `identity_resolver` - OAuth token resolver
    /// * `password_hasher` - Hasher shared with the password login strategy
    pub fn new(
        repository: Arc<AR>,
        identity_resolver: Arc<IR>,
        password_hasher: Arc<auth::PasswordHasher>,
    ) -> Self {
        Self {
            repository,
            identity_resolver,
            password_hasher,
        }
    }
}

#[async_trait]
impl<AR, IR> AccountServicePort for AccountService<AR, IR>
where
    AR: AccountRepository,
    IR: OauthIdentityResolver,
{
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError> {
        let password_hash = self
            .password_hasher
            .hash(command.password.expose())
            .map_err(|e| PasswordPolicyError::HashingFailed(e.to_string()))?;

        let account = self
            .repository
            .create(NewAccount {
                id: AccountId::new(),
                username: command.username,
                email: command.email,
                password_hash,
            })
            .await?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "Account registered"
        );

        Ok(account)
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn link_oauth_identity(
        &self,
        id: &AccountId,
        provider: &str,
        access_token: &str,
    ) -> Result<OauthIdentity, AccountError> {
        let account = self.get_account(id).await?;
        let identity = self
            .identity_resolver
            .resolve(provider, access_token)
            .await?;

        match self.repository.find_by_oauth_identity(&identity).await? {
            Some(owner) if owner.id == account.id => {
                tracing::debug!(account_id = %account.id, identity = %identity, "OAuth identity already linked");
                return Ok(identity);
            }
            Some(_) => return Err(AccountError::OauthIdentityAlreadyLinked(identity.to_string())),
            None => {}
        }

        self.repository
            .link_oauth_identity(&account.id, &identity)
            .await?;

        tracing::info!(account_id = %account.id, identity = %identity, "OAuth identity linked");

        Ok(identity)
    }
}
