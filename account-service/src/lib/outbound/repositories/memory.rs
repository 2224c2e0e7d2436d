use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use common::MetaFiller;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::audit::AuditTimestampsProvider;
use super::record::AccountRecord;
use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::NewAccount;
use crate::account::models::OauthIdentity;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;

#[derive(Default)]
struct Store {
    accounts: HashMap<Uuid, AccountRecord>,
    identities: HashMap<OauthIdentity, Uuid>,
}

/// Process-local account storage, used when no database is configured.
pub struct InMemoryAccountRepository {
    store: RwLock<Store>,
    filler: MetaFiller,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            filler: AuditTimestampsProvider::filler(),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn fill_failed(err: common::MetaFillError) -> AccountError {
    AccountError::DatabaseError(err.to_string())
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
        let mut store = self.store.write().await;

        for existing in store.accounts.values() {
            if existing.username == account.username.as_str() {
                return Err(AccountError::UsernameAlreadyExists(
                    account.username.to_string(),
                ));
            }
            if existing.email == account.email.as_str() {
                return Err(AccountError::EmailAlreadyExists(account.email.to_string()));
            }
        }

        let mut record = AccountRecord::from_new(account);
        self.filler.fill_insert(&mut record).map_err(fill_failed)?;

        store.accounts.insert(record.id, record.clone());
        record.into_account()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let store = self.store.read().await;
        store
            .accounts
            .get(&id.0)
            .cloned()
            .map(AccountRecord::into_account)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountError> {
        let store = self.store.read().await;
        store
            .accounts
            .values()
            .find(|record| record.username == username.as_str())
            .cloned()
            .map(AccountRecord::into_account)
            .transpose()
    }

    async fn find_by_oauth_identity(
        &self,
        identity: &OauthIdentity,
    ) -> Result<Option<Account>, AccountError> {
        let store = self.store.read().await;
        store
            .identities
            .get(identity)
            .and_then(|id| store.accounts.get(id))
            .cloned()
            .map(AccountRecord::into_account)
            .transpose()
    }

    async fn link_oauth_identity(
        &self,
        id: &AccountId,
        identity: &OauthIdentity,
    ) -> Result<(), AccountError> {
        let mut store = self.store.write().await;

        if !store.accounts.contains_key(&id.0) {
            return Err(AccountError::NotFound(id.to_string()));
        }
        if store.identities.contains_key(identity) {
            return Err(AccountError::OauthIdentityAlreadyLinked(identity.to_string()));
        }

        store.identities.insert(identity.clone(), id.0);
        Ok(())
    }

    async fn record_login(&self, id: &AccountId, at: DateTime<Utc>) -> Result<(), AccountError> {
        let mut store = self.store.write().await;
        let record = store
            .accounts
            .get_mut(&id.0)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        record.last_login_at = Some(at);
        self.filler.fill_update(record).map_err(fill_failed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::models::EmailAddress;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            id: AccountId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryAccountRepository::new();

        let created = repository
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        assert!(created.created_at <= created.updated_at);

        let by_id = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username.as_str(), "alice");

        let by_name = repository
            .find_by_username(&created.username)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, created.id);

        assert!(repository
            .find_by_id(&AccountId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let repository = InMemoryAccountRepository::new();
        repository
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(matches!(
            repository
                .create(new_account("alice", "other@example.com"))
                .await,
            Err(AccountError::UsernameAlreadyExists(_))
        ));
        assert!(matches!(
            repository
                .create(new_account("bob", "alice@example.com"))
                .await,
            Err(AccountError::EmailAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_link_and_find_by_identity() {
        let repository = InMemoryAccountRepository::new();
        let alice = repository
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        let bob = repository
            .create(new_account("bob", "bob@example.com"))
            .await
            .unwrap();
        let identity = OauthIdentity::new("github", "1234");

        repository
            .link_oauth_identity(&alice.id, &identity)
            .await
            .unwrap();

        let owner = repository
            .find_by_oauth_identity(&identity)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.id, alice.id);
        assert!(matches!(
            repository.link_oauth_identity(&bob.id, &identity).await,
            Err(AccountError::OauthIdentityAlreadyLinked(_))
        ));
        assert!(repository
            .find_by_oauth_identity(&OauthIdentity::new("google", "1234"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_record_login_refreshes_updated_at() {
        let repository = InMemoryAccountRepository::new();
        let created = repository
            .create(new_account("alice", "alice@example.com"))
            .await
            .unwrap();
        let at = Utc::now();

        repository.record_login(&created.id, at).await.unwrap();

        let account = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(account.last_login_at, Some(at));
        assert_eq!(account.created_at, created.created_at);
        assert!(account.updated_at >= created.updated_at);

        assert!(matches!(
            repository.record_login(&AccountId::new(), at).await,
            Err(AccountError::NotFound(_))
        ));
    }
}
