use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use common::MetaFiller;
use sqlx::PgPool;

use super::audit::AuditTimestampsProvider;
use super::record::AccountRecord;
use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::NewAccount;
use crate::account::models::OauthIdentity;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;

const SELECT_ACCOUNT: &str = r#"
    SELECT a.id, a.username, a.email, a.password_hash, a.created_at, a.updated_at, a.last_login_at
    FROM accounts a
"#;

pub struct PostgresAccountRepository {
    pool: PgPool,
    filler: MetaFiller,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            filler: AuditTimestampsProvider::filler(),
        }
    }

    async fn fetch_record(&self, id: &AccountId) -> Result<Option<AccountRecord>, AccountError> {
        sqlx::query_as::<_, AccountRecord>(&format!("{SELECT_ACCOUNT} WHERE a.id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }
}

fn database_error(err: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(err.to_string())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
        let mut record = AccountRecord::from_new(account);
        self.filler
            .fill_insert(&mut record)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(&record.username)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_username_key") {
                        return AccountError::UsernameAlreadyExists(record.username.clone());
                    }
                    if db_err.constraint() == Some("accounts_email_key") {
                        return AccountError::EmailAlreadyExists(record.email.clone());
                    }
                }
            }
            database_error(e)
        })?;

        record.into_account()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        self.fetch_record(id)
            .await?
            .map(AccountRecord::into_account)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountError> {
        sqlx::query_as::<_, AccountRecord>(&format!("{SELECT_ACCOUNT} WHERE a.username = $1"))
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(AccountRecord::into_account)
            .transpose()
    }

    async fn find_by_oauth_identity(
        &self,
        identity: &OauthIdentity,
    ) -> Result<Option<Account>, AccountError> {
        sqlx::query_as::<_, AccountRecord>(&format!(
            "{SELECT_ACCOUNT} JOIN account_oauth_identities i ON i.account_id = a.id \
             WHERE i.provider = $1 AND i.subject = $2"
        ))
        .bind(&identity.provider)
        .bind(&identity.subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(AccountRecord::into_account)
        .transpose()
    }

    async fn link_oauth_identity(
        &self,
        id: &AccountId,
        identity: &OauthIdentity,
    ) -> Result<(), AccountError> {
        sqlx::query(
            r#"
            INSERT INTO account_oauth_identities (provider, subject, account_id, linked_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&identity.provider)
        .bind(&identity.subject)
        .bind(id.0)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AccountError::OauthIdentityAlreadyLinked(identity.to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return AccountError::NotFound(id.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(())
    }

    async fn record_login(&self, id: &AccountId, at: DateTime<Utc>) -> Result<(), AccountError> {
        let mut record = self
            .fetch_record(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        record.last_login_at = Some(at);
        self.filler
            .fill_update(&mut record)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET last_login_at = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.last_login_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
