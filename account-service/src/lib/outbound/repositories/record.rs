use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use common::MetaFillError;
use common::MetaObject;
use serde_json::Value;
use uuid::Uuid;

use super::audit::CREATED_AT;
use super::audit::UPDATED_AT;
use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::NewAccount;
use crate::account::models::Username;

const LAST_LOGIN_AT: &str = "last_login_at";

/// Row shape of the `accounts` table.
///
/// Timestamps stay optional until the meta filler has run.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl AccountRecord {
    pub fn from_new(account: NewAccount) -> Self {
        Self {
            id: account.id.0,
            username: account.username.as_str().to_string(),
            email: account.email.as_str().to_string(),
            password_hash: account.password_hash,
            created_at: None,
            updated_at: None,
            last_login_at: None,
        }
    }

    /// Convert back into the domain entity.
    ///
    /// # Errors
    /// * `DatabaseError` - Audit timestamps are missing
    /// * `InvalidUsername` / `InvalidEmail` - Stored values fail validation
    pub fn into_account(self) -> Result<Account, AccountError> {
        let (Some(created_at), Some(updated_at)) = (self.created_at, self.updated_at) else {
            return Err(AccountError::DatabaseError(format!(
                "account {} has no audit timestamps",
                self.id
            )));
        };

        Ok(Account {
            id: AccountId(self.id),
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            created_at,
            updated_at,
            last_login_at: self.last_login_at,
        })
    }

    fn timestamp_slot(&mut self, field: &str) -> Option<&mut Option<DateTime<Utc>>> {
        match field {
            CREATED_AT => Some(&mut self.created_at),
            UPDATED_AT => Some(&mut self.updated_at),
            LAST_LOGIN_AT => Some(&mut self.last_login_at),
            _ => None,
        }
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            CREATED_AT => self.created_at,
            UPDATED_AT => self.updated_at,
            LAST_LOGIN_AT => self.last_login_at,
            _ => None,
        }
    }
}

impl MetaObject for AccountRecord {
    fn entity_name(&self) -> &str {
        "account"
    }

    fn has_field(&self, field: &str) -> bool {
        matches!(field, CREATED_AT | UPDATED_AT | LAST_LOGIN_AT)
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        self.timestamp(field)
            .map(|at| Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true)))
    }

    fn set_field_value(&mut self, field: &str, value: Value) -> Result<(), MetaFillError> {
        let parsed = serde_json::from_value::<DateTime<Utc>>(value).map_err(|e| {
            MetaFillError::InvalidValue {
                entity: "account".to_string(),
                field: field.to_string(),
                reason: e.to_string(),
            }
        })?;

        match self.timestamp_slot(field) {
            Some(slot) => {
                *slot = Some(parsed);
                Ok(())
            }
            None => Err(MetaFillError::InvalidValue {
                entity: "account".to_string(),
                field: field.to_string(),
                reason: "not a timestamp field".to_string(),
            }),
        }
    }
}
