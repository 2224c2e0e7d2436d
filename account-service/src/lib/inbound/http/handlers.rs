use chrono::DateTime;
use chrono::Utc;
use common::BusinessError;
use serde::Serialize;

use crate::account::errors::AccountError;
use crate::account::errors::OauthResolveError;
use crate::account::errors::PasswordPolicyError;
use crate::account::models::Account;

pub mod get_account;
pub mod link_oauth;
pub mod login;
pub mod oauth_login;
pub mod register;

impl From<AccountError> for BusinessError {
    fn from(err: AccountError) -> Self {
        let code = match &err {
            AccountError::NotFound(_) => 404,
            AccountError::UsernameAlreadyExists(_)
            | AccountError::EmailAlreadyExists(_)
            | AccountError::OauthIdentityAlreadyLinked(_) => 409,
            AccountError::InvalidUsername(_)
            | AccountError::InvalidEmail(_)
            | AccountError::InvalidAccountId(_)
            | AccountError::Password(PasswordPolicyError::TooShort { .. }) => 422,
            AccountError::OauthResolve(OauthResolveError::UnsupportedProvider(_)) => 400,
            AccountError::OauthResolve(OauthResolveError::Rejected(_)) => 401,
            AccountError::OauthResolve(_) => 502,
            AccountError::Password(PasswordPolicyError::HashingFailed(_))
            | AccountError::DatabaseError(_) => 500,
        };
        BusinessError::from_error(code, err)
    }
}

/// Account as exposed over HTTP; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.as_str().to_string(),
            email: account.email.as_str().to_string(),
            created_at: account.created_at,
            updated_at: account.updated_at,
            last_login_at: account.last_login_at,
        }
    }
}
