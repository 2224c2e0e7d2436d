use axum::extract::State;
use axum::http::StatusCode;
use common::ApiJson;
use common::BusinessError;
use common::ResponseEnvelope;
use serde::Deserialize;
use thiserror::Error;

use super::AccountData;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UsernameError;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::models::RegisterAccountCommand;
use crate::account::models::Username;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterAccountRequest>,
) -> Result<(StatusCode, ResponseEnvelope<AccountData>), BusinessError> {
    let account = state
        .account_service
        .register(body.try_into_command()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        ResponseEnvelope::ok(AccountData::from(&account)),
    ))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterAccountRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterAccountRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl RegisterAccountRequest {
    fn try_into_command(self) -> Result<RegisterAccountCommand, ParseRegisterAccountRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(RegisterAccountCommand::new(username, email, password))
    }
}

impl From<ParseRegisterAccountRequestError> for BusinessError {
    fn from(err: ParseRegisterAccountRequestError) -> Self {
        BusinessError::from_error(422, err)
    }
}
