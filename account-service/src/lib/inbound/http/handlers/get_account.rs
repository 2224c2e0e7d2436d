use axum::extract::State;
use axum::Extension;
use common::BusinessError;
use common::ResponseEnvelope;

use super::AccountData;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

/// Account of the bearer of the session token.
pub async fn get_account(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedAccount>,
) -> Result<ResponseEnvelope<AccountData>, BusinessError> {
    let account = state
        .account_service
        .get_account(&authenticated.account_id)
        .await?;

    Ok(ResponseEnvelope::ok(AccountData::from(&account)))
}
