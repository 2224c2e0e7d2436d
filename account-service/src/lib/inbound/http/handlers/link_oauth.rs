use axum::extract::State;
use axum::Extension;
use common::ApiJson;
use common::BusinessError;
use common::ResponseEnvelope;
use serde::Serialize;

use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;
use crate::login::models::OauthAuthenticateRequest;

/// Link the provider identity behind `access_token` to the caller's account,
/// enabling OAuth login for it.
pub async fn link_oauth(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedAccount>,
    ApiJson(body): ApiJson<OauthAuthenticateRequest>,
) -> Result<ResponseEnvelope<LinkedIdentityData>, BusinessError> {
    let identity = state
        .account_service
        .link_oauth_identity(
            &authenticated.account_id,
            &body.provider,
            &body.access_token,
        )
        .await?;

    Ok(ResponseEnvelope::ok(LinkedIdentityData {
        provider: identity.provider,
        subject: identity.subject,
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedIdentityData {
    pub provider: String,
    pub subject: String,
}
