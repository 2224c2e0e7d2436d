use axum::extract::State;
use common::ApiJson;
use common::BusinessError;
use common::ResponseEnvelope;

use super::login::LoginResponseData;
use crate::inbound::http::router::AppState;
use crate::login::models::OauthAuthenticateRequest;

pub async fn oauth_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OauthAuthenticateRequest>,
) -> Result<ResponseEnvelope<LoginResponseData>, BusinessError> {
    let access_token = state.login_pipelines.oauth.authenticate(&body).await?;

    Ok(ResponseEnvelope::ok(LoginResponseData::bearer(access_token)))
}
