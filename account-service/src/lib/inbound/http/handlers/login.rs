use axum::extract::State;
use common::ApiJson;
use common::BusinessError;
use common::ResponseEnvelope;
use serde::Serialize;

use crate::inbound::http::router::AppState;
use crate::login::models::AuthenticateRequest;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AuthenticateRequest>,
) -> Result<ResponseEnvelope<LoginResponseData>, BusinessError> {
    let access_token = state.login_pipelines.password.authenticate(&body).await?;

    Ok(ResponseEnvelope::ok(LoginResponseData::bearer(access_token)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: &'static str,
}

impl LoginResponseData {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer",
        }
    }
}
