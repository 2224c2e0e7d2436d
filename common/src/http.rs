use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::error::BusinessError;
use crate::response::ResponseEnvelope;

/// Map an envelope code onto an HTTP status when it is one.
pub fn status_for_code(code: i32) -> Option<StatusCode> {
    u16::try_from(code)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
}

/// HTTP status used on the wire: the code itself, or 500 for
/// application-level codes outside the HTTP range.
pub fn response_status(code: i32) -> StatusCode {
    status_for_code(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl<T: Serialize> IntoResponse for ResponseEnvelope<T> {
    fn into_response(self) -> Response {
        (response_status(self.code()), Json(self)).into_response()
    }
}

/// Global handler: every business error leaves the service as its envelope.
impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        let status = response_status(self.code());

        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                cause = ?std::error::Error::source(&self).map(|c| c.to_string()),
                "Request failed: {}",
                self.message()
            );
        } else {
            tracing::warn!(code = self.code(), "Request rejected: {}", self.message());
        }

        (status, Json(self.into_envelope())).into_response()
    }
}

/// JSON body extractor whose rejections are rendered as envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BusinessError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Error)]
#[error("{detail}")]
struct InvalidBody {
    detail: String,
    #[source]
    rejection: JsonRejection,
}

impl From<JsonRejection> for BusinessError {
    fn from(rejection: JsonRejection) -> Self {
        let code = i32::from(rejection.status().as_u16());
        let invalid = InvalidBody {
            detail: rejection.body_text(),
            rejection,
        };

        BusinessError::from_error(code, invalid)
    }
}
