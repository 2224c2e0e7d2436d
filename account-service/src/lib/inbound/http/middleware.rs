use auth::GrantType;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use common::BusinessError;
use thiserror::Error;

use crate::account::models::AccountId;
use crate::inbound::http::router::AppState;

/// Caller identity taken from a verified session token
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub username: String,
    pub grant_type: GrantType,
}

#[derive(Debug, Error)]
enum AuthorizationError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] JwtError),

    #[error("Invalid token format")]
    InvalidSubject,
}

impl From<AuthorizationError> for BusinessError {
    fn from(err: AuthorizationError) -> Self {
        BusinessError::from_error(401, err)
    }
}

/// Middleware that validates session tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, BusinessError> {
    let token = extract_token_from_header(&req)?;

    let claims = state.jwt_codec.decode(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        AuthorizationError::InvalidToken(e)
    })?;

    let account_id = AccountId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!("Token subject is not an account id: {}", e);
        AuthorizationError::InvalidSubject
    })?;

    req.extensions_mut().insert(AuthenticatedAccount {
        account_id,
        username: claims.username,
        grant_type: claims.grant_type,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, AuthorizationError> {
    let auth_str = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthorizationError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthorizationError::MalformedHeader)?;

    auth_str
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthorizationError::MalformedHeader)
}
