use common::BusinessError;
use thiserror::Error;

/// Failure of any login pipeline step.
///
/// Collaborators return these directly; the pipeline propagates them
/// without wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid login request: {0}")]
    InvalidRequest(String),

    #[error("Login rejected by {hook}: {reason}")]
    Rejected { hook: String, reason: String },

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Collaborator failure: {0}")]
    Collaborator(String),
}

impl LoginError {
    /// Envelope code reported to clients.
    pub fn code(&self) -> i32 {
        match self {
            LoginError::InvalidCredentials | LoginError::AuthenticationFailed(_) => 401,
            LoginError::InvalidRequest(_) => 400,
            LoginError::Rejected { .. } => 403,
            LoginError::TokenIssuance(_) => 500,
            LoginError::Collaborator(_) => 502,
        }
    }
}

impl From<LoginError> for BusinessError {
    fn from(err: LoginError) -> Self {
        BusinessError::from_error(err.code(), err)
    }
}

/// Error for login event publication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventPublishError {
    #[error("Login event channel is closed")]
    ChannelClosed,

    #[error("Failed to publish login event: {0}")]
    PublishFailed(String),
}
