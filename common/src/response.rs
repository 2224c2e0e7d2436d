use serde::Serialize;
use serde::Serializer;

/// Code reported by every successful envelope.
pub const SUCCESS_CODE: i32 = 200;

/// Message reported by every successful envelope.
pub const SUCCESS_MESSAGE: &str = "OK";

/// Code used when an error is raised without an explicit one.
pub const DEFAULT_ERROR_CODE: i32 = 500;

/// Uniform response shape returned to clients.
///
/// Serialized as `{"code": .., "message": .., "data": ..}` with `data`
/// omitted when there is no payload. Codes follow an HTTP-status-like
/// convention that is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope<T> {
    Success { data: Option<T> },
    Error { code: i32, message: String },
}

impl<T> ResponseEnvelope<T> {
    /// Successful envelope with an optional payload.
    pub fn success(data: Option<T>) -> Self {
        Self::Success { data }
    }

    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self::Success { data: Some(data) }
    }

    /// Error envelope with the default code (500).
    pub fn error(message: impl Into<String>) -> Self {
        Self::error_with_code(DEFAULT_ERROR_CODE, message)
    }

    /// Error envelope with a caller-chosen code.
    pub fn error_with_code(code: i32, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Success { .. } => SUCCESS_CODE,
            Self::Error { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { .. } => SUCCESS_MESSAGE,
            Self::Error { message, .. } => message,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => data.as_ref(),
            Self::Error { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data } => data,
            Self::Error { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Serialize)]
struct WireEnvelope<'a, T> {
    code: i32,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

impl<T: Serialize> Serialize for ResponseEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireEnvelope {
            code: self.code(),
            message: self.message(),
            data: self.data(),
        }
        .serialize(serializer)
    }
}
