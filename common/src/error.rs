use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::http::status_for_code;
use crate::response::ResponseEnvelope;
use crate::response::DEFAULT_ERROR_CODE;

/// Boxed causal error kept for diagnostics.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

const FALLBACK_MESSAGE: &str = "Unexpected error";

/// Raised when a required construction argument is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    #[error("Business error message must not be blank")]
    BlankMessage,
}

/// Base error for business failures.
///
/// Carries exactly one [`ResponseEnvelope`] so the global handler can
/// surface code and message without re-deriving them, plus an optional
/// cause exposed through [`std::error::Error::source`].
#[derive(Debug)]
pub struct BusinessError {
    envelope: ResponseEnvelope<()>,
    cause: Option<BoxError>,
}

impl BusinessError {
    /// Business error with the default code (500).
    ///
    /// # Errors
    /// * `BlankMessage` - `message` is empty or whitespace only
    pub fn new(message: impl Into<String>) -> Result<Self, InvalidArgument> {
        Self::build(DEFAULT_ERROR_CODE, message.into(), None)
    }

    /// Business error with an explicit code.
    ///
    /// # Errors
    /// * `BlankMessage` - `message` is empty or whitespace only
    pub fn with_code(code: i32, message: impl Into<String>) -> Result<Self, InvalidArgument> {
        Self::build(code, message.into(), None)
    }

    /// Business error with the default code and a chained cause.
    ///
    /// # Errors
    /// * `BlankMessage` - `message` is empty or whitespace only
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Result<Self, InvalidArgument> {
        Self::build(DEFAULT_ERROR_CODE, message.into(), Some(cause.into()))
    }

    /// Business error with an explicit code and a chained cause.
    ///
    /// # Errors
    /// * `BlankMessage` - `message` is empty or whitespace only
    pub fn with_code_and_cause(
        code: i32,
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Result<Self, InvalidArgument> {
        Self::build(code, message.into(), Some(cause.into()))
    }

    /// Wrap an existing envelope, copying code and message verbatim.
    ///
    /// # Errors
    /// * `BlankMessage` - the envelope carries a blank message
    pub fn from_envelope(envelope: ResponseEnvelope<()>) -> Result<Self, InvalidArgument> {
        Self::wrap(envelope, None)
    }

    /// Wrap an existing envelope together with a cause.
    ///
    /// # Errors
    /// * `BlankMessage` - the envelope carries a blank message
    pub fn from_envelope_with_cause(
        envelope: ResponseEnvelope<()>,
        cause: impl Into<BoxError>,
    ) -> Result<Self, InvalidArgument> {
        Self::wrap(envelope, Some(cause.into()))
    }

    /// Convert a typed error, keeping it as the cause.
    ///
    /// The error's display text becomes the message; a blank one is replaced
    /// by the reason phrase of `code`, so this never fails.
    pub fn from_error<E>(code: i32, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut message = err.to_string();
        if message.trim().is_empty() {
            message = status_for_code(code)
                .and_then(|status| status.canonical_reason())
                .unwrap_or(FALLBACK_MESSAGE)
                .to_string();
        }

        Self {
            envelope: ResponseEnvelope::error_with_code(code, message),
            cause: Some(Box::new(err)),
        }
    }

    pub fn code(&self) -> i32 {
        self.envelope.code()
    }

    pub fn message(&self) -> &str {
        self.envelope.message()
    }

    /// Full envelope, ready for serialization by the global handler.
    pub fn envelope(&self) -> &ResponseEnvelope<()> {
        &self.envelope
    }

    pub fn into_envelope(self) -> ResponseEnvelope<()> {
        self.envelope
    }

    fn build(code: i32, message: String, cause: Option<BoxError>) -> Result<Self, InvalidArgument> {
        Self::wrap(ResponseEnvelope::error_with_code(code, message), cause)
    }

    fn wrap(
        envelope: ResponseEnvelope<()>,
        cause: Option<BoxError>,
    ) -> Result<Self, InvalidArgument> {
        if envelope.message().trim().is_empty() {
            return Err(InvalidArgument::BlankMessage);
        }

        Ok(Self { envelope, cause })
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl StdError for BusinessError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<InvalidArgument> for BusinessError {
    fn from(err: InvalidArgument) -> Self {
        Self::from_error(DEFAULT_ERROR_CODE, err)
    }
}
