//! Shared building blocks for HTTP-facing services
//!
//! - [`ResponseEnvelope`]: the uniform `{code, message, data}` response shape
//! - [`BusinessError`]: a typed failure carrying its own envelope
//! - [`meta_fill`]: insert/update auto-fill contract for persistence adapters
//! - [`http`]: the global handler turning envelopes and business errors into
//!   responses, and [`ApiJson`] for bodies whose rejections become envelopes
//!
//! # Examples
//!
//! ```
//! use common::BusinessError;
//! use common::ResponseEnvelope;
//!
//! let ok = ResponseEnvelope::ok("payload");
//! assert_eq!(ok.code(), 200);
//!
//! let err = BusinessError::with_code(404, "Account not found").unwrap();
//! assert_eq!(err.code(), 404);
//! assert_eq!(err.envelope().message(), "Account not found");
//! ```

pub mod error;
pub mod http;
pub mod meta_fill;
pub mod response;

pub use error::BusinessError;
pub use error::InvalidArgument;
pub use http::ApiJson;
pub use meta_fill::FillFunction;
pub use meta_fill::FillFunctions;
pub use meta_fill::FillMode;
pub use meta_fill::MetaFillError;
pub use meta_fill::MetaFillProvider;
pub use meta_fill::MetaFiller;
pub use meta_fill::MetaObject;
pub use response::ResponseEnvelope;
