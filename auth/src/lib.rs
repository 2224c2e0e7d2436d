//! Authentication building blocks for services
//!
//! - Login orchestration ([`LoginPipeline`]): before-hooks, a pluggable
//!   strategy, after-hooks, token issuance and a login event
//! - Session tokens (JWT, HS256) and a [`TokenIssuer`] built on them
//! - Password hashing (Argon2id)
//!
//! The pipeline only sequences collaborators; credential checks and token
//! signing live in the strategies and issuers a service plugs in.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{GrantType, JwtCodec, LoginClaims, LoginUser};
//!
//! let codec = JwtCodec::new(b"secret_key_at_least_32_bytes_long!", "account-service");
//! let user = LoginUser::new("42", "alice", GrantType::password());
//! let token = codec.encode(&LoginClaims::for_login(&user, codec.issuer(), 24)).unwrap();
//! assert_eq!(codec.decode(&token).unwrap().login_user(), user);
//! ```

pub mod jwt;
pub mod password;
pub mod pipeline;

// Re-export commonly used items
pub use jwt::JwtCodec;
pub use jwt::JwtError;
pub use jwt::JwtTokenIssuer;
pub use jwt::LoginClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use pipeline::AfterAuthenticateHook;
pub use pipeline::AuthenticationStrategy;
pub use pipeline::BeforeAuthenticateHook;
pub use pipeline::ChannelEventSink;
pub use pipeline::EventPublishError;
pub use pipeline::GrantType;
pub use pipeline::LoginError;
pub use pipeline::LoginEvent;
pub use pipeline::LoginEventSink;
pub use pipeline::LoginPipeline;
pub use pipeline::LoginUser;
pub use pipeline::TokenIssuer;
