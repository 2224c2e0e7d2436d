//! Login orchestration.
//!
//! A [`LoginPipeline`] runs, for one request flavor:
//! before-hooks → strategy → after-hooks → token issuance → login event.

pub mod errors;
pub mod event;
pub mod hooks;
pub mod login;
pub mod ports;
pub mod registry;
pub mod user;

pub use errors::EventPublishError;
pub use errors::LoginError;
pub use event::ChannelEventSink;
pub use event::LoginEvent;
pub use hooks::AfterAuthenticateHook;
pub use hooks::BeforeAuthenticateHook;
pub use login::LoginPipeline;
pub use login::LoginPipelineBuilder;
pub use ports::AuthenticationStrategy;
pub use ports::LoginEventSink;
pub use ports::TokenIssuer;
pub use registry::HookRegistry;
pub use registry::RegisteredHook;
pub use user::GrantType;
pub use user::LoginUser;
