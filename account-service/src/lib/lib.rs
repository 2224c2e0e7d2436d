//! Account service: password and OAuth login over HTTP, account
//! registration and OAuth identity linking.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::account;
pub use domain::login;
pub use outbound::repositories;
