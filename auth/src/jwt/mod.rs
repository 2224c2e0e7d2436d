pub mod claims;
pub mod codec;
pub mod errors;
pub mod issuer;

pub use claims::LoginClaims;
pub use codec::JwtCodec;
pub use errors::JwtError;
pub use issuer::JwtTokenIssuer;
