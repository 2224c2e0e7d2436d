use std::sync::Arc;

use async_trait::async_trait;

use super::claims::LoginClaims;
use super::codec::JwtCodec;
use crate::pipeline::LoginError;
use crate::pipeline::LoginUser;
use crate::pipeline::TokenIssuer;

/// Issues signed JWTs as session tokens.
pub struct JwtTokenIssuer {
    codec: Arc<JwtCodec>,
    expiration_hours: i64,
}

impl JwtTokenIssuer {
    pub fn new(codec: Arc<JwtCodec>, expiration_hours: i64) -> Self {
        Self {
            codec,
            expiration_hours,
        }
    }
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
    async fn create_token(&self, user: &LoginUser) -> Result<String, LoginError> {
        let claims = LoginClaims::for_login(user, self.codec.issuer(), self.expiration_hours);

        self.codec
            .encode(&claims)
            .map_err(|e| LoginError::TokenIssuance(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::GrantType;

    #[tokio::test]
    async fn test_issued_token_decodes_to_user() {
        let codec = Arc::new(JwtCodec::new(
            b"test_secret_key_at_least_32_bytes!",
            "account-service",
        ));
        let issuer = JwtTokenIssuer::new(Arc::clone(&codec), 24);
        let user = LoginUser::new("42", "alice", GrantType::password());

        let token = issuer.create_token(&user).await.unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.login_user(), user);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }
}
