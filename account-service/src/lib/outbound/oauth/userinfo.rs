use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::account::errors::OauthResolveError;
use crate::account::models::OauthIdentity;
use crate::account::ports::OauthIdentityResolver;
use crate::config::OauthProviderConfig;

/// Resolves access tokens by calling each provider's userinfo endpoint
/// with the token as a bearer credential.
pub struct HttpOauthIdentityResolver {
    client: reqwest::Client,
    providers: HashMap<String, OauthProviderConfig>,
}

impl HttpOauthIdentityResolver {
    /// # Arguments
    /// * `providers` - Provider name to userinfo endpoint settings
    ///
    /// # Errors
    /// Fails when the HTTP client cannot be built.
    pub fn new(providers: HashMap<String, OauthProviderConfig>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        tracing::info!(
            providers = ?providers.keys().collect::<Vec<_>>(),
            "OAuth identity resolver configured"
        );

        Ok(Self { client, providers })
    }
}

/// Read the subject out of a userinfo document. Numeric ids are accepted.
fn subject_of(document: &Value, field: &str) -> Option<String> {
    match document.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl OauthIdentityResolver for HttpOauthIdentityResolver {
    fn supports(&self, provider: &str) -> bool {
        self.providers.contains_key(provider)
    }

    async fn resolve(
        &self,
        provider: &str,
        access_token: &str,
    ) -> Result<OauthIdentity, OauthResolveError> {
        let settings = self
            .providers
            .get(provider)
            .ok_or_else(|| OauthResolveError::UnsupportedProvider(provider.to_string()))?;

        let response = self
            .client
            .get(&settings.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OauthResolveError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(OauthResolveError::Rejected(provider.to_string()));
            }
            status if !status.is_success() => {
                return Err(OauthResolveError::Unavailable(format!(
                    "{} userinfo returned {}",
                    provider, status
                )));
            }
            _ => {}
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| OauthResolveError::MalformedResponse(e.to_string()))?;

        let subject = subject_of(&document, &settings.subject_field).ok_or_else(|| {
            OauthResolveError::MalformedResponse(format!(
                "missing field '{}'",
                settings.subject_field
            ))
        })?;

        tracing::debug!(provider = provider, subject = %subject, "OAuth identity resolved");

        Ok(OauthIdentity::new(provider, subject))
    }
}
