use std::collections::HashMap;
use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent: accounts are kept in memory
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// Absent: login events only reach the audit log
    pub kafka: Option<KafkaConfig>,
    #[serde(default)]
    pub oauth: OauthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OauthConfig {
    #[serde(default)]
    pub providers: HashMap<String, OauthProviderConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct OauthProviderConfig {
    pub userinfo_url: String,
    /// Field of the userinfo document holding the stable subject id
    #[serde(default = "default_subject_field")]
    pub subject_field: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_issuer() -> String {
    "account-service".to_string()
}

fn default_subject_field() -> String {
    "sub".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_minimal_configuration() {
        let config = parse(
            r#"
            [server]
            http_port = 3000

            [jwt]
            secret = "secret"
            expiration_hours = 24
            "#,
        )
        .unwrap();

        assert!(config.database.is_none());
        assert!(config.kafka.is_none());
        assert!(config.oauth.providers.is_empty());
        assert_eq!(config.jwt.issuer, "account-service");
    }

    #[test]
    fn test_oauth_providers() {
        let config = parse(
            r#"
            [server]
            http_port = 3000

            [jwt]
            secret = "secret"
            expiration_hours = 24

            [database]
            url = "postgresql://localhost/accounts"

            [oauth.providers.github]
            userinfo_url = "https://api.github.com/user"
            subject_field = "id"

            [oauth.providers.google]
            userinfo_url = "https://openidconnect.googleapis.com/v1/userinfo"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.unwrap().max_connections, 5);
        assert_eq!(config.oauth.providers["github"].subject_field, "id");
        assert_eq!(config.oauth.providers["google"].subject_field, "sub");
    }
}
