use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use account_service::account::service::AccountService;
use account_service::config::OauthProviderConfig;
use account_service::inbound::http::router::create_router;
use account_service::login::pipelines::LoginPipelines;
use account_service::outbound::oauth::HttpOauthIdentityResolver;
use account_service::repositories::InMemoryAccountRepository;
use auth::ChannelEventSink;
use auth::JwtCodec;
use auth::JwtTokenIssuer;
use auth::LoginEvent;
use auth::PasswordHasher;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde_json::json;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_ISSUER: &str = "account-service";

/// Access tokens the stub GitHub provider accepts, with the user id it reports.
pub const GITHUB_TOKENS: [(&str, u64); 2] = [("gh-token-alice", 1001), ("gh-token-bob", 1002)];

/// Test application that spawns a real server backed by in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_codec: JwtCodec,
    login_events: Mutex<UnboundedReceiver<LoginEvent>>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let userinfo_url = spawn_oauth_provider().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let mut providers = HashMap::new();
        providers.insert(
            "github".to_string(),
            OauthProviderConfig {
                userinfo_url,
                subject_field: "id".to_string(),
            },
        );

        let repository = Arc::new(InMemoryAccountRepository::new());
        let identity_resolver = Arc::new(
            HttpOauthIdentityResolver::new(providers).expect("Failed to build OAuth resolver"),
        );
        let password_hasher = Arc::new(PasswordHasher::new());
        let jwt_codec = Arc::new(JwtCodec::new(JWT_SECRET, JWT_ISSUER));
        let (event_sink, login_events) = ChannelEventSink::channel();

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            Arc::clone(&identity_resolver),
            Arc::clone(&password_hasher),
        ));
        let login_pipelines = LoginPipelines::assemble(
            repository,
            identity_resolver,
            password_hasher,
            Arc::new(JwtTokenIssuer::new(Arc::clone(&jwt_codec), 24)),
            Arc::new(event_sink),
        );

        let router = create_router(account_service, login_pipelines, jwt_codec);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_codec: JwtCodec::new(JWT_SECRET, JWT_ISSUER),
            login_events: Mutex::new(login_events),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account and return the response body
    pub async fn register(&self, username: &str, password: &str) -> Value {
        let response = self
            .post("/api/accounts")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Password login; returns the access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Next login event published by the pipelines, if one arrives shortly
    pub async fn next_login_event(&self) -> Option<LoginEvent> {
        let mut receiver = self.login_events.lock().await;
        tokio::time::timeout(Duration::from_millis(200), receiver.recv())
            .await
            .ok()
            .flatten()
    }
}

async fn userinfo(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    GITHUB_TOKENS
        .iter()
        .find(|(known, _)| *known == token)
        .map(|(_, id)| Json(json!({ "id": id, "login": "octocat" })))
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Stub OAuth provider; returns its userinfo URL
async fn spawn_oauth_provider() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, Router::new().route("/user", get(userinfo)))
            .await
            .expect("OAuth stub error");
    });

    format!("http://127.0.0.1:{}/user", port)
}
