use std::sync::Arc;
use std::time::Duration;

use auth::JwtCodec;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_account::get_account;
use super::handlers::link_oauth::link_oauth;
use super::handlers::login::login;
use super::handlers::oauth_login::oauth_login;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::AccountServicePort;
use crate::login::pipelines::LoginPipelines;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub login_pipelines: LoginPipelines,
    pub jwt_codec: Arc<JwtCodec>,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    login_pipelines: LoginPipelines,
    jwt_codec: Arc<JwtCodec>,
) -> Router {
    let state = AppState {
        account_service,
        login_pipelines,
        jwt_codec,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/oauth/login", post(oauth_login))
        .route("/api/accounts", post(register));

    let protected_routes = Router::new()
        .route("/api/accounts/me", get(get_account))
        .route("/api/accounts/me/oauth", post(link_oauth))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
