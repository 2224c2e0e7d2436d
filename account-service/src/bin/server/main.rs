use std::sync::Arc;

use account_service::account::ports::AccountRepository;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::inbound::http::router::create_router;
use account_service::login::pipelines::LoginPipelines;
use account_service::outbound::events::spawn_login_event_dispatcher;
use account_service::outbound::events::AuditLogSubscriber;
use account_service::outbound::events::LoginEventSubscriber;
use account_service::outbound::oauth::HttpOauthIdentityResolver;
use account_service::repositories::InMemoryAccountRepository;
use account_service::repositories::PostgresAccountRepository;
use auth::ChannelEventSink;
use auth::JwtCodec;
use auth::JwtTokenIssuer;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "account_service=debug,auth=debug,login_audit=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        kafka = config.kafka.is_some(),
        oauth_providers = config.oauth.providers.len(),
        "Configuration loaded"
    );

    match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            serve(&config, Arc::new(PostgresAccountRepository::new(pg_pool))).await
        }
        None => {
            tracing::warn!("No database configured, accounts are kept in memory");
            serve(&config, Arc::new(InMemoryAccountRepository::new())).await
        }
    }
}

async fn serve<AR: AccountRepository>(
    config: &Config,
    repository: Arc<AR>,
) -> Result<(), anyhow::Error> {
    let jwt_codec = Arc::new(JwtCodec::new(
        config.jwt.secret.as_bytes(),
        config.jwt.issuer.clone(),
    ));
    let token_issuer = Arc::new(JwtTokenIssuer::new(
        Arc::clone(&jwt_codec),
        config.jwt.expiration_hours,
    ));
    let password_hasher = Arc::new(PasswordHasher::new());
    let identity_resolver = Arc::new(HttpOauthIdentityResolver::new(
        config.oauth.providers.clone(),
    )?);

    let (event_sink, event_receiver) = ChannelEventSink::channel();
    let dispatcher = spawn_login_event_dispatcher(event_receiver, subscribers(config)?);

    let account_service = Arc::new(AccountService::new(
        Arc::clone(&repository),
        Arc::clone(&identity_resolver),
        Arc::clone(&password_hasher),
    ));
    let login_pipelines = LoginPipelines::assemble(
        repository,
        identity_resolver,
        password_hasher,
        token_issuer,
        Arc::new(event_sink),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service, login_pipelines, jwt_codec);
    axum::serve(http_listener, http_application).await?;

    // The router owned the last event sink; let queued events drain.
    if let Err(e) = dispatcher.await {
        tracing::error!(error = %e, "Login event dispatcher failed");
    }

    tracing::info!("Server exited successfully");
    Ok(())
}

fn subscribers(config: &Config) -> Result<Vec<Arc<dyn LoginEventSubscriber>>, anyhow::Error> {
    #[cfg_attr(not(feature = "kafka"), allow(unused_mut))]
    let mut subscribers: Vec<Arc<dyn LoginEventSubscriber>> =
        vec![Arc::new(AuditLogSubscriber) as Arc<dyn LoginEventSubscriber>];

    #[cfg(feature = "kafka")]
    {
        if let Some(kafka) = &config.kafka {
            subscribers.push(Arc::new(
                account_service::outbound::events::KafkaLoginEventProducer::new(kafka)?,
            ));
        }
    }

    #[cfg(not(feature = "kafka"))]
    {
        if config.kafka.is_some() {
            tracing::warn!("Kafka configured but the service was built without the `kafka` feature");
        }
    }

    Ok(subscribers)
}
