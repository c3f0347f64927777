/// Marketplace Identity Service - main entry point
///
/// Serves the auth HTTP API backed by PostgreSQL credentials and a Redis
/// session token cache.
use anyhow::{Context, Result};
use marketplace_identity::{
    cache::RedisSessionCache,
    config::Settings,
    db::PgCredentialStore,
    http::{build_router, start_http_server, AppState},
    security::{Argon2PasswordHasher, TokenIssuer},
    services::IdentityService,
};
use redis_utils::RedisPool;
use resilience::TimeoutConfig;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "marketplace_identity=info,tower_http=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Marketplace Identity Service");

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .min_connections(settings.database.min_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(settings.database.url.expose())
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        "Database pool initialized with {} max connections",
        settings.database.max_connections
    );

    // Run database migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    // Initialize Redis connection manager
    let redis_timeout = Duration::from_secs(settings.redis.response_timeout);
    let redis_pool = RedisPool::connect(settings.redis.url.expose(), redis_timeout)
        .await
        .context("Failed to connect to Redis")?;
    info!(addr = %redis_pool.addr_label(), "Redis connection manager initialized");

    let tokens = TokenIssuer::new(settings.jwt.secret.expose())
        .context("Failed to initialize token issuer")?;

    let identity = IdentityService::new(
        Arc::new(PgCredentialStore::new(
            db_pool.clone(),
            TimeoutConfig::from_secs(settings.database.query_timeout),
        )),
        Arc::new(RedisSessionCache::new(
            redis_pool.manager(),
            TimeoutConfig {
                duration: redis_timeout,
            },
        )),
        Arc::new(Argon2PasswordHasher::new()),
        tokens.clone(),
        settings.jwt.token_ttl(),
    );

    let state = AppState {
        identity: Arc::new(identity),
        tokens,
    };
    let router = build_router(
        state,
        Duration::from_secs(settings.server.request_timeout),
    );

    let addr = settings.server.bind_addr()?;
    start_http_server(addr, router, shutdown_signal()).await?;

    db_pool.close().await;
    info!("Marketplace Identity Service shut down");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
