use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trailscope_store::postgres::{PostgresConfig, PostgresStore};

use trailscope_api::{create_router, ApiConfig, AppState, Stores};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailscope_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let query_config = config.query_config().context("Failed to load query configuration")?;

    tracing::info!(
        port = config.port,
        predicate_timeout_ms = query_config.predicate_timeout_ms.value,
        audit_enabled = query_config.audit_enabled.value,
        "Starting trailscope API server"
    );

    let stores = if config.uses_postgres() {
        tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
        let store = init_postgres_storage().await.map_err(|e| {
            tracing::error!(
                "Remediation:\n\
                1. Ensure PostgreSQL is running with the PostGIS extension available\n\
                2. Verify DATABASE_URL is correct\n\
                3. Check that the database exists and is accessible"
            );
            e
        })?;
        tracing::info!("Connected to PostgreSQL");
        Stores::postgres(store)
    } else {
        tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
        Stores::memory(&config.fixtures).context("Failed to load fixture files")?
    };

    let state = Arc::new(AppState::new(stores, &query_config));

    let origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("Invalid TRAILSCOPE_CORS_ORIGIN '{}'", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and the pool settings from the environment
async fn init_postgres_storage() -> Result<PostgresStore> {
    let config = PostgresConfig::from_env().context("Invalid PostgreSQL configuration")?;

    PostgresStore::with_migrations(config).await.context("Connection failed")
}
