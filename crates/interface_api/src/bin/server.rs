//! Tax Filing Portal - API Server Binary
//!
//! This binary starts the HTTP API server for the tax filing portal.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin taxfiling-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin taxfiling-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_STORAGE` - Storage backend: postgres or memory (default: postgres)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_store::{create_pool, DatabaseConfig};
use interface_api::{config::ApiConfig, create_router, Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = %config.storage,
        "Starting Tax Filing Portal API Server"
    );

    let services = build_services(&config).await?;

    let app = create_router(services, config.clone());

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from the environment. Unset variables fall
/// back to the struct defaults; a malformed variable rejects the whole
/// environment and falls back entirely.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|err| {
        eprintln!("ignoring invalid API_* configuration: {err}");
        ApiConfig::default()
    })
}

/// Wires the domain services against the configured storage backend.
async fn build_services(config: &ApiConfig) -> anyhow::Result<Services> {
    if config.uses_memory_storage() {
        tracing::info!("Using in-memory storage");
        return Ok(Services::in_memory());
    }

    tracing::info!("Connecting to database...");
    let pool = create_pool(DatabaseConfig::new(&config.database_url)).await?;
    tracing::info!("Database connection established");
    Ok(Services::postgres(pool))
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
