//! survey-api - AI readiness survey intake service
//!
//! Serves `POST /upload_results` and `GET /health`. Database credentials come
//! from the command line, the environment or a TOML file; none are built in.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use survey_common::config::{Overrides, TomlConfig};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use survey_api::{build_router, AppState};

/// Command-line arguments for survey-api
#[derive(Parser)]
#[command(name = "survey-api")]
#[command(about = "AI readiness survey intake service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SURVEY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "SURVEY_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SURVEY_PORT")]
    port: Option<u16>,

    /// Largest accepted request body in bytes
    #[arg(long, env = "SURVEY_MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,

    /// Full database URL (mysql://, mariadb:// or sqlite:)
    #[arg(long, env = "SURVEY_DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[arg(long, env = "SURVEY_DB_HOST")]
    db_host: Option<String>,

    #[arg(long, env = "SURVEY_DB_PORT")]
    db_port: Option<u16>,

    #[arg(long, env = "SURVEY_DB_NAME")]
    db_name: Option<String>,

    #[arg(long, env = "SURVEY_DB_USER")]
    db_user: Option<String>,

    #[arg(long, env = "SURVEY_DB_PASSWORD", hide_env_values = true)]
    db_password: Option<String>,

    #[arg(long, env = "SURVEY_DB_CHARSET")]
    db_charset: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "SURVEY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            max_body_bytes: self.max_body_bytes,
            database_url: self.database_url.clone(),
            db_host: self.db_host.clone(),
            db_port: self.db_port,
            db_name: self.db_name.clone(),
            db_user: self.db_user.clone(),
            db_password: self.db_password.clone(),
            db_charset: self.db_charset.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    config.apply_overrides(args.overrides());

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting survey-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &args.config {
        Some(path) if path.exists() => info!("Configuration file: {}", path.display()),
        Some(path) => warn!(
            "Config file {} not found, using defaults and environment",
            path.display()
        ),
        None => info!("No configuration file, using defaults and environment"),
    }

    let datastore = survey_common::db::connect(&config.database)
        .await
        .context("Failed to connect to survey datastore")?;

    let state = AppState::new(datastore, config.server.max_body_bytes);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind to {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let addr = listener.local_addr().context("Failed to read listen address")?;
    info!("survey-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
