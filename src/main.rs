use anyhow::{Context, Result};
use axum::handler::HandlerWithoutStateExt;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cse_motors::config::{Config, Environment, Overrides};
use cse_motors::AppState;

#[derive(Parser, Debug)]
#[command(name = "cse-motors")]
#[command(author, version, about = "Server-rendered inventory management for a vehicle dealership", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cse-motors.toml")]
    config: PathBuf,

    /// Address to bind
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// development or production
    #[arg(long, env = "APP_ENV")]
    environment: Option<Environment>,

    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Secret used to sign session tokens
    #[arg(long, env = "ACCESS_TOKEN_SECRET", hide_env_values = true)]
    token_secret: Option<String>,

    /// Override log level
    #[arg(short, long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            environment: self.environment,
            database_url: self.database_url.clone(),
            token_secret: self.token_secret.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?.apply(cli.overrides());

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CSE Motors v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    // Initialize database
    let store = cse_motors::db::init(&config.database).await?;

    // Ensure the bootstrap admin exists when configured
    if let (Some(email), Some(password)) = (&config.auth.admin_email, &config.auth.admin_password) {
        cse_motors::auth::ensure_admin_account(&store, email, password).await?;
    }

    let state = Arc::new(AppState::new(config.clone(), store).context("Failed to set up token signing")?);

    // Pages first, then static files, then the 404 view
    let serve_static = ServeDir::new(&config.server.public_dir)
        .not_found_service(cse_motors::api::not_found.into_service());
    let app = axum::Router::new()
        .merge(cse_motors::api::create_router(state))
        .fallback_service(serve_static);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        environment = ?config.server.environment,
        "Server listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}
