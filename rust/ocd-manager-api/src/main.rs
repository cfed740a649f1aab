//! OCD Manager API - Main Entry Point

use clap::Parser;
use mimalloc::MiMalloc;

use ocd_manager_api::config::{AppConfig, ConfigValidator};
use ocd_manager_api::logging::init_tracing;
use ocd_manager_api::server::create_app;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Command-line arguments. Each one overrides the loaded configuration.
#[derive(Parser, Debug)]
#[command(name = "ocd-manager-api")]
#[command(about = "OCD Manager API - symptom, habit and exercise tracking")]
#[command(version)]
struct Args {
    /// Host to bind to.
    #[arg(long, env = "OCD_MANAGER_HOST")]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log level (overridden by RUST_LOG).
    #[arg(long, env = "OCD_MANAGER_LOG_LEVEL")]
    log_level: Option<String>,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "OCD_MANAGER_DATABASE")]
    database: Option<String>,
}

impl Args {
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(path) = self.database {
            config.database.path = path;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_unchecked()?;
    args.apply(&mut config);
    ConfigValidator::validate(&config)
        .map_err(|e| anyhow::anyhow!("Configuration validation failed:\n\n{e}"))?;

    init_tracing(&config.logging.level, config.logging.json)?;
    tracing::info!("Starting OCD Manager API v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.bind_address();
    let app = create_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler.
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
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
