//! `eduhubd` — the eduhub platform API server.
//!
//! Usage:
//!   eduhubd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/eduhub/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use eduhub_store::{DocStore, RedbStore};
use eduhubd::config::ServerConfig;
use eduhubd::routes::AppState;
use eduhubd::token::TokenService;
use eduhubd::{bootstrap, routes};

/// eduhub API server.
#[derive(Parser, Debug)]
#[command(name = "eduhubd", about = "eduhub API server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:5000")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let store: Arc<dyn DocStore> = Arc::new(
        RedbStore::open(&data_dir.join("eduhub.redb"))
            .map_err(|e| anyhow::anyhow!("failed to open document store: {}", e))?,
    );

    let tokens = Arc::new(TokenService::new(
        &server_config.jwt.secret,
        server_config.jwt.expire_secs,
    ));

    let state = AppState {
        config: Arc::new(server_config),
        store,
        tokens,
    };

    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("eduhubd listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
