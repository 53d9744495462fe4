use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagr_core::{
    load_config, validate_config, BackupScheduler, BackupStore, FileBackupStore, FsScanner,
    HealthState, LibraryService, MediaScanner, Persistence,
};
use tagr_server::api::create_router;
use tagr_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Tagr server {} is initializing...", VERSION);

    // Determine config path
    let config_path = std::env::var("TAGR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Backup path: {:?}", config.library.backup_path);
    info!("Save interval: {:?}", config.library.save_interval());

    // Resolve the media root once; every later scan uses this path
    let scanner: Arc<dyn MediaScanner> = Arc::new(
        FsScanner::new(&config.library.video_dir).context("Failed to resolve video directory")?,
    );

    let store: Arc<dyn BackupStore> =
        Arc::new(FileBackupStore::new(config.library.backup_path.clone()));
    let persistence = Arc::new(Persistence::new(store, Arc::new(HealthState::new())));
    info!("Catalog backup location: {}", persistence.location());

    // Load, reconcile, initial backup. Must finish before any request is accepted.
    let library = LibraryService::open(Arc::clone(&persistence), scanner)
        .context("Failed to open media library")?;

    // Start the periodic backup
    let scheduler = BackupScheduler::new(
        Arc::clone(&persistence),
        Arc::clone(library.catalog()),
        config.library.save_interval(),
    );
    scheduler.start().await;
    info!("Backup scheduler started");

    let catalog = Arc::clone(library.catalog());

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), library));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    scheduler.stop().await;
    info!("Backup scheduler stopped");

    // Final backup so a clean shutdown loses nothing
    match BackupScheduler::tick(&persistence, &catalog).await {
        Ok(true) => info!("Final catalog backup written"),
        Ok(false) => info!("Catalog clean, no final backup needed"),
        Err(e) => warn!("Final catalog backup failed: {}", e),
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
}
