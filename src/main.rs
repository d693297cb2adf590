//! Glimpze server: social feed backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use glimpze_api::{AppState, build_app};
use glimpze_cache::CacheManager;
use glimpze_core::config::AppConfig;
use glimpze_database::Stores;
use glimpze_service::MailtrapMailer;
use glimpze_storage::StorageManager;
use glimpze_worker::{ReplenishJob, ReplenishRunner};

#[tokio::main]
async fn main() {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Starting Glimpze v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    // ── Step 1: Persistent store ─────────────────────────────────
    tracing::info!(
        "Connecting to database (provider: {})...",
        config.database.provider
    );
    let stores = Stores::connect(&config.database)
        .await
        .context("database initialization failed")?;

    // ── Step 2: Session registry backing store ───────────────────
    tracing::info!("Initializing cache (provider: {})...", config.cache.provider);
    let cache = CacheManager::new(&config.cache)
        .await
        .context("cache initialization failed")?;

    // ── Step 3: Blob storage ─────────────────────────────────────
    tracing::info!(
        "Initializing blob storage (provider: {})...",
        config.storage.provider
    );
    let storage = StorageManager::new(&config.storage)
        .await
        .context("storage initialization failed")?;

    // ── Step 4: Mailer ───────────────────────────────────────────
    let mailer = Arc::new(MailtrapMailer::new(&config.mail).context("mailer initialization failed")?);

    // ── Step 5: Shutdown channel & replenishment worker ──────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let job = ReplenishJob::new(Arc::clone(&stores.quotas), &config.quota);
        let runner = ReplenishRunner::new(job, config.worker.interval_hours);
        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            runner.run(cancel).await;
        }))
    } else {
        tracing::info!("Quota replenishment worker disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, stores.clone(), cache, storage, mailer)
        .context("application state initialization failed")?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Glimpze server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    })
    .await
    .context("server error")?;

    if let Some(handle) = worker_handle {
        if let Err(e) = handle.await {
            tracing::warn!("Worker task ended abnormally: {}", e);
        }
    }

    stores.close().await;
    tracing::info!("Glimpze server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
