use anyhow::{Context, Result};
use persistence::repositories::{ContactRepository, ContactStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use contacts_web::{app, config, jobs, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load().context("failed to load configuration")?;

    middleware::init_logging(&config.logging);

    info!("Starting contacts web v{}", env!("CARGO_PKG_VERSION"));

    if config.metrics.enabled {
        middleware::init_metrics().context("failed to install metrics recorder")?;
    }

    info!(database = %config.database.target(), "Connecting to database");
    let pool = persistence::db::create_pool(&config.database).await?;

    let repository = ContactRepository::new(pool.clone());
    repository.ensure_schema().await?;
    info!("Database schema ready");

    let mut scheduler = jobs::JobScheduler::new();
    if config.metrics.enabled {
        scheduler.register(jobs::PoolMetricsJob::new(
            pool.clone(),
            config.metrics.pool_metrics_interval_secs,
        ));
    }
    scheduler.start();

    let addr = config.socket_addr()?;
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let app = app::create_app(config, Arc::new(repository));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown(shutdown_timeout).await;
    pool.close().await;
    info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
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
