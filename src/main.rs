//! Fleet Cache - data freshness for a fleet-tracking client
//!
//! Runs the freshness layer as a service: background refresh, the live
//! position channel, and the console API on top.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_cache::api::create_router;
use fleet_cache::clock::SystemClock;
use fleet_cache::fetch::{HttpFetcher, TimeoutFetcher};
use fleet_cache::live::IngestHub;
use fleet_cache::{spawn_live_task, spawn_refresh_task, AppState, Config, FleetCache};

/// Main entry point for the fleet cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Initialize the session's fleet cache over the HTTP fetcher
/// 4. Start the background refresh and live channel tasks
/// 5. Serve the console API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fleet Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: fleet_api_url={}, port={}, refresh_interval={}s, fetch_timeout={}ms",
        config.fleet_api_url, config.server_port, config.refresh_interval, config.fetch_timeout_ms
    );

    let fetcher = HttpFetcher::new(config.fleet_api_url.clone())
        .context("Failed to build fleet service client")?;
    let fetcher = TimeoutFetcher::new(fetcher, config.fetch_timeout());
    let fleet = FleetCache::init(&config, Arc::new(fetcher), Arc::new(SystemClock));
    info!("Fleet cache initialized");

    let live = IngestHub::new();
    let tasks = vec![
        spawn_refresh_task(fleet.orchestrator().clone(), config.refresh_interval),
        spawn_live_task(
            Arc::new(live.clone()),
            fleet.reconciler().clone(),
            fleet.orchestrator().clone(),
            Duration::from_secs(config.live_backoff_max_secs),
        ),
    ];
    info!("Background tasks started");

    let app = create_router(AppState::new(fleet, live));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Console API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tasks))
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the
/// background tasks.
async fn shutdown_signal(tasks: Vec<JoinHandle<()>>) {
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
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for task in tasks {
        task.abort();
    }
    warn!("Background tasks aborted");
}
