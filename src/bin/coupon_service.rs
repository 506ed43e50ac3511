//! Coupon service server.
//!
//! Builds the in-memory store and service once, then serves the HTTP API
//! until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use coupon_service::{http, telemetry, Config, CouponService, InMemoryCouponStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let metrics = telemetry::init_metrics()?;

    let service = CouponService::new(InMemoryCouponStore::new())
        .with_max_concurrency(config.service.max_concurrency)
        .with_lookup_stack_size(config.service.lookup_stack_size);
    let state = http::AppState::new(Arc::new(service)).with_metrics(metrics);

    info!("Starting coupon service on {}", config);

    http::serve(
        state,
        &config.api.addr(),
        shutdown_signal(config.api.shutdown_grace()),
    )
    .await?;

    info!("Coupon service stopped");
    Ok(())
}

/// Resolves on SIGINT/SIGTERM, after waiting `grace`.
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutting down the server in {:?}", grace);
    tokio::time::sleep(grace).await;
}
