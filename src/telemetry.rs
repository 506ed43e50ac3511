//! Logging and metrics setup for the service binary.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "COUPON_LOG";

/// Initialize tracing with the COUPON_LOG environment variable.
///
/// Defaults to "info" level if COUPON_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the global Prometheus recorder and describe the service metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(
        crate::http::REQUESTS_TOTAL,
        "Number of API requests by status and path"
    );

    tracing::info!("Prometheus metrics initialized");
    Ok(handle)
}
