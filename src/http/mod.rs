//! HTTP transport for the coupon service.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /api/create` - body `{ "discount", "code", "minBasketValue" }`, 201 with the coupon.
//! - `POST /api/apply` - body `{ "basket": { "value" }, "code" }`, 200 with the basket.
//! - `GET /api/coupons` - JSON body `{ "codes": [...] }`, 200 with the coupons in order.
//! - `GET /metrics` - Prometheus exposition of `http_requests_total`.
//!
//! Errors are returned as `{ "error": "..." }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use coupon_service::{http, CouponService, InMemoryCouponStore};
//!
//! let service = Arc::new(CouponService::new(InMemoryCouponStore::new()));
//! let state = http::AppState::new(service);
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(state.clone());
//!
//! // Or serve directly until ctrl-c
//! http::serve(state, "0.0.0.0:8080", async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! ```

mod body;
mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use body::{ApplyRequest, CouponsRequest, CreateRequest, ErrorBody};

use crate::service::CouponService;
use crate::store::CouponStore;

/// Counter of API responses, labelled by `status` and `path`.
pub const REQUESTS_TOTAL: &str = "http_requests_total";

/// Shared handler state: the service plus an optional metrics handle.
pub struct AppState<S> {
    service: Arc<CouponService<S>>,
    metrics: Option<PrometheusHandle>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: CouponStore> AppState<S> {
    pub fn new(service: Arc<CouponService<S>>) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    /// Serve `GET /metrics` from `handle`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn service(&self) -> &CouponService<S> {
        &self.service
    }

    fn service_handle(&self) -> Arc<CouponService<S>> {
        Arc::clone(&self.service)
    }

    fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}

/// Build an axum `Router` serving the coupon API.
pub fn router<S: CouponStore + 'static>(state: AppState<S>) -> Router {
    let api = Router::new()
        .route("/apply", post(handlers::apply::<S>))
        .route("/create", post(handlers::create::<S>))
        .route("/coupons", get(handlers::coupons::<S>))
        .layer(TraceLayer::new_for_http());

    Router::new()
        .nest("/api", api)
        .route("/metrics", get(handlers::render_metrics::<S>))
        .with_state(state)
}

/// Serve the API at `addr` (e.g. `"0.0.0.0:8080"`) until `shutdown` resolves.
pub async fn serve<S, F>(state: AppState<S>, addr: &str, shutdown: F) -> Result<(), std::io::Error>
where
    S: CouponStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "coupon API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
