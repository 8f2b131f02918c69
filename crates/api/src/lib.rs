//! HTTP API server with observability for the marketplace sync service.
//!
//! Provides the product submission endpoint that fans one product out to
//! both marketplaces, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use marketplace::{
    MarketplaceA, MarketplaceAClient, MarketplaceB, MarketplaceBClient, SyncCoordinator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::products::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<A: MarketplaceA + 'static, B: MarketplaceB + 'static>(
    state: Arc<AppState<A, B>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/products", post(routes::products::submit::<A, B>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state wired to the live marketplace clients.
pub fn create_default_state(
    config: &Config,
) -> Arc<AppState<MarketplaceAClient, MarketplaceBClient>> {
    let marketplace_a = MarketplaceAClient::new(&config.marketplace_a_url);
    let marketplace_b = MarketplaceBClient::with_policy(
        &config.marketplace_b_url,
        config.marketplace_b_retry_policy(),
    );
    let coordinator = SyncCoordinator::new(marketplace_a, marketplace_b);

    Arc::new(AppState { coordinator })
}
