//! HTTP API server for the storefront backend.
//!
//! REST endpoints for orders, the product catalog, customers,
//! promotional collections, colors, dashboard statistics and image
//! upload, with structured logging (tracing) and Prometheus metrics.

pub mod blob;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout::CheckoutCoordinator;
use datastore::Datastore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use blob::BlobStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub store: S,
    pub checkout: CheckoutCoordinator<S>,
    pub blobs: Arc<dyn BlobStore>,
}

/// Wires the coordinator and blob store around a datastore.
pub fn create_state<S: Datastore + Clone>(
    store: S,
    blobs: Arc<dyn BlobStore>,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        checkout: CheckoutCoordinator::new(store.clone()),
        store,
        blobs,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Datastore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            post(routes::orders::create::<S>)
                .get(routes::orders::fetch::<S>)
                .put(routes::orders::update::<S>)
                .delete(routes::orders::remove::<S>),
        )
        .route(
            "/products",
            post(routes::products::create::<S>)
                .get(routes::products::fetch::<S>)
                .put(routes::products::update::<S>)
                .delete(routes::products::remove::<S>),
        )
        .route(
            "/customers",
            post(routes::customers::create::<S>)
                .get(routes::customers::fetch::<S>)
                .put(routes::customers::update::<S>)
                .delete(routes::customers::remove::<S>),
        )
        .route(
            "/collections",
            post(routes::collections::create::<S>)
                .get(routes::collections::fetch::<S>)
                .put(routes::collections::update::<S>)
                .delete(routes::collections::remove::<S>),
        )
        .route(
            "/colors",
            get(routes::colors::list::<S>).post(routes::colors::create::<S>),
        )
        .route(
            "/colors/{id}",
            axum::routing::put(routes::colors::update::<S>)
                .delete(routes::colors::remove::<S>),
        )
        .route("/stats", get(routes::stats::dashboard::<S>))
        .route("/upload", post(routes::upload::create::<S>))
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
