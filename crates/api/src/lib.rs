//! HTTP API for the order service.
//!
//! Exposes the order lifecycle as REST endpoints, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::OrderService;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{ItemStore, OrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use user_directory::UserDirectory;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, U>(state: Arc<AppState<S, U>>, metrics_handle: PrometheusHandle) -> Router
where
    S: OrderStore + ItemStore + Clone + 'static,
    U: UserDirectory + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S, U>))
        .route("/orders/list", post(routes::orders::list::<S, U>))
        .route("/orders/status/{status}", get(routes::orders::by_status::<S, U>))
        .route(
            "/orders/{id}",
            get(routes::orders::get::<S, U>)
                .put(routes::orders::update::<S, U>)
                .delete(routes::orders::delete::<S, U>),
        )
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

/// Wires the order service over a store and a user directory.
pub fn create_state<S, U>(store: S, directory: U) -> Arc<AppState<S, U>>
where
    S: OrderStore + ItemStore + Clone,
    U: UserDirectory,
{
    Arc::new(AppState {
        order_service: OrderService::new(store, directory),
    })
}
