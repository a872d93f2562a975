pub mod adapters;
pub mod config;
pub mod domain;
pub mod services;

use {
    adapters::handlers::{capture_order_handler, create_order_handler, method_not_allowed},
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post},
    },
    config::ConfigSource,
    services::checkout::CheckoutService,
    std::{sync::Arc, time::Duration},
    tower_http::timeout::RequestBodyTimeoutLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub checkout: CheckoutService,
    pub config: Arc<dyn ConfigSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/api/create-order",
            post(create_order_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/capture-order",
            post(capture_order_handler).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(16 * 1024))
        .with_state(state)
}

/// The router as served: a slow client only ever stalls the body read. Once
/// a handler starts calling the provider, the outbound timeouts are the only
/// bound on it.
pub fn app(state: AppState, body_timeout: Duration) -> Router {
    router(state).layer(RequestBodyTimeoutLayer::new(body_timeout))
}
