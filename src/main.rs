use {
    checkout_relay::{
        AppState,
        adapters::paypal_client::PayPalTransport,
        config::{EnvConfig, GatewayConfig, ServerConfig},
        services::checkout::CheckoutService,
    },
    std::sync::Arc,
    tokio::signal,
    tracing_subscriber::EnvFilter,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let server = ServerConfig::from_env();
    let transport =
        PayPalTransport::new(server.connect_timeout).expect("failed to build HTTP client");

    // Read once here only to report the startup mode; handlers re-read per request.
    let startup = GatewayConfig::from_env();
    if startup.credentials().is_err() {
        tracing::warn!("PayPal credentials are not set; order endpoints will return 500");
    }

    let state = AppState {
        checkout: CheckoutService::new(Arc::new(transport)),
        config: Arc::new(EnvConfig),
    };

    let app = checkout_relay::app(state, server.request_body_timeout);

    let listener = tokio::net::TcpListener::bind(&server.bind_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!(addr = %server.bind_addr, mode = %startup.mode(), "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
