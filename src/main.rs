//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Opens the persistent storage
//! - Starts the local HTTP surface with graceful shutdown support

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use utm_builder::config::Config;
use utm_builder::route::create_app;
use utm_builder::session::AppState;
use utm_builder::storage::init_store;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("utm_builder=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();

    let store = init_store(&config.database_url).expect("Failed to initialize storage");

    // History is rehydrated here; a corrupt blob is logged and dropped
    let state = AppState::new(Arc::new(store));
    info!(entries = state.lock().history.len(), "history loaded");

    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    info!(%addr, database = %config.database_url, "UTM builder listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM
///
/// Every storage write commits before its request returns, so stopping
/// between requests never leaves a partial history behind.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
