//! Todo List API
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: `todo_list_api=debug,tower_http=debug`)
//! - `APP_HOST`: Server host address (default: `0.0.0.0`)
//! - `APP_PORT`: Server port (default: `8000`)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS and WebSocket origins
//! - `NOTIFY_RETRY_ATTEMPTS`: Broadcast attempts while a list has no subscriber (default: `10`)
//! - `NOTIFY_RETRY_DELAY_MS`: Delay between broadcast attempts (default: `100`)
//! - `WS_IDLE_TIMEOUT_SECS`: Idle time before a ping is sent (default: `30`)

use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_list_api::api::{AppState, create_router};
use todo_list_api::infrastructure::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_list_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::warn!(%error, "Failed to load configuration, using defaults");
            AppConfig::default()
        }
    };
    tracing::info!(
        host = %config.app_host,
        port = config.app_port,
        origins = ?config.allowed_origins,
        retry_attempts = config.notification.retry.max_attempts,
        "Configuration loaded"
    );

    let bind_address = config.bind_address();
    let state = AppState::in_memory(config, Handle::current());
    let application = create_router(state).layer(TraceLayer::new_for_http());

    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", bind_address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
