use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::info;

use super::{
    services::{health, ingest_log, list_logs, not_found, panic_response},
    state::AppState,
};
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the application router over `state`
pub fn router(state: AppState) -> Router {
    with_layers(
        Router::new()
            .route("/logs", get(list_logs).post(ingest_log))
            .route("/health", get(health))
            .fallback(not_found)
            .with_state(state),
    )
}

/// Wrap `routes` in the middleware stack every endpoint runs behind
pub fn with_layers(routes: Router) -> Router {
    routes
        // Gateways may ship gzip/deflate bodies; decoded before handlers see them
        .layer(RequestDecompressionLayer::new())
        .layer(CatchPanicLayer::custom(panic_response))
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    let address = config.server.bind_addr;
    info!(
        path = %config.logs.file_path.display(),
        default_limit = config.logs.default_limit,
        max_body_bytes = config.server.max_body_bytes,
        "Configuration loaded"
    );
    let state = AppState::from_config(config);

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "logsink listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
