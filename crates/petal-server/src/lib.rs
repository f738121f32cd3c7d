//! HTTP surface: `POST /predict/` plus Kubernetes-style health probes.

use axum::Router;
use axum::routing::{get, post};
use petal_ai::PredictionService;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
pub mod routes;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }
}

/// Build the router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict/", post(routes::predict))
        .route("/predict", post(routes::predict))
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already-bound listener until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "petal v{} listening", env!("CARGO_PKG_VERSION"));
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        // If the handler cannot be installed, rely on SIGTERM alone.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
