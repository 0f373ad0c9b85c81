//! Absolute Handshake Web Server
//!
//! HTTP layer built with Axum. Each browser view is identified by a cookie
//! and every form posts back and redirects to the page.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Render the caller's view
//! - `POST /auth` - Sign in or sign up
//! - `POST /auth/mode` - Toggle login / sign up
//! - `POST /handshakes` - Create a handshake
//! - `POST /logout` - Sign out
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use handshake::backend::MemoryStore;
//! use handshake::web::{serve, AppState, WebConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = Arc::new(AppState::new(Arc::new(MemoryStore::new()), WebConfig::default()));
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::{start_view_sweeper, AppState, ViewRegistry, WebConfig};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let page_routes = Router::new()
        .route("/", get(routes::page::home))
        .route("/auth", post(routes::auth::submit_auth))
        .route("/auth/mode", post(routes::auth::toggle_mode))
        .route("/handshakes", post(routes::handshakes::create_handshake))
        .route("/logout", post(routes::handshakes::log_out));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    page_routes
        .nest("/health", health_routes)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and the idle view sweeper
pub async fn serve(state: Arc<AppState>) -> WebResult<()> {
    let addr = state.config.addr();
    let sweeper = start_view_sweeper(Arc::clone(&state));
    let router = build_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        backend = state.provider.name(),
        "Absolute Handshake listening on {}",
        addr
    );

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::Internal(format!("Server error: {}", e)));

    sweeper.abort();
    result?;

    tracing::info!("Absolute Handshake shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
