/* src/server/mod.rs */

//! HTTP service exposing the detector: routes, configuration and lifecycle.

mod config;
mod format;
mod handlers;
mod shutdown;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use format::{DEFAULT_CALLBACK, ResponseFormat, sanitize_callback};
pub use shutdown::shutdown_signal;

use crate::middleware::ClientContextLayer;

pub const TRACING_TARGET_STARTUP: &str = "myip::server::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "myip::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "myip::server::config";
pub const TRACING_TARGET_HANDLER: &str = "myip::server::handler";

/// Build the service router.
///
/// Requests slower than `request_timeout` are answered with 408.
pub fn router(request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::ipv4))
        .route("/ipv6", get(handlers::ipv6))
        .route("/info", get(handlers::info))
        .route("/json", get(handlers::json))
        .route("/headers", get(handlers::headers))
        .route("/health", get(handlers::health))
        .layer(ClientContextLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve `app` until a shutdown signal arrives.
///
/// After the signal, in-flight requests get `config.shutdown_timeout()` to
/// finish before the server stops waiting for them.
pub async fn serve(app: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        %addr,
        public_host = %config.host,
        "server is ready and listening for connections"
    );
    for (path, description) in [
        ("/", "IPv4 address only"),
        ("/ipv6", "IPv6 address only (404 if not available)"),
        ("/info", "detailed IP information"),
        ("/json", "detailed JSON response"),
        ("/headers", "all headers display"),
        ("/health", "health check"),
    ] {
        tracing::info!(target: TRACING_TARGET_STARTUP, path, description, "endpoint registered");
    }

    let draining = Arc::new(Notify::new());
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown({
        let draining = Arc::clone(&draining);
        async move {
            shutdown_signal().await;
            draining.notify_one();
        }
    });

    tokio::select! {
        result = server.into_future() => {
            result.context("server terminated with an error")?;
            tracing::info!(target: TRACING_TARGET_SHUTDOWN, "server shut down gracefully");
        }
        () = shutdown::drain_deadline(&draining, config.shutdown_timeout()) => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                "shutdown timeout elapsed, dropping remaining connections"
            );
        }
    }

    Ok(())
}
