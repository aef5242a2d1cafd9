//! HTTP server.
//!
//! Two JSON endpoints compatible with existing pass clients, plus a health
//! check:
//!
//! | Route            | Body                          | Response                |
//! |------------------|-------------------------------|-------------------------|
//! | `POST /secrets`  | `{}`                          | `{"response": <index>}` |
//! | `POST /secret`   | `{"path": …, "username": …}`  | `{"response": <secret>}`|
//! | `GET /health`    |                               | cache state             |
//!
//! Failures are `{"error": <message>}`. Both POST routes also answer with a
//! trailing slash.

mod error;
mod handlers;
mod https;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::core::cache::SecretCache;
use crate::core::config::Environment;
use crate::error::Result;

pub use error::ApiError;
pub use handlers::{Envelope, Health, SecretRequest};

/// Build the application router.
///
/// Production deployments sit behind a TLS-terminating proxy, so plain-HTTP
/// requests are redirected. Elsewhere every request is traced.
pub fn router(cache: Arc<SecretCache>, environment: Environment) -> Router {
    let router = Router::new()
        .route("/secrets", post(handlers::list))
        .route("/secrets/", post(handlers::list))
        .route("/secret", post(handlers::show))
        .route("/secret/", post(handlers::show))
        .route("/health", get(handlers::health))
        .with_state(cache);

    if environment.is_production() {
        router.layer(middleware::from_fn(https::force_https))
    } else {
        router.layer(TraceLayer::new_for_http())
    }
}

/// Serve until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns `Error::Io` if the address cannot be bound or the server fails.
pub async fn run(cache: Arc<SecretCache>, addr: SocketAddr, environment: Environment) -> Result<()> {
    let app = router(cache, environment);

    let listener = TcpListener::bind(addr).await?;
    info!(
        address = %listener.local_addr()?,
        environment = %environment,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received");
}
