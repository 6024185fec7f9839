// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! HTTP server for metrics, health probes and admission validation.
//!
//! All endpoints share one plain HTTP listener; TLS for the admission webhook
//! is terminated in front of the pod.

use crate::constants::{HEALTHZ_PATH, METRICS_SERVER_PATH, READYZ_PATH, VALIDATE_WEBHOOK_PATH};
use crate::metrics::gather_metrics;
use crate::webhook::validate_handler;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Prometheus text exposition content type
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Build the operator's HTTP router.
pub fn router() -> Router {
    Router::new()
        .route(METRICS_SERVER_PATH, get(metrics_handler))
        .route(HEALTHZ_PATH, get(probe_handler))
        .route(READYZ_PATH, get(probe_handler))
        .route(VALIDATE_WEBHOOK_PATH, post(validate_handler))
}

async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn probe_handler() -> &'static str {
    "ok"
}

/// Resolves when the process receives SIGTERM (pod termination) or Ctrl-C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, initiating graceful shutdown..."),
        () = terminate => info!("Received SIGTERM (pod termination), initiating graceful shutdown..."),
    }
}

/// Serve the router on `addr` until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run_http_server(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod server_tests;
