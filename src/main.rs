// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use kube::Client;
use nslabel::{
    client::KubeClientImpl,
    config::{Config, LogFormat},
    constants::{TOKIO_THREAD_NAME, TOKIO_WORKER_THREADS},
    context::Context,
    controller::run_namespacelabel_controller,
    server::run_http_server,
};
use std::sync::Arc;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let config = Config::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name(TOKIO_THREAD_NAME)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

fn init_logging(format: LogFormat) {
    // Respects RUST_LOG if set, otherwise defaults to INFO level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(config: Config) -> Result<()> {
    init_logging(config.log_format);

    info!("Starting NamespaceLabel controller");
    debug!(?config, "Configuration loaded");

    let protected_labels = config.protected_labels();
    if !protected_labels.is_empty() {
        info!(
            "Protected labels: {}",
            protected_labels.iter().collect::<Vec<_>>().join(", ")
        );
    }

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let context = Arc::new(Context::new(
        Arc::new(KubeClientImpl::new(client.clone(), config.api_timeout())),
        protected_labels,
        config.reconcile_settings(),
    ));

    // Both tasks stop on SIGTERM / Ctrl-C; whichever finishes first ends the process
    tokio::select! {
        result = run_namespacelabel_controller(client, context) => {
            if let Err(e) = &result {
                error!("CRITICAL: NamespaceLabel controller exited with error: {:?}", e);
            }
            result?;
        }
        result = run_http_server(config.http_address()) => {
            if let Err(e) = &result {
                error!("CRITICAL: HTTP server exited with error: {:?}", e);
            }
            result?;
        }
    }

    info!("Graceful shutdown completed successfully");
    Ok(())
}
