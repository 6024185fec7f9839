// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Operator configuration.
//!
//! Every flag can also be set through an environment variable, which is how
//! the Deployment manifest configures the operator.

use crate::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_RESYNC_INTERVAL_SECS, ENV_LOG_FORMAT, ENV_PROTECTED_LABELS,
    ERROR_REQUEUE_DURATION_SECS, HTTP_SERVER_BIND_ADDRESS, HTTP_SERVER_PORT,
};
use crate::context::ReconcileSettings;
use crate::labels::ProtectedLabels;
use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable output
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Command line and environment configuration for the `nslabel` operator.
#[derive(Debug, Clone, Parser)]
#[command(name = "nslabel", version, about = "Keeps Namespace labels in sync with NamespaceLabel resources")]
pub struct Config {
    /// Label keys the operator must never write to a Namespace (comma separated)
    #[arg(
        long,
        env = ENV_PROTECTED_LABELS,
        value_delimiter = ',',
        num_args = 0..
    )]
    pub protected_labels: Vec<String>,

    /// Deadline for each Kubernetes API call, in seconds
    #[arg(long, env = "NSLABEL_API_TIMEOUT_SECS", default_value_t = DEFAULT_API_TIMEOUT_SECS)]
    pub api_timeout_secs: u64,

    /// Re-check interval after a successful pass, in seconds (0 disables)
    #[arg(long, env = "NSLABEL_RESYNC_INTERVAL_SECS", default_value_t = DEFAULT_RESYNC_INTERVAL_SECS)]
    pub resync_interval_secs: u64,

    /// Delay before retrying a failed pass, in seconds
    #[arg(long, env = "NSLABEL_ERROR_REQUEUE_SECS", default_value_t = ERROR_REQUEUE_DURATION_SECS)]
    pub error_requeue_secs: u64,

    /// Address the HTTP server binds to
    #[arg(long, env = "NSLABEL_BIND_ADDRESS", default_value = HTTP_SERVER_BIND_ADDRESS)]
    pub bind_address: IpAddr,

    /// Port for metrics, health and admission endpoints
    #[arg(long, env = "NSLABEL_HTTP_PORT", default_value_t = HTTP_SERVER_PORT)]
    pub http_port: u16,

    /// Log output format
    #[arg(long, env = ENV_LOG_FORMAT, value_enum, ignore_case = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    /// Protected label set, with blank entries dropped.
    #[must_use]
    pub fn protected_labels(&self) -> ProtectedLabels {
        ProtectedLabels::new(&self.protected_labels)
    }

    #[must_use]
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Requeue timing for the controller.
    #[must_use]
    pub fn reconcile_settings(&self) -> ReconcileSettings {
        ReconcileSettings {
            resync_interval: (self.resync_interval_secs > 0)
                .then(|| Duration::from_secs(self.resync_interval_secs)),
            error_requeue: Duration::from_secs(self.error_requeue_secs),
        }
    }

    #[must_use]
    pub fn http_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.http_port)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
