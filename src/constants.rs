// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Global constants for the nslabel operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// Kind name for `NamespaceLabel` resource
pub const KIND_NAMESPACE_LABEL: &str = "NamespaceLabel";

// ============================================================================
// Finalizers
// ============================================================================

/// Finalizer blocking `NamespaceLabel` deletion until synced labels are removed
pub const FINALIZER_NAMESPACE_LABEL: &str = "namespacelabel.omer.io/finalizer";

// ============================================================================
// Controller Timing Constants
// ============================================================================

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Periodic drift re-check after a successful reconciliation (5 minutes)
pub const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 300;

/// Deadline applied to every Kubernetes API call made by the reconciler
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Thread name prefix for Tokio worker threads
pub const TOKIO_THREAD_NAME: &str = "nslabel-controller";

// ============================================================================
// HTTP Server Constants
// ============================================================================

/// Port for the metrics, health and admission HTTP server
pub const HTTP_SERVER_PORT: u16 = 8080;

/// Bind address for the HTTP server
pub const HTTP_SERVER_BIND_ADDRESS: &str = "0.0.0.0";

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Liveness endpoint
pub const HEALTHZ_PATH: &str = "/healthz";

/// Readiness endpoint
pub const READYZ_PATH: &str = "/readyz";

/// Validating admission webhook endpoint for `NamespaceLabel`
pub const VALIDATE_WEBHOOK_PATH: &str = "/validate-omer-omer-io-v1-namespacelabel";

// ============================================================================
// Environment Variables
// ============================================================================

/// Comma separated list of protected label keys
pub const ENV_PROTECTED_LABELS: &str = "NSLABEL_PROTECTED_LABELS";

/// Log output format (`text` or `json`)
pub const ENV_LOG_FORMAT: &str = "RUST_LOG_FORMAT";
