// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the namespace label controller.
//!
//! All metrics share the namespace prefix `nslabel_omer_io_` (prometheus-safe
//! version of "nslabel.omer.io").
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Track reconciliation passes and their outcomes
//! - **Write Metrics** - Track every write the controller makes to the cluster
//! - **Error Metrics** - Track error conditions by category
//! - **Label Metrics** - Track how many labels each `NamespaceLabel` manages
//!
//! # Example
//!
//! ```rust,no_run
//! use nslabel::metrics::record_reconciliation_success;
//!
//! record_reconciliation_success("NamespaceLabel", std::time::Duration::from_millis(20));
//! ```

use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all controller metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "nslabel_omer_io";

/// `operation` label values for [`NAMESPACE_LABEL_WRITES_TOTAL`]
pub const WRITE_NAMESPACE_UPDATE: &str = "namespace_update";
pub const WRITE_STATUS_UPDATE: &str = "status_update";
pub const WRITE_FINALIZER_ADD: &str = "finalizer_add";
pub const WRITE_FINALIZER_REMOVE: &str = "finalizer_remove";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciliations by resource type and status
///
/// Labels:
/// - `resource_type`: Kind of resource (`NamespaceLabel`)
/// - `status`: Outcome (`success`, `error`, `requeue`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciliations by resource type and status",
    );
    let counter = CounterVec::new(opts, &["resource_type", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliations in seconds
///
/// Labels:
/// - `resource_type`: Kind of resource
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliations in seconds by resource type",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["resource_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Write Metrics
// ============================================================================

/// Total number of writes issued against the cluster
///
/// Labels:
/// - `operation`: `namespace_update`, `status_update`, `finalizer_add`, `finalizer_remove`
pub static NAMESPACE_LABEL_WRITES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_namespace_label_writes_total"),
        "Total number of writes issued by the controller by operation",
    );
    let counter = CounterVec::new(opts, &["operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of errors by resource type and error category
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `error_type`: Category (`api_error`, `conflict`, `timeout`, ...)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of errors by resource type and error category",
    );
    let counter = CounterVec::new(opts, &["resource_type", "error_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Label Metrics
// ============================================================================

/// Number of labels per namespace after the last successful pass
///
/// Labels:
/// - `namespace`: Governed namespace
/// - `name`: Name of the `NamespaceLabel`
/// - `state`: `sync` or `unsync`
pub static LABELS_MANAGED: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_labels_managed"),
        "Number of labels synced and unsynced per NamespaceLabel",
    );
    let gauge = GaugeVec::new(opts, &["namespace", "name", "state"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful reconciliation
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled (e.g., `NamespaceLabel`)
/// * `duration` - Duration of the reconciliation
pub fn record_reconciliation_success(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "success"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a failed reconciliation
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled
/// * `duration` - Duration of the reconciliation before failure
pub fn record_reconciliation_error(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "error"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a pass that asked to be requeued early
pub fn record_reconciliation_requeue(resource_type: &str) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "requeue"])
        .inc();
}

/// Record an error
///
/// # Arguments
/// * `resource_type` - The kind of resource where error occurred
/// * `error_type` - Category of error (see [`crate::errors::Error::metric_label`])
pub fn record_error(resource_type: &str, error_type: &str) {
    ERRORS_TOTAL
        .with_label_values(&[resource_type, error_type])
        .inc();
}

/// Record one write to the cluster
pub fn record_write(operation: &str) {
    NAMESPACE_LABEL_WRITES_TOTAL
        .with_label_values(&[operation])
        .inc();
}

/// Publish the sync/unsync label counts of one `NamespaceLabel`
#[allow(clippy::cast_precision_loss)]
pub fn set_labels_managed(namespace: &str, name: &str, synced: usize, unsynced: usize) {
    LABELS_MANAGED
        .with_label_values(&[namespace, name, "sync"])
        .set(synced as f64);
    LABELS_MANAGED
        .with_label_values(&[namespace, name, "unsync"])
        .set(unsynced as f64);
}

/// Drop the label gauges of a `NamespaceLabel` that was cleaned up
pub fn clear_labels_managed(namespace: &str, name: &str) {
    for state in ["sync", "unsync"] {
        // Missing series is fine
        let _ = LABELS_MANAGED.remove_label_values(&[namespace, name, state]);
    }
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Returns
/// Prometheus-formatted metrics as a String
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
