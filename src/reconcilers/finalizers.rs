// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Finalizer management for `NamespaceLabel` resources.
//!
//! Finalizers are written with a JSON merge patch that replaces the whole
//! `metadata.finalizers` list and carries the `resourceVersion` the list was
//! computed from. A concurrent edit to the list therefore fails with a
//! conflict instead of silently dropping someone else's finalizer.
//!
//! # Example
//!
//! ```rust,ignore
//! use nslabel::constants::FINALIZER_NAMESPACE_LABEL;
//! use nslabel::reconcilers::finalizers::ensure_finalizer;
//!
//! let nslabel = ensure_finalizer(client, &key, nslabel, FINALIZER_NAMESPACE_LABEL).await?;
//! ```

use crate::client::KubeClient;
use crate::crd::NamespaceLabel;
use crate::errors::Result;
use crate::metrics;
use crate::reconcilers::namespacelabel::types::ObjectKey;
use kube::ResourceExt;
use serde_json::{json, Value};
use tracing::info;

/// Returns `true` if `finalizer` is present on `resource`.
#[must_use]
pub fn has_finalizer<T: ResourceExt>(resource: &T, finalizer: &str) -> bool {
    resource.finalizers().iter().any(|f| f == finalizer)
}

/// Build a merge patch that sets `metadata.finalizers` to `finalizers`.
///
/// The patch is guarded by the resource's current `resourceVersion` when it has one.
#[must_use]
pub fn finalizers_patch<T: ResourceExt>(resource: &T, finalizers: &[String]) -> Value {
    let mut metadata = json!({ "finalizers": finalizers });
    if let Some(version) = resource.resource_version() {
        metadata["resourceVersion"] = Value::String(version);
    }
    json!({ "metadata": metadata })
}

/// Add a finalizer to a `NamespaceLabel` if not already present.
///
/// The operation is idempotent: no API call is made when the finalizer is
/// already there.
///
/// # Returns
///
/// The object as returned by the API server after the write, or the input
/// unchanged if no write was needed.
///
/// # Errors
///
/// Returns an error if the patch is rejected, including a conflict when the
/// object changed since it was fetched.
pub async fn ensure_finalizer(
    client: &dyn KubeClient,
    key: &ObjectKey,
    nslabel: NamespaceLabel,
    finalizer: &str,
) -> Result<NamespaceLabel> {
    if has_finalizer(&nslabel, finalizer) {
        return Ok(nslabel);
    }

    info!("Adding finalizer {} to NamespaceLabel {}", finalizer, key);

    let mut finalizers = nslabel.finalizers().to_vec();
    finalizers.push(finalizer.to_string());
    let patch = finalizers_patch(&nslabel, &finalizers);

    let updated = client.patch_namespace_label_finalizers(key, &patch).await?;
    metrics::record_write(metrics::WRITE_FINALIZER_ADD);

    info!(
        "Successfully added finalizer {} to NamespaceLabel {}",
        finalizer, key
    );
    Ok(updated)
}

/// Remove a finalizer from a `NamespaceLabel`.
///
/// Idempotent: calling it when the finalizer is already absent is a no-op.
/// Once the last finalizer is gone the API server purges an object that is
/// being deleted.
///
/// # Errors
///
/// Returns an error if the patch is rejected.
pub async fn remove_finalizer(
    client: &dyn KubeClient,
    key: &ObjectKey,
    nslabel: &NamespaceLabel,
    finalizer: &str,
) -> Result<()> {
    if !has_finalizer(nslabel, finalizer) {
        return Ok(());
    }

    info!("Removing finalizer {} from NamespaceLabel {}", finalizer, key);

    let finalizers: Vec<String> = nslabel
        .finalizers()
        .iter()
        .filter(|f| *f != finalizer)
        .cloned()
        .collect();
    let patch = finalizers_patch(nslabel, &finalizers);

    client.patch_namespace_label_finalizers(key, &patch).await?;
    metrics::record_write(metrics::WRITE_FINALIZER_REMOVE);

    info!(
        "Successfully removed finalizer {} from NamespaceLabel {}",
        finalizer, key
    );
    Ok(())
}

#[cfg(test)]
#[path = "finalizers_tests.rs"]
mod finalizers_tests;
