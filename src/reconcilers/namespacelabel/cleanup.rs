// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Deletion path for `NamespaceLabel` resources.
//!
//! Removes every label the controller claimed from the governed Namespace,
//! then lifts the finalizer so the API server can purge the object. Any
//! failure leaves the finalizer in place and the pass is retried.

use super::merge::strip_synced_labels;
use super::types::{ObjectKey, ReconcileOutcome};
use crate::client::KubeClient;
use crate::constants::FINALIZER_NAMESPACE_LABEL;
use crate::crd::NamespaceLabel;
use crate::errors::Result;
use crate::metrics;
use crate::reconcilers::finalizers::remove_finalizer;
use tracing::{debug, info};

/// Clean up after a `NamespaceLabel` that is being deleted.
///
/// # Arguments
///
/// * `client` - Kubernetes API access
/// * `key` - Identity of the `NamespaceLabel`
/// * `nslabel` - The freshly fetched, terminating object
///
/// # Errors
///
/// Returns an error if the Namespace update or the finalizer removal fails.
/// The finalizer stays on the object in both cases.
pub async fn cleanup_namespacelabel(
    client: &dyn KubeClient,
    key: &ObjectKey,
    nslabel: &NamespaceLabel,
) -> Result<ReconcileOutcome> {
    let synced = nslabel.synced_labels();

    match client.get_namespace(&key.namespace).await? {
        None => {
            debug!(
                "Namespace {} not found, nothing to clean for NamespaceLabel {}",
                key.namespace, key
            );
        }
        Some(mut namespace) => {
            let current = namespace.metadata.labels.clone().unwrap_or_default();
            if let Some(stripped) = strip_synced_labels(&current, synced) {
                let removed = current.len() - stripped.len();
                namespace.metadata.labels = Some(stripped);
                client.replace_namespace(&namespace).await?;
                metrics::record_write(metrics::WRITE_NAMESPACE_UPDATE);
                info!(
                    "Removed {} synced label(s) from Namespace {} for deleted NamespaceLabel {}",
                    removed, key.namespace, key
                );
            } else {
                debug!(
                    "Namespace {} carries none of the synced labels of {}",
                    key.namespace, key
                );
            }
        }
    }

    remove_finalizer(client, key, nslabel, FINALIZER_NAMESPACE_LABEL).await?;
    metrics::clear_labels_managed(&key.namespace, &key.name);

    Ok(ReconcileOutcome::done())
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod cleanup_tests;
