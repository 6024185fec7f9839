// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! `NamespaceLabel` reconciliation logic.
//!
//! Keeps the labels of a Namespace in sync with the `NamespaceLabel` living in
//! it. The controller only ever touches label keys it has claimed in
//! `status.syncLabels`; every other label on the Namespace belongs to someone
//! else and is left alone.
//!
//! ## Module Structure
//!
//! - [`partition`] - Classifies desired labels into sync and unsync sets
//! - [`merge`] - Computes the Namespace label set after a sync
//! - [`cleanup`] - Deletion path, removes claimed labels and the finalizer
//! - [`mapper`] - Maps Namespace events to `NamespaceLabel` requests
//! - [`types`] - Shared types

// Submodules
pub mod cleanup;
pub mod mapper;
pub mod merge;
pub mod partition;
pub mod types;

// Re-export public APIs for external use
pub use cleanup::cleanup_namespacelabel;
pub use mapper::{requests_for_namespace, NamespaceLabelLister};
pub use merge::{claimed_labels, merge_namespace_labels, strip_synced_labels};
pub use partition::LabelPartitioner;
pub use types::{LabelPartition, ObjectKey, ReconcileOutcome};

use crate::constants::FINALIZER_NAMESPACE_LABEL;
use crate::context::Context;
use crate::errors::Result;
use crate::metrics;
use crate::reconcilers::finalizers::ensure_finalizer;
use crate::reconcilers::status::NamespaceLabelStatusUpdater;
use std::sync::Arc;
use tracing::{debug, info};

/// Reconciles one `NamespaceLabel`.
///
/// Every pass starts from a fresh fetch and holds no state between calls:
///
/// 1. Fetch the `NamespaceLabel`; if it is gone there is nothing to do
/// 2. If it is being deleted, run [`cleanup_namespacelabel`]
/// 3. Add the finalizer if missing and continue with the updated object
/// 4. Fetch the governed Namespace; if it is missing, skip the sync and requeue
/// 5. Partition the desired labels and merge the sync set into the Namespace
/// 6. If the Namespace labels change, first claim the union of the previous
///    and new sync sets in status, then write the Namespace
/// 7. Write the final status only if it changed
///
/// Status always claims at least what the Namespace carries, so a pass that
/// fails between writes can still be cleaned up on deletion.
///
/// # Arguments
///
/// * `ctx` - Shared controller context
/// * `key` - Identity of the `NamespaceLabel` to reconcile
///
/// # Errors
///
/// Returns an error if any fetch or write fails. Errors are retryable: the
/// next pass recomputes everything from fresh fetches.
pub async fn reconcile_namespacelabel(
    ctx: Arc<Context>,
    key: &ObjectKey,
) -> Result<ReconcileOutcome> {
    let client = ctx.client.as_ref();

    debug!("Reconciling NamespaceLabel {}", key);

    let Some(nslabel) = client.get_namespace_label(key).await? else {
        debug!("NamespaceLabel {} not found, nothing to do", key);
        return Ok(ReconcileOutcome::done());
    };

    if nslabel.is_being_deleted() {
        info!("NamespaceLabel {} is being deleted, running cleanup", key);
        return cleanup_namespacelabel(client, key, &nslabel).await;
    }

    let mut nslabel = ensure_finalizer(client, key, nslabel, FINALIZER_NAMESPACE_LABEL).await?;

    let Some(mut namespace) = client.get_namespace(&key.namespace).await? else {
        debug!(
            "Namespace {} not found, skipping sync of NamespaceLabel {}",
            key.namespace, key
        );
        return Ok(ReconcileOutcome::requeue_after(ctx.settings.error_requeue));
    };

    let current_labels = namespace.metadata.labels.clone().unwrap_or_default();
    let previous_sync = nslabel.synced_labels().clone();

    let partition = ctx
        .partitioner()
        .partition(&nslabel.spec.labels, &current_labels, &previous_sync);
    debug!(
        sync = ?partition.sync.keys().collect::<Vec<_>>(),
        unsync = ?partition.unsync.keys().collect::<Vec<_>>(),
        "Partitioned labels for NamespaceLabel {}", key
    );

    let merged = merge_namespace_labels(&current_labels, &previous_sync, &partition.sync);
    if merged == current_labels {
        debug!("Namespace {} labels already up to date", key.namespace);
    } else {
        let claimed = claimed_labels(&previous_sync, &partition.sync);
        if claimed != previous_sync {
            let mut claim_updater = NamespaceLabelStatusUpdater::new(&nslabel);
            claim_updater.set_claim(&claimed);
            if let Some(updated) = claim_updater.apply(client, key).await? {
                nslabel = updated;
            }
            debug!(
                "Claimed {} labels for NamespaceLabel {} before updating Namespace",
                claimed.len(),
                key
            );
        }

        namespace.metadata.labels = Some(merged);
        client.replace_namespace(&namespace).await?;
        metrics::record_write(metrics::WRITE_NAMESPACE_UPDATE);
        info!(
            "Updated labels of Namespace {} for NamespaceLabel {}",
            key.namespace, key
        );
    }

    let mut status_updater = NamespaceLabelStatusUpdater::new(&nslabel);
    status_updater.set_partition(&partition);
    status_updater.apply(client, key).await?;

    metrics::set_labels_managed(
        &key.namespace,
        &key.name,
        partition.sync.len(),
        partition.unsync.len(),
    );

    Ok(ReconcileOutcome::done())
}
