// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Status updates for `NamespaceLabel` resources.
//!
//! A JSON merge patch merges maps key by key, so writing the new
//! `syncLabels`/`unSyncLabels` maps as-is would never delete a key the
//! controller stopped claiming. The patch built here sets every dropped key to
//! `null` explicitly.
//!
//! # Example
//!
//! ```rust,ignore
//! use nslabel::reconcilers::status::NamespaceLabelStatusUpdater;
//!
//! let mut updater = NamespaceLabelStatusUpdater::new(&nslabel);
//! updater.set_partition(&partition);
//! updater.apply(client, &key).await?;
//! ```

use crate::client::KubeClient;
use crate::crd::{NamespaceLabel, NamespaceLabelStatus};
use crate::errors::Result;
use crate::metrics;
use crate::reconcilers::namespacelabel::types::{LabelPartition, ObjectKey};
use crate::reconcilers::status_changed;
use kube::ResourceExt;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Merge-patch body turning `current` into `desired`.
///
/// Keys missing from `desired` map to `null`; unchanged keys are omitted.
#[must_use]
pub fn label_map_patch(
    current: &BTreeMap<String, String>,
    desired: &BTreeMap<String, String>,
) -> Map<String, Value> {
    let mut patch = Map::new();
    for key in current.keys().filter(|k| !desired.contains_key(*k)) {
        patch.insert(key.clone(), Value::Null);
    }
    for (key, value) in desired {
        if current.get(key) != Some(value) {
            patch.insert(key.clone(), Value::String(value.clone()));
        }
    }
    patch
}

/// Collects the new status during a pass and writes it in a single call.
pub struct NamespaceLabelStatusUpdater {
    resource_version: Option<String>,
    current_status: Option<NamespaceLabelStatus>,
    new_status: NamespaceLabelStatus,
}

impl NamespaceLabelStatusUpdater {
    /// Start from the status carried by `nslabel`.
    #[must_use]
    pub fn new(nslabel: &NamespaceLabel) -> Self {
        let current_status = nslabel.status.clone();
        Self {
            resource_version: nslabel.resource_version(),
            new_status: current_status.clone().unwrap_or_default(),
            current_status,
        }
    }

    /// Record the outcome of the label partition (in-memory only, no API call).
    pub fn set_partition(&mut self, partition: &LabelPartition) {
        self.new_status.sync_labels.clone_from(&partition.sync);
        self.new_status.un_sync_labels.clone_from(&partition.unsync);
    }

    /// Claim `labels` ahead of a Namespace write (in-memory only, no API call).
    ///
    /// Claimed keys leave `unSyncLabels` so the two maps stay disjoint.
    pub fn set_claim(&mut self, labels: &BTreeMap<String, String>) {
        self.new_status.sync_labels.clone_from(labels);
        self.new_status
            .un_sync_labels
            .retain(|key, _| !labels.contains_key(key));
    }

    /// Status as it will be written.
    #[must_use]
    pub fn status(&self) -> &NamespaceLabelStatus {
        &self.new_status
    }

    /// Returns `true` if the collected status differs from the fetched one.
    ///
    /// An object with no status yet always needs a write, even when both maps
    /// are empty, so that `status` becomes visible to users.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        status_changed(&self.current_status, &Some(self.new_status.clone()))
    }

    /// Merge patch for the status subresource, guarded by `resourceVersion`.
    #[must_use]
    pub fn patch(&self) -> Value {
        let current = self.current_status.clone().unwrap_or_default();
        let mut patch = json!({
            "status": {
                "syncLabels": label_map_patch(&current.sync_labels, &self.new_status.sync_labels),
                "unSyncLabels": label_map_patch(&current.un_sync_labels, &self.new_status.un_sync_labels),
            }
        });
        if let Some(version) = &self.resource_version {
            patch["metadata"] = json!({ "resourceVersion": version });
        }
        patch
    }

    /// Write the collected status if it changed.
    ///
    /// Returns the updated object when a write happened, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the status patch is rejected.
    pub async fn apply(
        &self,
        client: &dyn KubeClient,
        key: &ObjectKey,
    ) -> Result<Option<NamespaceLabel>> {
        if !self.has_changes() {
            debug!("NamespaceLabel {} status unchanged, skipping update", key);
            return Ok(None);
        }

        let updated = client
            .patch_namespace_label_status(key, &self.patch())
            .await?;
        metrics::record_write(metrics::WRITE_STATUS_UPDATE);

        info!(
            "Updated NamespaceLabel {} status: {} synced, {} unsynced",
            key,
            self.new_status.sync_labels.len(),
            self.new_status.un_sync_labels.len()
        );
        Ok(Some(updated))
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
