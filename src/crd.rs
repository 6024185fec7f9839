// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Custom Resource Definition for namespace label management.
//!
//! A [`NamespaceLabel`] declares the labels a user wants on the Namespace it lives
//! in. Exactly one `NamespaceLabel` governs a Namespace and it must be named after
//! that Namespace (enforced by the admission webhook in [`crate::webhook`]).
//!
//! # Example
//!
//! ```yaml
//! apiVersion: omer.omer.io/v1
//! kind: NamespaceLabel
//! metadata:
//!   name: team-a
//!   namespace: team-a
//! spec:
//!   labels:
//!     team: a
//!     cost-center: "1234"
//! status:
//!   syncLabels:
//!     team: a
//!   unSyncLabels:
//!     cost-center: "1234"
//! ```
//!
//! ```rust
//! use nslabel::crd::NamespaceLabelSpec;
//! use std::collections::BTreeMap;
//!
//! let spec = NamespaceLabelSpec {
//!     labels: BTreeMap::from([("team".to_string(), "a".to_string())]),
//! };
//! assert_eq!(spec.labels.len(), 1);
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Desired labels for the Namespace this resource lives in.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "omer.omer.io",
    version = "v1",
    kind = "NamespaceLabel",
    plural = "namespacelabels",
    shortname = "nslabel",
    namespaced,
    doc = "NamespaceLabel declares the labels that should be present on the Namespace of the same name. The controller applies every label it can safely claim and reports the rest as unsynced."
)]
#[kube(status = "NamespaceLabelStatus")]
#[kube(derive = "PartialEq")]
#[kube(
    printcolumn = r#"{"name":"Synced","type":"string","jsonPath":".status.syncLabels","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceLabelSpec {
    /// Labels the user wants applied to the Namespace.
    ///
    /// Keys that already exist on the Namespace and were not placed there by
    /// this controller are never overwritten; they are reported in
    /// `status.unSyncLabels` instead.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Observed synchronization state, written only by the controller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceLabelStatus {
    /// Labels this controller has applied to the Namespace and now owns.
    #[serde(default)]
    pub sync_labels: BTreeMap<String, String>,

    /// Desired labels the controller deliberately did not apply, either because
    /// the key is protected or because a foreign label already holds it.
    #[serde(default)]
    pub un_sync_labels: BTreeMap<String, String>,
}

impl NamespaceLabel {
    /// Labels previously claimed by the controller (empty when no status yet).
    #[must_use]
    pub fn synced_labels(&self) -> &BTreeMap<String, String> {
        static EMPTY: BTreeMap<String, String> = BTreeMap::new();
        self.status.as_ref().map_or(&EMPTY, |s| &s.sync_labels)
    }

    /// Returns `true` once the API server has set a deletion timestamp.
    #[must_use]
    pub fn is_being_deleted(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }
}
