// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Label keys and the protected-label denylist.
//!
//! The operator writes arbitrary user-declared labels onto Namespaces, so the
//! only fixed keys it knows about are the Kubernetes-managed ones below plus
//! whatever the operator is configured to protect at startup.

use std::collections::BTreeSet;
use std::sync::Arc;

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/reference/labels-annotations-taints/
// ============================================================================

/// Label the API server stamps on every Namespace with the namespace name
pub const K8S_METADATA_NAME: &str = "kubernetes.io/metadata.name";

// ============================================================================
// Protected Labels
// ============================================================================

/// Immutable set of label keys the operator must never write to a Namespace.
///
/// Built once from configuration and shared by every reconciliation pass.
/// Cloning is cheap: the key set is reference counted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtectedLabels {
    keys: Arc<BTreeSet<String>>,
}

impl ProtectedLabels {
    /// Build the set from raw configuration entries.
    ///
    /// Entries are trimmed and blank entries are dropped, so a trailing comma
    /// in `NSLABEL_PROTECTED_LABELS` does not protect the empty key.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keys: Arc::new(keys),
        }
    }

    /// Returns `true` if `key` must never be applied to a Namespace.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod labels_tests;
