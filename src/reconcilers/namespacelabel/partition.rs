// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Classification of desired labels into syncable and blocked sets.
//!
//! Each desired key is checked in order, first match wins:
//!
//! | Condition | Result |
//! |-----------|--------|
//! | key is protected | unsync |
//! | key on namespace and previously synced | sync (desired value wins) |
//! | key on namespace, not previously synced | unsync (foreign label) |
//! | key absent from namespace | sync (uncontested) |

use super::types::LabelPartition;
use crate::labels::ProtectedLabels;
use std::collections::BTreeMap;

/// Splits desired labels using the operator's protected-label configuration.
#[derive(Debug, Clone, Default)]
pub struct LabelPartitioner {
    protected: ProtectedLabels,
}

impl LabelPartitioner {
    #[must_use]
    pub fn new(protected: ProtectedLabels) -> Self {
        Self { protected }
    }

    /// Partition `desired` against the live namespace labels and the previous claim.
    ///
    /// Pure and deterministic: the same three maps always yield the same result.
    ///
    /// # Arguments
    ///
    /// * `desired` - `spec.labels` of the `NamespaceLabel`
    /// * `namespace_labels` - labels currently on the Namespace
    /// * `previous_sync` - `status.syncLabels` from the last successful pass
    #[must_use]
    pub fn partition(
        &self,
        desired: &BTreeMap<String, String>,
        namespace_labels: &BTreeMap<String, String>,
        previous_sync: &BTreeMap<String, String>,
    ) -> LabelPartition {
        let mut partition = LabelPartition::default();

        for (key, value) in desired {
            let claimable = if self.protected.contains(key) {
                false
            } else if namespace_labels.contains_key(key) {
                previous_sync.contains_key(key)
            } else {
                true
            };

            let target = if claimable {
                &mut partition.sync
            } else {
                &mut partition.unsync
            };
            target.insert(key.clone(), value.clone());
        }

        partition
    }
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod partition_tests;
