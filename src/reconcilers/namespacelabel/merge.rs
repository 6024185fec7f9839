// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Computes the Namespace label set after a sync.
//!
//! The controller only ever touches keys in the previous or the new sync set.
//! Everything else on the Namespace passes through unchanged.

use std::collections::BTreeMap;

/// Build the replacement label map for a Namespace.
///
/// 1. Keys in `previous_sync` but not in `new_sync` are retracted.
/// 2. All other existing labels are kept.
/// 3. Every entry of `new_sync` is written, overwriting stale values.
///
/// # Arguments
///
/// * `namespace_labels` - labels currently on the Namespace
/// * `previous_sync` - `status.syncLabels` before this pass
/// * `new_sync` - sync set computed by the partitioner for this pass
#[must_use]
pub fn merge_namespace_labels(
    namespace_labels: &BTreeMap<String, String>,
    previous_sync: &BTreeMap<String, String>,
    new_sync: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, String> = namespace_labels
        .iter()
        .filter(|(key, _)| !previous_sync.contains_key(*key) || new_sync.contains_key(*key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    merged.extend(new_sync.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Keys the controller owns while a Namespace write is in flight.
///
/// Union of the previous and the new sync set, new values winning. Recording
/// this in status before touching the Namespace means a failed pass never
/// leaves a label on the Namespace that status does not claim.
#[must_use]
pub fn claimed_labels(
    previous_sync: &BTreeMap<String, String>,
    new_sync: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut claimed = previous_sync.clone();
    claimed.extend(new_sync.iter().map(|(k, v)| (k.clone(), v.clone())));
    claimed
}

/// Remove every key in `synced` from `namespace_labels`.
///
/// Returns `None` when none of the keys were present, so callers can skip the
/// write entirely.
#[must_use]
pub fn strip_synced_labels(
    namespace_labels: &BTreeMap<String, String>,
    synced: &BTreeMap<String, String>,
) -> Option<BTreeMap<String, String>> {
    if !synced.keys().any(|k| namespace_labels.contains_key(k)) {
        return None;
    }

    Some(
        namespace_labels
            .iter()
            .filter(|(key, _)| !synced.contains_key(*key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
