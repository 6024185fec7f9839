// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation logic for `NamespaceLabel` resources.
//!
//! # Reconciliation Architecture
//!
//! The controller follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - Monitor `NamespaceLabel` and Namespace changes
//! 2. **Reconcile** - Compare desired labels with the live Namespace
//! 3. **Update** - Apply the labels the controller may claim
//! 4. **Status** - Report synced and unsynced labels back on the resource
//!
//! # Available Reconcilers
//!
//! - [`reconcile_namespacelabel`] - Syncs Namespace labels, or cleans up on deletion
//!
//! # Example: Using a Reconciler
//!
//! ```rust,no_run
//! use nslabel::context::Context;
//! use nslabel::reconcilers::{reconcile_namespacelabel, ObjectKey};
//! use std::sync::Arc;
//!
//! async fn reconcile(ctx: Arc<Context>) -> Result<(), nslabel::errors::Error> {
//!     let key = ObjectKey::new("team-a", "team-a");
//!     reconcile_namespacelabel(ctx, &key).await?;
//!     Ok(())
//! }
//! ```

pub mod finalizers;
pub mod namespacelabel;
pub mod status;


pub use namespacelabel::{reconcile_namespacelabel, ObjectKey, ReconcileOutcome};

/// Check if a status value has actually changed compared to the current status.
///
/// This helper prevents unnecessary status updates that would trigger reconciliation loops.
/// It compares a new status value with the existing status and returns `true` only if
/// they differ, indicating an update is needed.
///
/// # Arguments
///
/// * `current_value` - The current status value (from existing resource)
/// * `new_value` - The new status value to potentially set
///
/// # Returns
///
/// * `true` - Status has changed and needs updating
/// * `false` - Status is unchanged, skip the update
///
/// # Why This Matters
///
/// In kube-rs, status updates trigger "object updated" events which cause new reconciliations.
/// Writing an identical status on every pass would wake the controller again
/// for no reason.
#[must_use]
pub fn status_changed<T: PartialEq>(current_value: &Option<T>, new_value: &Option<T>) -> bool {
    current_value != new_value
}
