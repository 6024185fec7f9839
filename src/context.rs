// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Shared context for the namespace label controller.
//!
//! The controller passes an `Arc<Context>` to every reconciliation pass. It
//! carries the cluster client and the immutable configuration the pass needs;
//! no state survives between passes.

use crate::client::KubeClient;
use crate::labels::ProtectedLabels;
use crate::reconcilers::namespacelabel::partition::LabelPartitioner;
use std::sync::Arc;
use std::time::Duration;

/// Timing knobs for the controller wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// Re-check a healthy object after this long (`None` waits for the next event)
    pub resync_interval: Option<Duration>,
    /// Delay before retrying a failed pass
    pub error_requeue: Duration,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            resync_interval: Some(Duration::from_secs(
                crate::constants::DEFAULT_RESYNC_INTERVAL_SECS,
            )),
            error_requeue: Duration::from_secs(crate::constants::ERROR_REQUEUE_DURATION_SECS),
        }
    }
}

/// Shared context passed to every reconciliation pass.
#[derive(Clone)]
pub struct Context {
    /// Kubernetes API access
    pub client: Arc<dyn KubeClient>,

    /// Label keys never written to a Namespace
    pub protected_labels: ProtectedLabels,

    /// Requeue timing
    pub settings: ReconcileSettings,
}

impl Context {
    #[must_use]
    pub fn new(
        client: Arc<dyn KubeClient>,
        protected_labels: ProtectedLabels,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            client,
            protected_labels,
            settings,
        }
    }

    /// Partitioner configured with this context's protected labels.
    #[must_use]
    pub fn partitioner(&self) -> LabelPartitioner {
        LabelPartitioner::new(self.protected_labels.clone())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
