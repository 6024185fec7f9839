// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! `NamespaceLabel` controller wiring.
//!
//! Runs a `kube::runtime::Controller` over `NamespaceLabel` objects and also
//! watches Namespaces, mapping each Namespace event back to the
//! `NamespaceLabel` objects living in it. kube-runtime guarantees at most one
//! in-flight pass per object.

use crate::constants::KIND_NAMESPACE_LABEL;
use crate::context::{Context, ReconcileSettings};
use crate::crd::NamespaceLabel;
use crate::errors::Error;
use crate::metrics;
use crate::reconcilers::namespacelabel::mapper::requests_for_namespace;
use crate::reconcilers::{reconcile_namespacelabel, ObjectKey, ReconcileOutcome};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Namespace;
use kube::runtime::controller::Action;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Api, Client};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Reconciliation error wrapper
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReconcileError(#[from] Error);

/// Translate the outcome of a successful pass into a controller action.
///
/// An explicit `requeue_after` wins. Otherwise the object is re-checked after
/// the resync interval, or only on the next watch event when resync is off.
#[must_use]
pub fn outcome_to_action(outcome: ReconcileOutcome, settings: &ReconcileSettings) -> Action {
    match (outcome.requeue_after, outcome.requeue, settings.resync_interval) {
        (Some(delay), _, _) => Action::requeue(delay),
        (None, true, _) => Action::requeue(settings.error_requeue),
        (None, false, Some(interval)) => Action::requeue(interval),
        (None, false, None) => Action::await_change(),
    }
}

/// Error policy for the controller.
///
/// Returns an action to requeue the resource after a delay when reconciliation fails.
#[allow(clippy::needless_pass_by_value)] // Signature required by kube::runtime::Controller
pub fn error_policy<T>(resource: Arc<T>, err: &ReconcileError, ctx: Arc<Context>) -> Action
where
    T: Debug,
{
    error!(
        error = %err,
        resource = ?resource,
        "Reconciliation error - will retry in {}s",
        ctx.settings.error_requeue.as_secs()
    );
    Action::requeue(ctx.settings.error_requeue)
}

/// Reconcile wrapper: derives the object key, runs the pass and records metrics.
///
/// # Errors
///
/// Returns the reconciler's error unchanged so `error_policy` can requeue.
pub async fn reconcile_wrapper(
    nslabel: Arc<NamespaceLabel>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();

    let result = match ObjectKey::from_resource(&nslabel) {
        Ok(key) => reconcile_namespacelabel(ctx.clone(), &key)
            .await
            .map(|outcome| (key, outcome)),
        Err(e) => Err(e),
    };

    let duration = start.elapsed();
    match result {
        Ok((key, outcome)) => {
            metrics::record_reconciliation_success(KIND_NAMESPACE_LABEL, duration);
            if outcome.requeue {
                metrics::record_reconciliation_requeue(KIND_NAMESPACE_LABEL);
            }
            debug!("Successfully reconciled NamespaceLabel {}", key);
            Ok(outcome_to_action(outcome, &ctx.settings))
        }
        Err(e) => {
            metrics::record_reconciliation_error(KIND_NAMESPACE_LABEL, duration);
            metrics::record_error(KIND_NAMESPACE_LABEL, e.metric_label());
            Err(e.into())
        }
    }
}

/// Run the `NamespaceLabel` controller until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the controller cannot be started.
pub async fn run_namespacelabel_controller(client: Client, context: Arc<Context>) -> anyhow::Result<()> {
    info!("Starting NamespaceLabel controller");

    let api = Api::<NamespaceLabel>::all(client.clone());
    let namespace_api = Api::<Namespace>::all(client);
    let watcher_config = WatcherConfig::default();

    let controller = Controller::new(api, watcher_config.clone());
    let store = controller.store();

    controller
        .watches(namespace_api, watcher_config, move |namespace: Namespace| {
            requests_for_namespace(&store, &namespace)
        })
        .shutdown_on_signal()
        .run(reconcile_wrapper, error_policy, context)
        .for_each(|result| {
            match result {
                Ok((obj, _action)) => debug!(object = %obj, "Reconcile loop completed"),
                Err(e) => warn!(error = %e, "Controller reported an error"),
            }
            futures::future::ready(())
        })
        .await;

    info!("NamespaceLabel controller stopped");
    Ok(())
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
