// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Kubernetes API access used by the reconciler.
//!
//! [`KubeClient`] lists every call the reconciler makes. Production code uses
//! [`KubeClientImpl`], which wraps `kube::Api` and bounds each call with a
//! deadline. Tests drive the reconciler against an in-memory fake instead.
//!
//! Fetches translate HTTP 404 into `Ok(None)`. Writes always carry the
//! `resourceVersion` the caller fetched, so a concurrent modification surfaces
//! as an HTTP 409 [`Error::Api`] rather than being merged blindly.

use crate::crd::NamespaceLabel;
use crate::errors::{Error, Operation, Result};
use crate::reconcilers::namespacelabel::types::ObjectKey;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Cluster operations performed while reconciling a `NamespaceLabel`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KubeClient: Send + Sync {
    /// Fetch a `NamespaceLabel`, `None` if it no longer exists.
    async fn get_namespace_label(&self, key: &ObjectKey) -> Result<Option<NamespaceLabel>>;

    /// Fetch a Namespace, `None` if it does not exist.
    async fn get_namespace(&self, name: &str) -> Result<Option<Namespace>>;

    /// Replace a Namespace. The object must carry the `resourceVersion` it was
    /// fetched with.
    async fn replace_namespace(&self, namespace: &Namespace) -> Result<Namespace>;

    /// Apply a JSON merge patch touching `metadata.finalizers`.
    async fn patch_namespace_label_finalizers(
        &self,
        key: &ObjectKey,
        patch: &Value,
    ) -> Result<NamespaceLabel>;

    /// Apply a JSON merge patch to the status subresource.
    async fn patch_namespace_label_status(
        &self,
        key: &ObjectKey,
        patch: &Value,
    ) -> Result<NamespaceLabel>;
}

/// Run one API call under `timeout`, attaching the operation and object identity
/// to any failure.
///
/// # Errors
///
/// Returns [`Error::Api`] if the call fails and [`Error::Timeout`] if it does
/// not complete in time.
pub async fn with_deadline<T, F>(
    timeout: Duration,
    operation: Operation,
    resource: &str,
    fut: F,
) -> Result<T>
where
    F: Future<Output = std::result::Result<T, kube::Error>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(Error::Api {
            operation,
            resource: resource.to_string(),
            source,
        }),
        Err(_) => Err(Error::Timeout {
            operation,
            resource: resource.to_string(),
            timeout,
        }),
    }
}

/// Turn an HTTP 404 into `Ok(None)`.
///
/// # Errors
///
/// Passes every other error through unchanged.
pub fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// [`KubeClient`] backed by a real API server connection.
#[derive(Clone)]
pub struct KubeClientImpl {
    client: Client,
    timeout: Duration,
}

impl KubeClientImpl {
    /// Wrap `client`, bounding every call by `timeout`.
    #[must_use]
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn namespace_labels(&self, key: &ObjectKey) -> Api<NamespaceLabel> {
        Api::namespaced(self.client.clone(), &key.namespace)
    }
}

#[async_trait]
impl KubeClient for KubeClientImpl {
    async fn get_namespace_label(&self, key: &ObjectKey) -> Result<Option<NamespaceLabel>> {
        let api = self.namespace_labels(key);
        let resource = key.to_string();
        not_found_as_none(
            with_deadline(self.timeout, Operation::GetNamespaceLabel, &resource, api.get(&key.name))
                .await,
        )
    }

    async fn get_namespace(&self, name: &str) -> Result<Option<Namespace>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        not_found_as_none(
            with_deadline(self.timeout, Operation::GetNamespace, name, api.get(name)).await,
        )
    }

    async fn replace_namespace(&self, namespace: &Namespace) -> Result<Namespace> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let name = namespace.name_any();
        with_deadline(
            self.timeout,
            Operation::ReplaceNamespace,
            &name,
            api.replace(&name, &PostParams::default(), namespace),
        )
        .await
    }

    async fn patch_namespace_label_finalizers(
        &self,
        key: &ObjectKey,
        patch: &Value,
    ) -> Result<NamespaceLabel> {
        let api = self.namespace_labels(key);
        let params = PatchParams::default();
        with_deadline(
            self.timeout,
            Operation::PatchFinalizers,
            &key.to_string(),
            api.patch(&key.name, &params, &Patch::Merge(patch)),
        )
        .await
    }

    async fn patch_namespace_label_status(
        &self,
        key: &ObjectKey,
        patch: &Value,
    ) -> Result<NamespaceLabel> {
        let api = self.namespace_labels(key);
        let params = PatchParams::default();
        with_deadline(
            self.timeout,
            Operation::PatchStatus,
            &key.to_string(),
            api.patch_status(&key.name, &params, &Patch::Merge(patch)),
        )
        .await
    }
}

#[cfg(test)]
#[path = "client_fake.rs"]
pub(crate) mod fake;

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
