// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! In-memory [`KubeClient`] for unit tests.
//!
//! Behaves like a tiny API server: every write bumps `resourceVersion`, a
//! stale `resourceVersion` is rejected with 409, merge patches follow RFC 7386
//! (`null` deletes a key), and a `NamespaceLabel` that is being deleted is
//! purged once its last finalizer is removed.

use super::KubeClient;
use crate::crd::NamespaceLabel;
use crate::errors::{Error, Operation, Result};
use crate::reconcilers::namespacelabel::types::ObjectKey;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::ObjectMeta;
use kube::ResourceExt;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    namespace_labels: BTreeMap<ObjectKey, NamespaceLabel>,
    namespaces: BTreeMap<String, Namespace>,
    next_version: u64,
    /// Pending injected failure per operation: calls to let through, then the code.
    failures: HashMap<Operation, (usize, u16)>,
    calls: Vec<Operation>,
}

impl State {
    fn bump(&mut self) -> String {
        self.next_version += 1;
        self.next_version.to_string()
    }
}

#[derive(Default)]
pub(crate) struct FakeKubeClient {
    state: Mutex<State>,
}

pub(crate) fn api_error(operation: Operation, resource: &str, code: u16) -> Error {
    Error::Api {
        operation,
        resource: resource.to_string(),
        source: kube::Error::Api(Box::new(kube::core::Status {
            status: Some(kube::core::response::StatusSummary::Failure),
            message: format!("injected {code}"),
            reason: match code {
                404 => "NotFound",
                409 => "Conflict",
                _ => "InternalError",
            }
            .to_string(),
            code,
            metadata: None,
            details: None,
        })),
    }
}

fn labels_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Build a `NamespaceLabel` named after its namespace.
pub(crate) fn namespace_label(namespace: &str, desired: &[(&str, &str)]) -> NamespaceLabel {
    let mut nslabel = NamespaceLabel::new(
        namespace,
        crate::crd::NamespaceLabelSpec {
            labels: labels_of(desired),
        },
    );
    nslabel.metadata.namespace = Some(namespace.to_string());
    nslabel
}

impl FakeKubeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Create or overwrite a Namespace with the given labels.
    pub(crate) fn put_namespace(&self, name: &str, labels: &[(&str, &str)]) {
        let mut state = self.lock();
        let version = state.bump();
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(labels_of(labels)),
                resource_version: Some(version),
                ..ObjectMeta::default()
            },
            ..Namespace::default()
        };
        state.namespaces.insert(name.to_string(), namespace);
    }

    /// Simulate a foreign writer setting one label on a Namespace.
    pub(crate) fn set_namespace_label(&self, name: &str, key: &str, value: &str) {
        let mut state = self.lock();
        let version = state.bump();
        if let Some(ns) = state.namespaces.get_mut(name) {
            ns.labels_mut().insert(key.to_string(), value.to_string());
            ns.metadata.resource_version = Some(version);
        }
    }

    pub(crate) fn remove_namespace(&self, name: &str) {
        self.lock().namespaces.remove(name);
    }

    pub(crate) fn namespace_labels(&self, name: &str) -> BTreeMap<String, String> {
        self.lock()
            .namespaces
            .get(name)
            .map(|ns| ns.labels().clone())
            .unwrap_or_default()
    }

    pub(crate) fn namespace_version(&self, name: &str) -> Option<String> {
        self.lock()
            .namespaces
            .get(name)
            .and_then(|ns| ns.metadata.resource_version.clone())
    }

    /// Store a `NamespaceLabel` as if a user had applied it.
    pub(crate) fn put_namespace_label(&self, mut nslabel: NamespaceLabel) -> ObjectKey {
        let mut state = self.lock();
        nslabel.metadata.resource_version = Some(state.bump());
        let key = ObjectKey::new(
            nslabel.namespace().unwrap_or_default(),
            nslabel.name_any(),
        );
        state.namespace_labels.insert(key.clone(), nslabel);
        key
    }

    /// Replace the desired labels of a stored `NamespaceLabel`.
    pub(crate) fn set_desired(&self, key: &ObjectKey, desired: &[(&str, &str)]) {
        let mut state = self.lock();
        let version = state.bump();
        if let Some(nslabel) = state.namespace_labels.get_mut(key) {
            nslabel.spec.labels = labels_of(desired);
            nslabel.metadata.resource_version = Some(version);
        }
    }

    /// Request deletion: set `deletionTimestamp`, purge if no finalizers remain.
    pub(crate) fn request_deletion(&self, key: &ObjectKey) {
        let mut state = self.lock();
        let version = state.bump();
        let Some(nslabel) = state.namespace_labels.get_mut(key) else {
            return;
        };
        if nslabel.finalizers().is_empty() {
            state.namespace_labels.remove(key);
            return;
        }
        nslabel.metadata.deletion_timestamp =
            Some(serde_json::from_value(json!("2025-01-01T00:00:00Z")).unwrap());
        nslabel.metadata.resource_version = Some(version);
    }

    pub(crate) fn namespace_label(&self, key: &ObjectKey) -> Option<NamespaceLabel> {
        self.lock().namespace_labels.get(key).cloned()
    }

    /// Make the next call of `operation` fail with HTTP `code`.
    pub(crate) fn fail_next(&self, operation: Operation, code: u16) {
        self.fail_call(operation, 1, code);
    }

    /// Make the `nth` upcoming call (1-based) of `operation` fail with HTTP `code`.
    pub(crate) fn fail_call(&self, operation: Operation, nth: usize, code: u16) {
        self.lock()
            .failures
            .insert(operation, (nth.saturating_sub(1), code));
    }

    /// Number of times `operation` was attempted.
    pub(crate) fn calls(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    /// Total number of write attempts.
    pub(crate) fn writes(&self) -> usize {
        [
            Operation::ReplaceNamespace,
            Operation::PatchFinalizers,
            Operation::PatchStatus,
        ]
        .into_iter()
        .map(|op| self.calls(op))
        .sum()
    }

    fn begin(state: &mut State, operation: Operation, resource: &str) -> Result<()> {
        state.calls.push(operation);
        match state.failures.get(&operation).copied() {
            Some((0, code)) => {
                state.failures.remove(&operation);
                Err(api_error(operation, resource, code))
            }
            Some((skip, code)) => {
                state.failures.insert(operation, (skip - 1, code));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn patch_stored(
        &self,
        operation: Operation,
        key: &ObjectKey,
        patch: &Value,
        subresource_status: bool,
    ) -> Result<NamespaceLabel> {
        let resource = key.to_string();
        let mut state = self.lock();
        Self::begin(&mut state, operation, &resource)?;

        let Some(current) = state.namespace_labels.get(key).cloned() else {
            return Err(api_error(operation, &resource, 404));
        };

        let expected = patch
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str);
        if expected.is_some() && expected != current.metadata.resource_version.as_deref() {
            return Err(api_error(operation, &resource, 409));
        }

        let mut body = patch.clone();
        if let Some(fields) = body.as_object_mut() {
            if subresource_status {
                fields.retain(|k, _| k == "status");
            } else {
                fields.remove("status");
                if let Some(Value::Object(meta)) = fields.get_mut("metadata") {
                    meta.remove("resourceVersion");
                }
            }
        }

        let mut doc = serde_json::to_value(&current).expect("stored NamespaceLabel serializes");
        json_patch::merge(&mut doc, &body);
        let mut updated: NamespaceLabel =
            serde_json::from_value(doc).expect("patched NamespaceLabel deserializes");
        updated.metadata.resource_version = Some(state.bump());

        if updated.metadata.deletion_timestamp.is_some() && updated.finalizers().is_empty() {
            state.namespace_labels.remove(key);
        } else {
            state.namespace_labels.insert(key.clone(), updated.clone());
        }
        Ok(updated)
    }
}

#[async_trait]
impl KubeClient for FakeKubeClient {
    async fn get_namespace_label(&self, key: &ObjectKey) -> Result<Option<NamespaceLabel>> {
        let mut state = self.lock();
        Self::begin(&mut state, Operation::GetNamespaceLabel, &key.to_string())?;
        Ok(state.namespace_labels.get(key).cloned())
    }

    async fn get_namespace(&self, name: &str) -> Result<Option<Namespace>> {
        let mut state = self.lock();
        Self::begin(&mut state, Operation::GetNamespace, name)?;
        Ok(state.namespaces.get(name).cloned())
    }

    async fn replace_namespace(&self, namespace: &Namespace) -> Result<Namespace> {
        let name = namespace.name_any();
        let mut state = self.lock();
        Self::begin(&mut state, Operation::ReplaceNamespace, &name)?;

        let stored_version = match state.namespaces.get(&name) {
            Some(stored) => stored.metadata.resource_version.clone(),
            None => return Err(api_error(Operation::ReplaceNamespace, &name, 404)),
        };
        if namespace.metadata.resource_version != stored_version {
            return Err(api_error(Operation::ReplaceNamespace, &name, 409));
        }

        let mut updated = namespace.clone();
        updated.metadata.resource_version = Some(state.bump());
        state.namespaces.insert(name, updated.clone());
        Ok(updated)
    }

    async fn patch_namespace_label_finalizers(
        &self,
        key: &ObjectKey,
        patch: &Value,
    ) -> Result<NamespaceLabel> {
        self.patch_stored(Operation::PatchFinalizers, key, patch, false)
    }

    async fn patch_namespace_label_status(
        &self,
        key: &ObjectKey,
        patch: &Value,
    ) -> Result<NamespaceLabel> {
        self.patch_stored(Operation::PatchStatus, key, patch, true)
    }
}
