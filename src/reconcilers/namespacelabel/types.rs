// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Types used in namespace label reconciliation.

use crate::crd::NamespaceLabel;
use crate::errors::Error;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Identity of one `NamespaceLabel` object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    /// Name of the `NamespaceLabel`
    pub name: String,
    /// Namespace the `NamespaceLabel` lives in (and governs)
    pub namespace: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Build the key for an object delivered by the watch stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNamespace`] if the object carries no namespace.
    pub fn from_resource(nslabel: &NamespaceLabel) -> Result<Self, Error> {
        let name = nslabel.name_any();
        let namespace = nslabel
            .namespace()
            .ok_or_else(|| Error::MissingNamespace { name: name.clone() })?;
        Ok(Self { name, namespace })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Result of one reconciliation pass.
///
/// The default value means "nothing further to do, wait for the next watch
/// event".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Ask the delivery mechanism to run another pass soon
    pub requeue: bool,
    /// Run another pass after this delay
    pub requeue_after: Option<Duration>,
}

impl ReconcileOutcome {
    /// Wait for the next watch event.
    #[must_use]
    pub fn done() -> Self {
        Self::default()
    }

    /// Run another pass after `delay`.
    #[must_use]
    pub fn requeue_after(delay: Duration) -> Self {
        Self {
            requeue: true,
            requeue_after: Some(delay),
        }
    }
}

/// Desired labels split into those the controller applies and those it won't.
///
/// The two maps are disjoint and together cover every key of `spec.labels`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPartition {
    /// Labels the controller claims and applies to the Namespace
    pub sync: BTreeMap<String, String>,
    /// Labels deliberately left off the Namespace
    pub unsync: BTreeMap<String, String>,
}
