// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Namespace → `NamespaceLabel` watch mapping.
//!
//! When a Namespace changes, every `NamespaceLabel` living in it must be
//! reconciled again so foreign edits to owned labels are reverted. The
//! controller's watch mapper calls [`requests_for_namespace`] synchronously,
//! so lookups go through the in-memory reflector cache rather than the API.
//!
//! # Example
//!
//! ```rust,no_run
//! use nslabel::crd::NamespaceLabel;
//! use nslabel::reconcilers::namespacelabel::mapper::requests_for_namespace;
//! use k8s_openapi::api::core::v1::Namespace;
//! use kube::runtime::reflector::Store;
//!
//! # fn example(store: Store<NamespaceLabel>, namespace: Namespace) {
//! let requests = requests_for_namespace(&store, &namespace);
//! # }
//! ```

use crate::crd::NamespaceLabel;
use crate::errors::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::runtime::reflector::{ObjectRef, Store};
use kube::ResourceExt;
use tracing::{debug, warn};

/// Source of `NamespaceLabel` identities, scoped by namespace.
pub trait NamespaceLabelLister {
    /// All `NamespaceLabel` objects living in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::Listing`] if the listing cannot be produced.
    fn list_in_namespace(&self, namespace: &str) -> Result<Vec<ObjectRef<NamespaceLabel>>>;
}

impl NamespaceLabelLister for Store<NamespaceLabel> {
    fn list_in_namespace(&self, namespace: &str) -> Result<Vec<ObjectRef<NamespaceLabel>>> {
        Ok(self
            .state()
            .iter()
            .filter(|nslabel| nslabel.namespace().as_deref() == Some(namespace))
            .map(|nslabel| ObjectRef::from_obj(&**nslabel))
            .collect())
    }
}

/// Map a Namespace event to the `NamespaceLabel` objects that must be reconciled.
///
/// Returns every match, not just the one named after the namespace. A listing
/// failure drops the event and yields no requests; the `NamespaceLabel` watch
/// itself still triggers on any later change to the object.
pub fn requests_for_namespace<L>(lister: &L, namespace: &Namespace) -> Vec<ObjectRef<NamespaceLabel>>
where
    L: NamespaceLabelLister + ?Sized,
{
    let name = namespace.name_any();
    match lister.list_in_namespace(&name) {
        Ok(requests) => {
            debug!(
                namespace = %name,
                count = requests.len(),
                "Namespace changed, mapping to NamespaceLabel requests"
            );
            requests
        }
        Err(e) => {
            warn!(namespace = %name, error = %e, "Dropping Namespace event");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod mapper_tests;
