// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Error types for namespace label reconciliation.
//!
//! Every variant carries the identity of the object involved and the operation
//! that failed, so the controller wrapper can log and count failures without
//! the reconciler having to log on its own.
//!
//! All errors are retryable from the controller's point of view: the next pass
//! starts again from a fresh fetch.

use std::time::Duration;
use thiserror::Error;

/// Kubernetes API operations performed by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetNamespaceLabel,
    GetNamespace,
    ReplaceNamespace,
    PatchFinalizers,
    PatchStatus,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetNamespaceLabel => "get namespacelabel",
            Operation::GetNamespace => "get namespace",
            Operation::ReplaceNamespace => "replace namespace",
            Operation::PatchFinalizers => "patch finalizers",
            Operation::PatchStatus => "patch status",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the namespace label reconciler.
#[derive(Error, Debug)]
pub enum Error {
    /// The Kubernetes API rejected or failed a call.
    ///
    /// Includes optimistic-concurrency conflicts (HTTP 409) when the object was
    /// modified between fetch and write.
    #[error("failed to {operation} {resource}: {source}")]
    Api {
        /// The operation that failed
        operation: Operation,
        /// Object identity (`namespace/name` or namespace name)
        resource: String,
        /// Underlying client error
        #[source]
        source: kube::Error,
    },

    /// A call did not complete within the configured deadline.
    #[error("{operation} {resource} timed out after {timeout:?}")]
    Timeout {
        /// The operation that timed out
        operation: Operation,
        /// Object identity
        resource: String,
        /// Deadline that was exceeded
        timeout: Duration,
    },

    /// A namespaced object arrived without a namespace.
    #[error("NamespaceLabel {name} has no namespace")]
    MissingNamespace {
        /// Name of the offending object
        name: String,
    },

    /// Listing `NamespaceLabel` objects in a namespace failed.
    #[error("failed to list NamespaceLabels in namespace {namespace}: {reason}")]
    Listing {
        /// Namespace being listed
        namespace: String,
        /// Why the listing failed
        reason: String,
    },
}

impl Error {
    /// Returns `true` for HTTP 409 Conflict (stale `resourceVersion`).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Api { source: kube::Error::Api(ae), .. } if ae.code == 409)
    }

    /// Returns `true` for HTTP 404 Not Found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { source, .. } if is_not_found(source))
    }

    /// Category label used for the `errors_total` metric.
    #[must_use]
    pub fn metric_label(&self) -> &'static str {
        match self {
            Error::Api { .. } if self.is_conflict() => "conflict",
            Error::Api { .. } => "api_error",
            Error::Timeout { .. } => "timeout",
            Error::MissingNamespace { .. } => "validation_error",
            Error::Listing { .. } => "listing_error",
        }
    }
}

/// Returns `true` if a raw client error is an HTTP 404.
#[must_use]
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404)
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
