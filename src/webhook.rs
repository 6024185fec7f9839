// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Validating admission webhook for `NamespaceLabel`.
//!
//! A `NamespaceLabel` governs the Namespace it lives in, so its name must equal
//! that Namespace's name. The check runs at admission time, before the object
//! ever reaches the reconciler.

use axum::Json;
use kube::api::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use tracing::{debug, error, info};

/// Denial message returned when the name does not match the namespace
pub const NAME_MISMATCH_MESSAGE: &str =
    "the name of the namespacelabel needs to be like the name of the namespace";

/// Check that a `NamespaceLabel` is named after its namespace.
///
/// # Errors
///
/// Returns the denial message when `name` differs from `namespace`.
pub fn validate_namespace_label(name: &str, namespace: Option<&str>) -> Result<(), String> {
    if namespace == Some(name) {
        Ok(())
    } else {
        Err(NAME_MISMATCH_MESSAGE.to_string())
    }
}

/// Handle a validating admission review for `NamespaceLabel` objects.
pub async fn validate_handler(
    Json(body): Json<AdmissionReview<DynamicObject>>,
) -> Json<AdmissionReview<DynamicObject>> {
    let req: AdmissionRequest<DynamicObject> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    Json(review(&req).into_review())
}

/// Decide a single admission request.
pub(crate) fn review(request: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
    let response = AdmissionResponse::from(request);

    if !matches!(request.operation, Operation::Create | Operation::Update) {
        return response;
    }

    // Prefer the object's own metadata; the request fields cover objects
    // submitted without an explicit namespace.
    let meta = request.object.as_ref().map(|o| &o.metadata);
    let name = meta
        .and_then(|m| m.name.as_deref())
        .unwrap_or(request.name.as_str());
    let namespace = meta
        .and_then(|m| m.namespace.as_deref())
        .or(request.namespace.as_deref());

    match validate_namespace_label(name, namespace) {
        Ok(()) => {
            debug!(uid = %request.uid, name = %name, "NamespaceLabel admitted");
            response
        }
        Err(reason) => {
            info!(
                uid = %request.uid,
                name = %name,
                namespace = ?namespace,
                "Denying NamespaceLabel: name does not match namespace"
            );
            response.deny(reason)
        }
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod webhook_tests;
