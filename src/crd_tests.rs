// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Unit tests for `crd.rs`

#[cfg(test)]
mod tests {
    use crate::crd::*;
    use kube::{CustomResourceExt, Resource};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_crd_identity() {
        let crd = NamespaceLabel::crd();

        assert_eq!(crd.spec.group, "omer.omer.io");
        assert_eq!(crd.spec.names.kind, "NamespaceLabel");
        assert_eq!(crd.spec.names.plural, "namespacelabels");
        assert_eq!(crd.spec.scope, "Namespaced");
        assert_eq!(NamespaceLabel::api_version(&()), "omer.omer.io/v1");
    }

    #[test]
    fn test_status_wire_names() {
        let status = NamespaceLabelStatus {
            sync_labels: BTreeMap::from([("a".into(), "a".into())]),
            un_sync_labels: BTreeMap::from([("b".into(), "b".into())]),
        };

        let value = serde_json::to_value(&status).unwrap();

        assert_eq!(
            value,
            json!({ "syncLabels": { "a": "a" }, "unSyncLabels": { "b": "b" } })
        );
    }

    #[test]
    fn test_missing_maps_deserialize_empty() {
        let nslabel: NamespaceLabel = serde_json::from_value(json!({
            "apiVersion": "omer.omer.io/v1",
            "kind": "NamespaceLabel",
            "metadata": { "name": "default", "namespace": "default" },
            "spec": {},
            "status": {}
        }))
        .unwrap();

        assert!(nslabel.spec.labels.is_empty());
        let status = nslabel.status.as_ref().unwrap();
        assert!(status.sync_labels.is_empty());
        assert!(status.un_sync_labels.is_empty());
    }

    #[test]
    fn test_synced_labels_without_status() {
        let nslabel = NamespaceLabel::new("default", NamespaceLabelSpec::default());

        assert!(nslabel.synced_labels().is_empty());
        assert!(!nslabel.is_being_deleted());
    }

    #[test]
    fn test_is_being_deleted() {
        let nslabel: NamespaceLabel = serde_json::from_value(json!({
            "apiVersion": "omer.omer.io/v1",
            "kind": "NamespaceLabel",
            "metadata": {
                "name": "default",
                "namespace": "default",
                "deletionTimestamp": "2025-01-01T00:00:00Z"
            },
            "spec": { "labels": {} }
        }))
        .unwrap();

        assert!(nslabel.is_being_deleted());
    }
}
