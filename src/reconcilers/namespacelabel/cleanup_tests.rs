// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Unit tests for `cleanup.rs`

#[cfg(test)]
mod tests {
    use super::super::cleanup_namespacelabel;
    use crate::client::fake::{namespace_label, FakeKubeClient};
    use crate::constants::FINALIZER_NAMESPACE_LABEL;
    use crate::crd::NamespaceLabelStatus;
    use crate::errors::Operation;
    use crate::labels::K8S_METADATA_NAME;
    use crate::reconcilers::finalizers::has_finalizer;
    use crate::reconcilers::namespacelabel::types::{ObjectKey, ReconcileOutcome};
    use std::collections::BTreeMap;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    /// Store a terminating `NamespaceLabel` in `default` that owns `synced`.
    fn terminating(client: &FakeKubeClient, synced: &[(&str, &str)]) -> ObjectKey {
        let mut nslabel = namespace_label("default", synced);
        nslabel.metadata.finalizers = Some(vec![FINALIZER_NAMESPACE_LABEL.to_string()]);
        nslabel.status = Some(NamespaceLabelStatus {
            sync_labels: labels(synced),
            un_sync_labels: BTreeMap::new(),
        });
        let key = client.put_namespace_label(nslabel);
        client.request_deletion(&key);
        key
    }

    #[tokio::test]
    async fn test_cleanup_removes_synced_labels_and_finalizer() {
        // Arrange
        let client = FakeKubeClient::new();
        client.put_namespace(
            "default",
            &[(K8S_METADATA_NAME, "default"), ("a", "a"), ("b", "b")],
        );
        let key = terminating(&client, &[("a", "a"), ("b", "b")]);
        let nslabel = client.namespace_label(&key).unwrap();

        // Act
        let outcome = cleanup_namespacelabel(&client, &key, &nslabel)
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome, ReconcileOutcome::done());
        assert_eq!(
            client.namespace_labels("default"),
            labels(&[(K8S_METADATA_NAME, "default")])
        );
        assert!(
            client.namespace_label(&key).is_none(),
            "object should be purged after finalizer removal"
        );
    }

    #[tokio::test]
    async fn test_cleanup_removes_edited_synced_label() {
        // Arrange: someone changed the value of an owned label
        let client = FakeKubeClient::new();
        client.put_namespace("default", &[("a", "edited"), ("keep", "me")]);
        let key = terminating(&client, &[("a", "a")]);
        let nslabel = client.namespace_label(&key).unwrap();

        // Act
        cleanup_namespacelabel(&client, &key, &nslabel)
            .await
            .unwrap();

        // Assert
        assert_eq!(client.namespace_labels("default"), labels(&[("keep", "me")]));
    }

    #[tokio::test]
    async fn test_cleanup_with_missing_namespace_still_removes_finalizer() {
        let client = FakeKubeClient::new();
        let key = terminating(&client, &[("a", "a")]);
        let nslabel = client.namespace_label(&key).unwrap();

        cleanup_namespacelabel(&client, &key, &nslabel)
            .await
            .unwrap();

        assert_eq!(client.calls(Operation::ReplaceNamespace), 0);
        assert!(client.namespace_label(&key).is_none());
    }

    #[tokio::test]
    async fn test_cleanup_skips_namespace_write_when_nothing_to_remove() {
        let client = FakeKubeClient::new();
        client.put_namespace("default", &[(K8S_METADATA_NAME, "default")]);
        let key = terminating(&client, &[("a", "a")]);
        let nslabel = client.namespace_label(&key).unwrap();

        cleanup_namespacelabel(&client, &key, &nslabel)
            .await
            .unwrap();

        assert_eq!(client.calls(Operation::ReplaceNamespace), 0);
        assert_eq!(client.calls(Operation::PatchFinalizers), 1);
    }

    #[tokio::test]
    async fn test_cleanup_namespace_failure_keeps_finalizer() {
        // Arrange
        let client = FakeKubeClient::new();
        client.put_namespace("default", &[("a", "a")]);
        let key = terminating(&client, &[("a", "a")]);
        let nslabel = client.namespace_label(&key).unwrap();
        client.fail_next(Operation::ReplaceNamespace, 500);

        // Act
        let result = cleanup_namespacelabel(&client, &key, &nslabel).await;

        // Assert
        assert!(result.is_err());
        assert_eq!(client.namespace_labels("default"), labels(&[("a", "a")]));
        let stored = client.namespace_label(&key).unwrap();
        assert!(has_finalizer(&stored, FINALIZER_NAMESPACE_LABEL));
        assert_eq!(client.calls(Operation::PatchFinalizers), 0);
    }

    #[tokio::test]
    async fn test_cleanup_conflict_on_namespace_is_retryable() {
        // Arrange: namespace changes between fetch and write
        let client = FakeKubeClient::new();
        client.put_namespace("default", &[("a", "a")]);
        let key = terminating(&client, &[("a", "a")]);
        let nslabel = client.namespace_label(&key).unwrap();
        client.fail_next(Operation::ReplaceNamespace, 409);

        // Act
        let err = cleanup_namespacelabel(&client, &key, &nslabel)
            .await
            .unwrap_err();

        // Assert
        assert!(err.is_conflict());

        // Retry from a fresh fetch converges
        let fresh = client.namespace_label(&key).unwrap();
        cleanup_namespacelabel(&client, &key, &fresh).await.unwrap();
        assert!(client.namespace_labels("default").is_empty());
        assert!(client.namespace_label(&key).is_none());
    }
}
