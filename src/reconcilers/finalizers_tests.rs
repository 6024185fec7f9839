// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Unit tests for `finalizers.rs`

#[cfg(test)]
mod tests {
    use crate::client::fake::{namespace_label, FakeKubeClient};
    use crate::client::MockKubeClient;
    use crate::errors::Operation;
    use crate::reconcilers::finalizers::{
        ensure_finalizer, finalizers_patch, has_finalizer, remove_finalizer,
    };
    use crate::reconcilers::namespacelabel::types::ObjectKey;
    use kube::ResourceExt;
    use mockall::predicate::eq;
    use serde_json::json;

    const TEST_FINALIZER: &str = "test.omer.io/finalizer";
    const OTHER_FINALIZER: &str = "other.example.com/finalizer";

    #[test]
    fn test_has_finalizer() {
        let mut nslabel = namespace_label("team-a", &[]);
        assert!(!has_finalizer(&nslabel, TEST_FINALIZER));

        nslabel.metadata.finalizers = Some(vec![TEST_FINALIZER.to_string()]);
        assert!(has_finalizer(&nslabel, TEST_FINALIZER));
        assert!(!has_finalizer(&nslabel, OTHER_FINALIZER));
    }

    #[test]
    fn test_finalizers_patch_carries_resource_version() {
        let mut nslabel = namespace_label("team-a", &[]);
        nslabel.metadata.resource_version = Some("42".to_string());

        let patch = finalizers_patch(&nslabel, &[TEST_FINALIZER.to_string()]);

        assert_eq!(
            patch,
            json!({ "metadata": { "finalizers": [TEST_FINALIZER], "resourceVersion": "42" } })
        );
    }

    #[test]
    fn test_finalizers_patch_without_resource_version() {
        let nslabel = namespace_label("team-a", &[]);

        let patch = finalizers_patch(&nslabel, &[]);

        assert_eq!(patch, json!({ "metadata": { "finalizers": [] } }));
    }

    #[tokio::test]
    async fn test_ensure_finalizer_adds_when_missing() {
        // Arrange
        let client = FakeKubeClient::new();
        let key = client.put_namespace_label(namespace_label("team-a", &[]));
        let nslabel = client.namespace_label(&key).unwrap();

        // Act
        let updated = ensure_finalizer(&client, &key, nslabel, TEST_FINALIZER)
            .await
            .unwrap();

        // Assert
        assert!(has_finalizer(&updated, TEST_FINALIZER));
        assert!(has_finalizer(
            &client.namespace_label(&key).unwrap(),
            TEST_FINALIZER
        ));
        assert_eq!(client.calls(Operation::PatchFinalizers), 1);
    }

    #[tokio::test]
    async fn test_ensure_finalizer_is_idempotent() {
        // Arrange: finalizer already present
        let client = FakeKubeClient::new();
        let mut nslabel = namespace_label("team-a", &[]);
        nslabel.metadata.finalizers = Some(vec![TEST_FINALIZER.to_string()]);
        let key = client.put_namespace_label(nslabel);
        let stored = client.namespace_label(&key).unwrap();

        // Act
        let updated = ensure_finalizer(&client, &key, stored.clone(), TEST_FINALIZER)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated, stored);
        assert_eq!(
            client.calls(Operation::PatchFinalizers),
            0,
            "no write expected when finalizer is present"
        );
    }

    #[tokio::test]
    async fn test_ensure_finalizer_keeps_other_finalizers() {
        let client = FakeKubeClient::new();
        let mut nslabel = namespace_label("team-a", &[]);
        nslabel.metadata.finalizers = Some(vec![OTHER_FINALIZER.to_string()]);
        let key = client.put_namespace_label(nslabel);
        let stored = client.namespace_label(&key).unwrap();

        let updated = ensure_finalizer(&client, &key, stored, TEST_FINALIZER)
            .await
            .unwrap();

        assert_eq!(
            updated.finalizers(),
            &[OTHER_FINALIZER.to_string(), TEST_FINALIZER.to_string()]
        );
    }

    #[tokio::test]
    async fn test_ensure_finalizer_stale_object_conflicts() {
        // Arrange: object changed after it was fetched
        let client = FakeKubeClient::new();
        let key = client.put_namespace_label(namespace_label("team-a", &[]));
        let stale = client.namespace_label(&key).unwrap();
        client.set_desired(&key, &[("a", "a")]);

        // Act
        let result = ensure_finalizer(&client, &key, stale, TEST_FINALIZER).await;

        // Assert
        let err = result.unwrap_err();
        assert!(err.is_conflict(), "stale write must conflict, got {err}");
    }

    #[tokio::test]
    async fn test_remove_finalizer_purges_deleted_object() {
        // Arrange: object with our finalizer, deletion requested
        let client = FakeKubeClient::new();
        let mut nslabel = namespace_label("team-a", &[]);
        nslabel.metadata.finalizers = Some(vec![TEST_FINALIZER.to_string()]);
        let key = client.put_namespace_label(nslabel);
        client.request_deletion(&key);
        let terminating = client.namespace_label(&key).unwrap();

        // Act
        remove_finalizer(&client, &key, &terminating, TEST_FINALIZER)
            .await
            .unwrap();

        // Assert
        assert!(
            client.namespace_label(&key).is_none(),
            "object should be gone once its last finalizer is removed"
        );
    }

    #[tokio::test]
    async fn test_remove_finalizer_when_absent_is_noop() {
        let client = FakeKubeClient::new();
        let key = client.put_namespace_label(namespace_label("team-a", &[]));
        let stored = client.namespace_label(&key).unwrap();

        remove_finalizer(&client, &key, &stored, TEST_FINALIZER)
            .await
            .unwrap();

        assert_eq!(client.calls(Operation::PatchFinalizers), 0);
    }

    #[tokio::test]
    async fn test_remove_finalizer_propagates_failure() {
        let client = FakeKubeClient::new();
        let mut nslabel = namespace_label("team-a", &[]);
        nslabel.metadata.finalizers = Some(vec![TEST_FINALIZER.to_string()]);
        let key = client.put_namespace_label(nslabel);
        let stored = client.namespace_label(&key).unwrap();
        client.fail_next(Operation::PatchFinalizers, 500);

        let result = remove_finalizer(&client, &key, &stored, TEST_FINALIZER).await;

        assert!(result.is_err());
        assert!(has_finalizer(
            &client.namespace_label(&key).unwrap(),
            TEST_FINALIZER
        ));
    }

    #[tokio::test]
    async fn test_remove_finalizer_sends_guarded_patch_for_remaining_list() {
        // Arrange: someone else's finalizer must survive, resourceVersion guards the write
        let key = ObjectKey::new("team-a", "team-a");
        let mut nslabel = namespace_label("team-a", &[]);
        nslabel.metadata.resource_version = Some("9".to_string());
        nslabel.metadata.finalizers = Some(vec![
            OTHER_FINALIZER.to_string(),
            TEST_FINALIZER.to_string(),
        ]);
        let returned = nslabel.clone();

        let mut mock = MockKubeClient::new();
        mock.expect_patch_namespace_label_finalizers()
            .with(
                eq(key.clone()),
                eq(json!({
                    "metadata": { "finalizers": [OTHER_FINALIZER], "resourceVersion": "9" }
                })),
            )
            .times(1)
            .return_once(move |_, _| Ok(returned));

        // Act
        let result = remove_finalizer(&mock, &key, &nslabel, TEST_FINALIZER).await;

        // Assert
        assert!(result.is_ok(), "removal should succeed: {result:?}");
    }

    #[tokio::test]
    async fn test_ensure_finalizer_present_makes_no_api_call() {
        let key = ObjectKey::new("team-a", "team-a");
        let mut nslabel = namespace_label("team-a", &[]);
        nslabel.metadata.finalizers = Some(vec![TEST_FINALIZER.to_string()]);

        let mut mock = MockKubeClient::new();
        mock.expect_patch_namespace_label_finalizers().never();

        let updated = ensure_finalizer(&mock, &key, nslabel.clone(), TEST_FINALIZER)
            .await
            .unwrap();

        assert_eq!(updated, nslabel);
    }
}
