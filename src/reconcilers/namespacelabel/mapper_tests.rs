// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

//! Unit tests for `mapper.rs`

#[cfg(test)]
mod tests {
    use super::super::{requests_for_namespace, NamespaceLabelLister};
    use crate::client::fake::namespace_label;
    use crate::crd::NamespaceLabel;
    use crate::errors::{Error, Result};
    use k8s_openapi::api::core::v1::Namespace;
    use kube::api::ObjectMeta;
    use kube::runtime::reflector::{self, ObjectRef};
    use kube::runtime::watcher::Event;

    fn namespace(name: &str) -> Namespace {
        Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..ObjectMeta::default()
            },
            ..Namespace::default()
        }
    }

    fn named(name: &str, ns: &str) -> NamespaceLabel {
        let mut nslabel = namespace_label(ns, &[]);
        nslabel.metadata.name = Some(name.to_string());
        nslabel
    }

    struct FailingLister;

    impl NamespaceLabelLister for FailingLister {
        fn list_in_namespace(&self, namespace: &str) -> Result<Vec<ObjectRef<NamespaceLabel>>> {
            Err(Error::Listing {
                namespace: namespace.to_string(),
                reason: "cache unavailable".to_string(),
            })
        }
    }

    #[test]
    fn test_maps_namespace_to_its_namespacelabel() {
        // Arrange
        let (reader, mut writer) = reflector::store::<NamespaceLabel>();
        writer.apply_watcher_event(&Event::Apply(namespace_label("team-a", &[])));
        writer.apply_watcher_event(&Event::Apply(namespace_label("team-b", &[])));

        // Act
        let requests = requests_for_namespace(&reader, &namespace("team-a"));

        // Assert
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "team-a");
        assert_eq!(requests[0].namespace.as_deref(), Some("team-a"));
    }

    #[test]
    fn test_maps_every_match_in_namespace() {
        // Arrange: a second, misnamed object slipped in
        let (reader, mut writer) = reflector::store::<NamespaceLabel>();
        writer.apply_watcher_event(&Event::Apply(named("team-a", "team-a")));
        writer.apply_watcher_event(&Event::Apply(named("extra", "team-a")));

        // Act
        let mut names: Vec<String> = requests_for_namespace(&reader, &namespace("team-a"))
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();

        // Assert
        assert_eq!(names, vec!["extra".to_string(), "team-a".to_string()]);
    }

    #[test]
    fn test_no_namespacelabel_yields_no_requests() {
        let (reader, mut writer) = reflector::store::<NamespaceLabel>();
        writer.apply_watcher_event(&Event::Apply(namespace_label("team-b", &[])));

        assert!(requests_for_namespace(&reader, &namespace("team-a")).is_empty());
    }

    #[test]
    fn test_listing_failure_yields_no_requests() {
        let requests = requests_for_namespace(&FailingLister, &namespace("team-a"));
        assert!(requests.is_empty());
    }
}
