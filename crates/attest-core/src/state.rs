//! Observed declared-state model.
//!
//! A snapshot is produced by the external configuration engine after each
//! apply and is read-only to the verification core. Each step supersedes the
//! previous snapshot; nothing here is mutated in place across steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifyError};

/// A single resource as observed after an apply.
///
/// An empty `remote_id` means the resource was declared but never
/// provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Logical name, unique within a run (e.g. `logzio_endpoint.slack`).
    pub logical_name: String,

    /// Remote identifier, decimal-encoded i64. Empty until provisioned.
    #[serde(default)]
    pub remote_id: String,

    /// Observed resource attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Resource {
    /// Creates a resource with the given logical name and no remote state.
    #[must_use]
    pub fn new(logical_name: impl Into<String>) -> Self {
        Self {
            logical_name: logical_name.into(),
            remote_id: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the remote identifier.
    #[must_use]
    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = remote_id.into();
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns true once the resource has a remote identifier.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        !self.remote_id.is_empty()
    }

    /// Returns an attribute value, if present.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Post-apply observed state: logical resource name to resource record.
///
/// Backed by a `BTreeMap` so iteration order is deterministic; destroy
/// verification reports the first offender in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredStateSnapshot {
    resources: BTreeMap<String, Resource>,
}

impl DeclaredStateSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a resource, keyed by its logical name.
    pub fn insert(&mut self, resource: Resource) {
        self.resources
            .insert(resource.logical_name.clone(), resource);
    }

    /// Inserts a resource, builder style.
    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.insert(resource);
        self
    }

    /// Returns the resource with the given logical name, if tracked.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Returns the resource with the given logical name.
    ///
    /// # Errors
    /// Returns [`VerifyError::NotFound`] if the declaration never
    /// materialized in the snapshot.
    pub fn resource(&self, name: &str) -> Result<&Resource> {
        self.resources
            .get(name)
            .ok_or_else(|| VerifyError::not_found(name))
    }

    /// Iterates resources in deterministic (lexicographic) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tracked resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if no resources are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Derived output values computed by the configuration engine alongside a
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSet {
    values: BTreeMap<String, String>,
}

impl OutputSet {
    /// Creates an empty output set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an output value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Records an output value, builder style.
    #[must_use]
    pub fn with_output(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns an output value, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns an output value.
    ///
    /// # Errors
    /// Returns [`VerifyError::NotFound`] if no output with this name exists.
    pub fn value(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| VerifyError::not_found(format!("output {name}")))
    }

    /// Number of outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no outputs were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_provisioning_state() {
        let declared = Resource::new("logzio_endpoint.slack");
        assert!(!declared.is_provisioned());

        let provisioned = declared.with_remote_id("42");
        assert!(provisioned.is_provisioned());
        assert_eq!(provisioned.remote_id, "42");
    }

    #[test]
    fn test_resource_attributes() {
        let resource =
            Resource::new("logzio_endpoint.slack").with_attribute("title", "my_slack_title");
        assert_eq!(resource.attribute("title"), Some("my_slack_title"));
        assert_eq!(resource.attribute("missing"), None);
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = DeclaredStateSnapshot::new()
            .with_resource(Resource::new("logzio_endpoint.slack").with_remote_id("1"));

        assert!(snapshot.resource("logzio_endpoint.slack").is_ok());
        let err = snapshot.resource("logzio_endpoint.custom").unwrap_err();
        assert!(matches!(err, VerifyError::NotFound(_)));
    }

    #[test]
    fn test_snapshot_iteration_is_sorted() {
        let snapshot = DeclaredStateSnapshot::new()
            .with_resource(Resource::new("b").with_remote_id("2"))
            .with_resource(Resource::new("a").with_remote_id("1"));

        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_snapshot_insert_replaces_by_name() {
        let mut snapshot = DeclaredStateSnapshot::new();
        snapshot.insert(Resource::new("a").with_remote_id("1"));
        snapshot.insert(Resource::new("a").with_remote_id("2"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.resource("a").unwrap().remote_id, "2");
    }

    #[test]
    fn test_output_set_lookup() {
        let outputs = OutputSet::new().with_output("test", "42");
        assert_eq!(outputs.get("test"), Some("42"));

        let err = outputs.value("other").unwrap_err();
        assert!(err.to_string().contains("output other"));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = DeclaredStateSnapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
        assert_eq!(snapshot.iter().count(), 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let snapshot = DeclaredStateSnapshot::new().with_resource(
            Resource::new("logzio_endpoint.slack")
                .with_remote_id("42")
                .with_attribute("title", "my_slack_title"),
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DeclaredStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
