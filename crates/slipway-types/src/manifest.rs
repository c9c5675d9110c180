//! Generated deployment manifests
//!
//! The generation engine turns a normalized configuration into an
//! [`ArtifactBundle`]: a named collection of deployable manifests. The bundle
//! is mutable on purpose, since the reverse transformer pass adjusts
//! manifests in place before anything is persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a generated manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestKind {
    /// Workload manifest
    Deployment,
    /// Service/endpoint manifest
    Service,
    /// Configuration payload manifest
    ConfigMap,
    /// Sensitive payload manifest
    Secret,
    /// Anything the engine emits that has no dedicated variant
    Other(String),
}

impl ManifestKind {
    pub fn as_str(&self) -> &str {
        match self {
            ManifestKind::Deployment => "Deployment",
            ManifestKind::Service => "Service",
            ManifestKind::ConfigMap => "ConfigMap",
            ManifestKind::Secret => "Secret",
            ManifestKind::Other(kind) => kind,
        }
    }
}

/// One deployable manifest produced by generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest name, unique within a bundle
    pub name: String,

    /// Manifest kind
    pub kind: ManifestKind,

    /// Target namespace, pinned by the target transformer
    pub namespace: Option<String>,

    /// Annotations stamped by transformers
    pub annotations: BTreeMap<String, String>,

    /// The manifest document itself
    pub body: serde_json::Value,
}

impl Manifest {
    /// Create a manifest with no namespace or annotations
    pub fn new(name: impl Into<String>, kind: ManifestKind, body: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            kind,
            namespace: None,
            annotations: BTreeMap::new(),
            body,
        }
    }

    /// Set the target namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Set a top-level field on the manifest body
    ///
    /// Turns a non-object body into an object first.
    pub fn set_body_field(&mut self, key: impl Into<String>, value: serde_json::Value) {
        if !self.body.is_object() {
            self.body = serde_json::Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.body.as_object_mut() {
            map.insert(key.into(), value);
        }
    }
}

/// The generated set of deployable manifests for one service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    manifests: Vec<Manifest>,
}

impl ArtifactBundle {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a manifest to the bundle
    pub fn push(&mut self, manifest: Manifest) {
        self.manifests.push(manifest);
    }

    /// Iterate manifests in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Manifest> {
        self.manifests.iter()
    }

    /// Iterate manifests mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Manifest> {
        self.manifests.iter_mut()
    }

    /// Look up a manifest by name
    pub fn get(&self, name: &str) -> Option<&Manifest> {
        self.manifests.iter().find(|m| m.name == name)
    }

    /// Look up a manifest by name, mutably
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Manifest> {
        self.manifests.iter_mut().find(|m| m.name == name)
    }

    /// Manifest names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.manifests.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

impl FromIterator<Manifest> for ArtifactBundle {
    fn from_iter<I: IntoIterator<Item = Manifest>>(iter: I) -> Self {
        Self {
            manifests: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ArtifactBundle {
    type Item = Manifest;
    type IntoIter = std::vec::IntoIter<Manifest>;

    fn into_iter(self) -> Self::IntoIter {
        self.manifests.into_iter()
    }
}
