//! Manifest persistence seam

use async_trait::async_trait;
use dashmap::DashMap;
use slipway_types::{ArtifactBundle, ArtifactRecord, Manifest, ServiceStatus};
use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Durable storage for generated manifests
///
/// `persist` writes the whole bundle and records the persisted inventory
/// into the status snapshot it is handed. Persistence happening before the
/// status commit means a failed attempt can leave manifests behind; the
/// store is expected to make re-persisting the same bundle idempotent.
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Durably write a bundle and record it in the status snapshot
    async fn persist(
        &self,
        bundle: &ArtifactBundle,
        status: &mut ServiceStatus,
    ) -> Result<(), PersistError>;
}

/// In-memory implementation for development
///
/// Upserts manifests by name, so re-persisting a bundle overwrites rather
/// than duplicates.
pub struct InMemoryManifestStore {
    manifests: DashMap<String, Manifest>,
}

impl InMemoryManifestStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            manifests: DashMap::new(),
        }
    }

    /// Look up a persisted manifest by name
    pub fn manifest(&self, name: &str) -> Option<Manifest> {
        self.manifests.get(name).map(|m| m.clone())
    }

    /// Number of persisted manifests
    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    /// True if nothing has been persisted
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

impl Default for InMemoryManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManifestStore for InMemoryManifestStore {
    async fn persist(
        &self,
        bundle: &ArtifactBundle,
        status: &mut ServiceStatus,
    ) -> Result<(), PersistError> {
        status.artifacts.clear();
        for manifest in bundle.iter() {
            self.manifests
                .insert(manifest.name.clone(), manifest.clone());
            status.record_artifact(ArtifactRecord {
                name: manifest.name.clone(),
                kind: manifest.kind.clone(),
                namespace: manifest.namespace.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use slipway_types::ManifestKind;

    #[tokio::test]
    async fn test_persist_records_inventory() {
        let store = InMemoryManifestStore::new();
        let mut status = ServiceStatus::default();

        let mut bundle = ArtifactBundle::new();
        bundle.push(
            Manifest::new("api", ManifestKind::Deployment, json!({})).with_namespace("staging"),
        );
        bundle.push(Manifest::new("api-svc", ManifestKind::Service, json!({})));

        store.persist(&bundle, &mut status).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(status.artifacts.len(), 2);
        assert_eq!(status.artifacts[0].name, "api");
        assert_eq!(status.artifacts[0].namespace.as_deref(), Some("staging"));
    }

    #[tokio::test]
    async fn test_repersist_replaces_inventory() {
        let store = InMemoryManifestStore::new();
        let mut status = ServiceStatus::default();

        let mut first = ArtifactBundle::new();
        first.push(Manifest::new("api", ManifestKind::Deployment, json!({"replicas": 1})));
        store.persist(&first, &mut status).await.unwrap();

        let mut second = ArtifactBundle::new();
        second.push(Manifest::new("api", ManifestKind::Deployment, json!({"replicas": 3})));
        store.persist(&second, &mut status).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(status.artifacts.len(), 1);
        assert_eq!(store.manifest("api").unwrap().body["replicas"], 3);
    }
}
