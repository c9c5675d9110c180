//! Manifest generation seam
//!
//! Generation turns a transformed configuration into an artifact bundle. How
//! manifests are produced is the engine's business; the pipeline only hands
//! over the configuration and takes back the bundle or the failure.

use async_trait::async_trait;
use slipway_config::ConfigTree;
use slipway_types::{ArtifactBundle, Manifest};
use thiserror::Error;

/// Generation errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Engine rejected the configuration: {0}")]
    Rejected(String),

    #[error("Engine unavailable: {0}")]
    Unavailable(String),
}

/// Engine producing deployable manifests from a normalized configuration
#[async_trait]
pub trait ManifestEngine: Send + Sync {
    /// Generate the artifact bundle for a configuration
    async fn generate(&self, config: &ConfigTree) -> Result<ArtifactBundle, GenerationError>;
}

/// Engine returning a fixed bundle, for development and tests
pub struct StaticManifestEngine {
    bundle: ArtifactBundle,
}

impl StaticManifestEngine {
    /// Create an engine with an empty bundle
    pub fn new() -> Self {
        Self {
            bundle: ArtifactBundle::new(),
        }
    }

    /// Add a manifest to the fixed bundle
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.bundle.push(manifest);
        self
    }
}

impl Default for StaticManifestEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManifestEngine for StaticManifestEngine {
    async fn generate(&self, _config: &ConfigTree) -> Result<ArtifactBundle, GenerationError> {
        Ok(self.bundle.clone())
    }
}
