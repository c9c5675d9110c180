//! Transformer contracts
//!
//! A transformer applies one deployment concern in two passes: a forward pass
//! that edits the normalized configuration before generation, and a reverse
//! pass that adjusts the generated manifests and the status snapshot after
//! generation. The pipeline runs forward calls in registration order and
//! reverse calls in exactly the opposite order, so a transformer can rely on
//! everything registered before it having already run forward and not yet run
//! in reverse.
//!
//! Instances are stateful and single-use: a generator binds each instance to
//! one declaration and one target environment, the pipeline calls each method
//! at most once, and the instance is dropped when the attempt ends.

use crate::environment::TargetEnvironment;
use async_trait::async_trait;
use slipway_config::{ConfigTree, PropertyError};
use slipway_types::{ArtifactBundle, ServiceDeclaration, ServiceStatus};
use std::sync::Arc;
use thiserror::Error;

/// Transformer errors
#[derive(Debug, Error)]
pub enum TransformerError {
    #[error("Invalid option {option:?}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("Configuration property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Factory binding transformer instances to one deployment attempt
#[async_trait]
pub trait TransformerGenerator: Send + Sync {
    /// Stable name identifying the transformer in errors and logs
    fn name(&self) -> &'static str;

    /// Construct a transformer bound to this declaration and environment
    ///
    /// Generators may validate declaration options here and fail fast,
    /// before any configuration is touched.
    async fn new_transformer(
        &self,
        declaration: &ServiceDeclaration,
        environment: Arc<dyn TargetEnvironment>,
    ) -> Result<Box<dyn Transformer>, TransformerError>;
}

/// One deployment concern, applied forward to configuration and in reverse
/// to generated manifests
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Edit the configuration before manifest generation
    async fn transform_config(&mut self, config: &mut ConfigTree) -> Result<(), TransformerError>;

    /// Adjust generated manifests and the status snapshot after generation
    async fn transform_manifests(
        &mut self,
        environment: &dyn TargetEnvironment,
        config: &ConfigTree,
        artifacts: &mut ArtifactBundle,
        status: &mut ServiceStatus,
    ) -> Result<(), TransformerError>;
}
