//! Pipeline error types

use crate::committer::StatusCommitError;
use crate::engine::GenerationError;
use crate::store::PersistError;
use crate::transformer::TransformerError;
use slipway_config::ConfigResolutionError;
use thiserror::Error;

/// Errors terminating a deployment attempt
///
/// Every variant is terminal: the pipeline aborts at the first error, retries
/// nothing, and rolls back nothing. The originating collaborator error is
/// preserved as the source so callers can inspect it.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Configuration could not be resolved: {0}")]
    ConfigResolution(#[from] ConfigResolutionError),

    #[error("Transformer {name} could not be constructed: {source}")]
    TransformerConstruction {
        name: &'static str,
        #[source]
        source: TransformerError,
    },

    #[error("Transformer {name} failed in the configuration pass: {source}")]
    ConfigTransform {
        name: &'static str,
        #[source]
        source: TransformerError,
    },

    #[error("Manifest generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Transformer {name} failed in the manifest pass: {source}")]
    ManifestTransform {
        name: &'static str,
        #[source]
        source: TransformerError,
    },

    #[error("Generated manifests could not be persisted: {0}")]
    Persistence(#[from] PersistError),

    #[error("Deployment status could not be committed: {0}")]
    StatusCommit(#[from] StatusCommitError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, DeployError>;
