//! Slipway Types - core types for declarative service deployment
//!
//! Slipway deploys a declared service by resolving its configuration source,
//! running an ordered transformer chain over the configuration, generating
//! deployment manifests, running the same chain in reverse over the
//! manifests, and committing a status snapshot once everything is persisted.
//!
//! ## Architectural Boundaries
//!
//! - **slipway-types** owns: the data model shared across the pipeline
//! - **slipway-config** owns: configuration carriers and the normalized tree
//! - **slipway-deploy** owns: the orchestration pipeline and its collaborators
//!
//! ## Key Concepts
//!
//! - **ServiceDeclaration**: caller-owned description of what to deploy
//! - **ServiceStatus**: the commit-at-the-end record of a deployment attempt
//! - **ArtifactBundle**: generated manifests, mutated by the reverse pass
//! - **Events**: fire-and-forget observability stream for deployments

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod declaration;
pub mod events;
pub mod manifest;
pub mod name;
pub mod status;

// Re-export main types
pub use declaration::{
    CarrierRef, DeclarationError, DeclarationOptions, ExposureConfig, ExposureKind,
    ServiceDeclaration,
};
pub use events::{DeployEvent, DeployEventEnvelope, EventSeverity};
pub use manifest::{ArtifactBundle, Manifest, ManifestKind};
pub use name::ServiceName;
pub use status::{ArtifactRecord, ServiceStatus};
