//! Slipway Deployment Pipeline
//!
//! Orchestrates service deployments from declared configuration: resolve the
//! configuration carrier, run the transformer chain forward over the
//! configuration, generate manifests, run the chain in reverse over the
//! manifests, persist them, and commit the status snapshot.
//!
//! ## Architectural Boundaries
//!
//! - `slipway-types` owns: declarations, statuses, manifests, events
//! - `slipway-config` owns: carrier shapes, resolution, the config tree
//! - `slipway-deploy` owns: pipeline sequencing, transformer contracts,
//!   collaborator seams
//!
//! ## Key Principle
//!
//! The pipeline sequences and commits; it never produces manifests or writes
//! storage itself. Generation, persistence and status commits go through the
//! [`ManifestEngine`], [`ManifestStore`] and [`StatusCommitter`] seams, and
//! every per-concern adjustment lives in a [`Transformer`].
//!
//! ## Usage
//!
//! ```no_run
//! use slipway_config::{ConfigCarrier, ConfigMapCarrier};
//! use slipway_deploy::{
//!     Deployer, InMemoryManifestStore, InMemoryStatusCommitter, StaticEnvironment,
//!     StaticManifestEngine,
//! };
//! use slipway_types::{CarrierRef, ServiceDeclaration};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let deployer = Deployer::new(
//!     Arc::new(StaticManifestEngine::new()),
//!     Arc::new(InMemoryManifestStore::new()),
//!     Arc::new(InMemoryStatusCommitter::new()),
//! );
//!
//! let declaration = ServiceDeclaration::new(
//!     "billing",
//!     CarrierRef::new("ConfigMap", "billing-config"),
//! );
//! let carrier = ConfigCarrier::ConfigMap(
//!     ConfigMapCarrier::new("billing-config").with_entry("config", "version: 1.20.0\n"),
//! );
//!
//! let outcome = deployer
//!     .deploy(
//!         &declaration,
//!         Arc::new(StaticEnvironment::new("staging")),
//!         &carrier,
//!     )
//!     .await?;
//! println!("deployed version {}", outcome.version);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod committer;
pub mod deployer;
pub mod engine;
pub mod environment;
pub mod error;
pub mod store;
pub mod transformer;
pub mod transformers;

// Re-exports
pub use committer::{InMemoryStatusCommitter, StatusCommitError, StatusCommitter};
pub use deployer::{DeployOutcome, Deployer};
pub use engine::{GenerationError, ManifestEngine, StaticManifestEngine};
pub use environment::{StaticEnvironment, TargetEnvironment};
pub use error::{DeployError, Result};
pub use store::{InMemoryManifestStore, ManifestStore, PersistError};
pub use transformer::{Transformer, TransformerError, TransformerGenerator};
pub use transformers::standard_generators;
