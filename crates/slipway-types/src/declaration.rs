//! Service declarations
//!
//! A ServiceDeclaration is the caller-owned input describing the desired
//! deployment. The pipeline only reads it; the one thing derived from it is
//! a fresh status snapshot per deployment attempt.

use crate::{ServiceName, ServiceStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared service deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDeclaration {
    /// Name of the service
    pub name: ServiceName,

    /// Reference to the carrier object holding the raw configuration
    pub config_source: CarrierRef,

    /// Deployment options consumed by transformers
    pub options: DeclarationOptions,

    /// Last committed deployment status
    pub status: ServiceStatus,
}

impl ServiceDeclaration {
    /// Create a new declaration with default options and an empty status
    pub fn new(name: impl Into<ServiceName>, config_source: CarrierRef) -> Self {
        Self {
            name: name.into(),
            config_source,
            options: DeclarationOptions::default(),
            status: ServiceStatus::default(),
        }
    }

    /// Set the deployment options
    pub fn with_options(mut self, options: DeclarationOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the declaration
    pub fn validate(&self) -> Result<(), DeclarationError> {
        if self.name.is_empty() {
            return Err(DeclarationError::EmptyName);
        }

        if self.config_source.name.is_empty() {
            return Err(DeclarationError::InvalidCarrierRef(
                "carrier name must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Reference to the object carrying a service's raw configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierRef {
    /// Kind of the referenced object (e.g. "ConfigMap", "Secret")
    pub kind: String,

    /// Name of the referenced object
    pub name: String,
}

impl CarrierRef {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Per-service deployment options read by the shipped transformers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationOptions {
    /// Override for the deployment target namespace
    pub target_namespace: Option<String>,

    /// External exposure settings, when the service should be reachable
    pub exposure: Option<ExposureConfig>,

    /// Dotted-path configuration overrides applied before generation
    pub overrides: BTreeMap<String, serde_json::Value>,
}

/// How a deployed service is exposed outside the target environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Exposure mechanism
    pub kind: ExposureKind,

    /// Public port
    pub port: u16,

    /// Extra annotations stamped on exposed service manifests
    pub annotations: BTreeMap<String, String>,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            kind: ExposureKind::LoadBalancer,
            port: 80,
            annotations: BTreeMap::new(),
        }
    }
}

/// Exposure mechanisms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureKind {
    /// Provision an external load balancer
    LoadBalancer,
    /// Expose on a node port
    NodePort,
}

impl ExposureKind {
    /// The service type written into exposed manifests
    pub fn service_type(&self) -> &'static str {
        match self {
            ExposureKind::LoadBalancer => "LoadBalancer",
            ExposureKind::NodePort => "NodePort",
        }
    }
}

/// Declaration validation errors
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("Service name cannot be empty")]
    EmptyName,

    #[error("Invalid carrier reference: {0}")]
    InvalidCarrierRef(String),
}
