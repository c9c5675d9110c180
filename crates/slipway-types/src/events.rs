//! Deployment events
//!
//! Events are the fire-and-forget observability stream of the pipeline.
//! Emission never blocks and never participates in error propagation: a
//! deployment attempt behaves identically whether or not anyone listens.

use crate::ServiceName;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping a deployment event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployEventEnvelope {
    /// Unique event ID
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// The service the event is about
    pub service: ServiceName,

    /// Event severity
    pub severity: EventSeverity,

    /// The actual event
    pub event: DeployEvent,
}

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Informational event
    Info,
    /// Warning event
    Warning,
    /// Error event
    Error,
}

/// Deployment pipeline events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeployEvent {
    /// A new configuration was resolved for the service
    ConfigDetected {
        /// Version read from the resolved configuration (may be empty)
        version: String,
    },

    /// Manifests were persisted and the version is set for deployment
    VersionDeploymentSet {
        /// Version about to be committed to the service status
        version: String,
    },
}

impl DeployEvent {
    /// Machine-readable reason code
    pub fn reason(&self) -> &'static str {
        match self {
            DeployEvent::ConfigDetected { .. } => "Config",
            DeployEvent::VersionDeploymentSet { .. } => "Config",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            DeployEvent::ConfigDetected { version } => {
                format!("New configuration detected, version: {version}")
            }
            DeployEvent::VersionDeploymentSet { version } => {
                format!("Version {version} deployment set")
            }
        }
    }
}

impl DeployEventEnvelope {
    /// Create a new envelope, inferring severity from the event
    pub fn new(service: ServiceName, event: DeployEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            service,
            severity: Self::infer_severity(&event),
            event,
        }
    }

    /// Reason code of the wrapped event
    pub fn reason(&self) -> &'static str {
        self.event.reason()
    }

    /// Message of the wrapped event
    pub fn message(&self) -> String {
        self.event.message()
    }

    /// Infer severity from event type
    fn infer_severity(event: &DeployEvent) -> EventSeverity {
        match event {
            DeployEvent::ConfigDetected { .. } | DeployEvent::VersionDeploymentSet { .. } => {
                EventSeverity::Info
            }
        }
    }
}
