//! Deployment status snapshots
//!
//! The status snapshot is the mutable working record of one deployment
//! attempt. The pipeline deep-copies the declaration's last committed status,
//! lets transformers and the persistence layer write into the copy, and
//! commits it as a whole only after every prior step has succeeded. A failed
//! attempt leaves the previously committed status untouched.

use crate::ManifestKind;
use serde::{Deserialize, Serialize};

/// Last-known deployment status of a declared service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Configuration version set for deployment, stamped at commit time
    pub version: String,

    /// Public API endpoint, recorded by the exposure transformer
    pub api_url: Option<String>,

    /// Public UI endpoint, recorded by the exposure transformer
    pub ui_url: Option<String>,

    /// Inventory of manifests persisted by the last attempt
    pub artifacts: Vec<ArtifactRecord>,

    /// When the last successful attempt was committed
    pub last_deployed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ServiceStatus {
    /// Record a persisted manifest in the inventory
    pub fn record_artifact(&mut self, record: ArtifactRecord) {
        self.artifacts.push(record);
    }

    /// True if no attempt has ever been committed
    pub fn is_fresh(&self) -> bool {
        self.version.is_empty() && self.last_deployed_at.is_none()
    }
}

/// One persisted manifest, as recorded in the status inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Manifest name
    pub name: String,

    /// Manifest kind
    pub kind: ManifestKind,

    /// Namespace the manifest was persisted into
    pub namespace: Option<String>,
}
