//! Status snapshot persistence
//!
//! Committing the status snapshot is the final pipeline step and the only
//! durable marker that an attempt succeeded. Everything before it can leave
//! partial effects behind; a committed status means the whole attempt went
//! through.

use async_trait::async_trait;
use dashmap::DashMap;
use slipway_types::{ServiceDeclaration, ServiceName, ServiceStatus};
use thiserror::Error;

/// Status commit errors
#[derive(Debug, Error)]
pub enum StatusCommitError {
    #[error("Conflicting status write: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Durable storage for committed status snapshots
#[async_trait]
pub trait StatusCommitter: Send + Sync {
    /// Commit the status snapshot back to the declaration's owner
    async fn commit(
        &self,
        declaration: &ServiceDeclaration,
        status: ServiceStatus,
    ) -> Result<(), StatusCommitError>;
}

/// In-memory implementation for development
pub struct InMemoryStatusCommitter {
    statuses: DashMap<ServiceName, ServiceStatus>,
}

impl InMemoryStatusCommitter {
    /// Create a new in-memory committer
    pub fn new() -> Self {
        Self {
            statuses: DashMap::new(),
        }
    }

    /// Last committed status for a service
    pub fn committed(&self, service: &ServiceName) -> Option<ServiceStatus> {
        self.statuses.get(service).map(|s| s.clone())
    }
}

impl Default for InMemoryStatusCommitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusCommitter for InMemoryStatusCommitter {
    async fn commit(
        &self,
        declaration: &ServiceDeclaration,
        status: ServiceStatus,
    ) -> Result<(), StatusCommitError> {
        self.statuses.insert(declaration.name.clone(), status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipway_types::CarrierRef;

    #[tokio::test]
    async fn test_commit_replaces_previous_status() {
        let committer = InMemoryStatusCommitter::new();
        let declaration =
            ServiceDeclaration::new("billing", CarrierRef::new("ConfigMap", "billing-config"));

        let first = ServiceStatus {
            version: "1.0.0".into(),
            ..ServiceStatus::default()
        };
        committer.commit(&declaration, first).await.unwrap();

        let second = ServiceStatus {
            version: "1.1.0".into(),
            ..ServiceStatus::default()
        };
        committer.commit(&declaration, second).await.unwrap();

        let committed = committer.committed(&declaration.name).unwrap();
        assert_eq!(committed.version, "1.1.0");
    }

    #[tokio::test]
    async fn test_committed_is_none_before_any_commit() {
        let committer = InMemoryStatusCommitter::new();
        assert!(committer.committed(&ServiceName::from("billing")).is_none());
    }
}
