//! Target environment access
//!
//! The environment is the place manifests are deployed into. The pipeline
//! treats it as an opaque handle: transformers read the default namespace
//! from it at construction time and query it for provisioned endpoints
//! during the manifest pass.

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Handle to the environment a deployment targets
#[async_trait]
pub trait TargetEnvironment: Send + Sync {
    /// Namespace deployments land in unless the declaration overrides it
    fn namespace(&self) -> &str;

    /// Public endpoint of an exposed service manifest, if provisioned
    async fn service_endpoint(&self, manifest_name: &str) -> Option<String>;
}

/// Fixed environment for development and tests
pub struct StaticEnvironment {
    namespace: String,
    endpoints: BTreeMap<String, String>,
}

impl StaticEnvironment {
    /// Create an environment with the given default namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            endpoints: BTreeMap::new(),
        }
    }

    /// Declare a provisioned endpoint for a service manifest
    pub fn with_endpoint(
        mut self,
        manifest_name: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        self.endpoints.insert(manifest_name.into(), endpoint.into());
        self
    }
}

#[async_trait]
impl TargetEnvironment for StaticEnvironment {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn service_endpoint(&self, manifest_name: &str) -> Option<String> {
        self.endpoints.get(manifest_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_environment() {
        let env = StaticEnvironment::new("staging")
            .with_endpoint("billing-api", "https://api.staging.example.com");

        assert_eq!(env.namespace(), "staging");
        assert_eq!(
            env.service_endpoint("billing-api").await.as_deref(),
            Some("https://api.staging.example.com")
        );
        assert_eq!(env.service_endpoint("billing-ui").await, None);
    }
}
