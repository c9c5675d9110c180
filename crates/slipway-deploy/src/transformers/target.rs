//! Deployment target transformer
//!
//! Resolves where the deployment lands: the declaration's namespace override
//! when present, the environment's default namespace otherwise. The forward
//! pass records the target in the configuration so generation can see it; the
//! reverse pass pins every generated manifest to it.

use crate::environment::TargetEnvironment;
use crate::transformer::{Transformer, TransformerError, TransformerGenerator};
use async_trait::async_trait;
use serde_json::json;
use slipway_config::ConfigTree;
use slipway_types::{ArtifactBundle, ServiceDeclaration, ServiceStatus};
use std::sync::Arc;

/// Configuration property holding the resolved target namespace
pub const TARGET_PROP: &str = "deployment.target";

/// Generator for [`TargetTransformer`]
pub struct TargetTransformerGenerator;

#[async_trait]
impl TransformerGenerator for TargetTransformerGenerator {
    fn name(&self) -> &'static str {
        "target"
    }

    async fn new_transformer(
        &self,
        declaration: &ServiceDeclaration,
        environment: Arc<dyn TargetEnvironment>,
    ) -> Result<Box<dyn Transformer>, TransformerError> {
        let target = declaration
            .options
            .target_namespace
            .clone()
            .unwrap_or_else(|| environment.namespace().to_string());
        Ok(Box::new(TargetTransformer { target }))
    }
}

/// Pins a deployment attempt to one target namespace
pub struct TargetTransformer {
    target: String,
}

#[async_trait]
impl Transformer for TargetTransformer {
    async fn transform_config(&mut self, config: &mut ConfigTree) -> Result<(), TransformerError> {
        config.set_prop(TARGET_PROP, json!(self.target))?;
        Ok(())
    }

    async fn transform_manifests(
        &mut self,
        _environment: &dyn TargetEnvironment,
        _config: &ConfigTree,
        artifacts: &mut ArtifactBundle,
        _status: &mut ServiceStatus,
    ) -> Result<(), TransformerError> {
        for manifest in artifacts.iter_mut() {
            manifest.namespace = Some(self.target.clone());
        }
        Ok(())
    }
}
