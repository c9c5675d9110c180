//! Declaration override transformer
//!
//! Applies the declaration's dotted-path property overrides to the
//! configuration before generation. The reverse pass stamps an annotation on
//! every manifest recording how many overrides shaped the attempt, so the
//! persisted output is traceable back to the declaration.

use crate::environment::TargetEnvironment;
use crate::transformer::{Transformer, TransformerError, TransformerGenerator};
use async_trait::async_trait;
use slipway_config::ConfigTree;
use slipway_types::{ArtifactBundle, ServiceDeclaration, ServiceStatus};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Annotation recording the number of applied declaration overrides
pub const OVERRIDES_ANNOTATION: &str = "slipway.io/overrides";

/// Generator for [`OverridesTransformer`]
pub struct OverridesTransformerGenerator;

#[async_trait]
impl TransformerGenerator for OverridesTransformerGenerator {
    fn name(&self) -> &'static str {
        "overrides"
    }

    async fn new_transformer(
        &self,
        declaration: &ServiceDeclaration,
        _environment: Arc<dyn TargetEnvironment>,
    ) -> Result<Box<dyn Transformer>, TransformerError> {
        Ok(Box::new(OverridesTransformer {
            overrides: declaration.options.overrides.clone(),
        }))
    }
}

/// Applies a declaration's configuration overrides
pub struct OverridesTransformer {
    overrides: BTreeMap<String, serde_json::Value>,
}

#[async_trait]
impl Transformer for OverridesTransformer {
    async fn transform_config(&mut self, config: &mut ConfigTree) -> Result<(), TransformerError> {
        for (path, value) in &self.overrides {
            config.set_prop(path, value.clone())?;
        }
        Ok(())
    }

    async fn transform_manifests(
        &mut self,
        _environment: &dyn TargetEnvironment,
        _config: &ConfigTree,
        artifacts: &mut ArtifactBundle,
        _status: &mut ServiceStatus,
    ) -> Result<(), TransformerError> {
        if self.overrides.is_empty() {
            return Ok(());
        }
        let count = self.overrides.len().to_string();
        for manifest in artifacts.iter_mut() {
            manifest
                .annotations
                .insert(OVERRIDES_ANNOTATION.into(), count.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use serde_json::json;
    use slipway_types::{CarrierRef, DeclarationOptions, Manifest, ManifestKind};

    fn declaration_with_overrides(
        overrides: BTreeMap<String, serde_json::Value>,
    ) -> ServiceDeclaration {
        ServiceDeclaration::new("billing", CarrierRef::new("ConfigMap", "billing-config"))
            .with_options(DeclarationOptions {
                overrides,
                ..DeclarationOptions::default()
            })
    }

    #[tokio::test]
    async fn test_overrides_applied_in_forward_pass() {
        let overrides = BTreeMap::from([
            ("replicas".to_string(), json!(3)),
            ("providers.kubernetes.enabled".to_string(), json!(true)),
        ]);
        let mut transformer = OverridesTransformerGenerator
            .new_transformer(
                &declaration_with_overrides(overrides),
                Arc::new(StaticEnvironment::new("staging")),
            )
            .await
            .unwrap();

        let mut config = ConfigTree::new();
        transformer.transform_config(&mut config).await.unwrap();

        assert_eq!(config.get_prop("replicas").unwrap(), &json!(3));
        assert_eq!(
            config.get_prop("providers.kubernetes.enabled").unwrap(),
            &json!(true)
        );
    }

    #[tokio::test]
    async fn test_unsettable_override_path_fails() {
        let overrides = BTreeMap::from([("version.build".to_string(), json!(7))]);
        let mut transformer = OverridesTransformerGenerator
            .new_transformer(
                &declaration_with_overrides(overrides),
                Arc::new(StaticEnvironment::new("staging")),
            )
            .await
            .unwrap();

        // "version" is a scalar, so "version.build" cannot be created under it.
        let carrier = slipway_config::ConfigMapCarrier::new("cfg")
            .with_entry(slipway_config::PRIMARY_ENTRY, "version: 1.20.0\n");
        let mut config = ConfigTree::from_config_map(&carrier).unwrap();

        assert!(matches!(
            transformer.transform_config(&mut config).await,
            Err(TransformerError::Property(_))
        ));
    }

    #[tokio::test]
    async fn test_manifests_annotated_with_override_count() {
        let overrides = BTreeMap::from([("replicas".to_string(), json!(3))]);
        let env = Arc::new(StaticEnvironment::new("staging"));
        let mut transformer = OverridesTransformerGenerator
            .new_transformer(&declaration_with_overrides(overrides), env.clone())
            .await
            .unwrap();

        let mut bundle = ArtifactBundle::new();
        bundle.push(Manifest::new("api", ManifestKind::Deployment, json!({})));
        bundle.push(Manifest::new("api-svc", ManifestKind::Service, json!({})));
        let mut status = ServiceStatus::default();

        transformer
            .transform_manifests(env.as_ref(), &ConfigTree::new(), &mut bundle, &mut status)
            .await
            .unwrap();

        for manifest in bundle.iter() {
            assert_eq!(
                manifest.annotations.get(OVERRIDES_ANNOTATION).map(String::as_str),
                Some("1")
            );
        }
    }

    #[tokio::test]
    async fn test_no_overrides_leaves_manifests_unannotated() {
        let env = Arc::new(StaticEnvironment::new("staging"));
        let mut transformer = OverridesTransformerGenerator
            .new_transformer(&declaration_with_overrides(BTreeMap::new()), env.clone())
            .await
            .unwrap();

        let mut bundle = ArtifactBundle::new();
        bundle.push(Manifest::new("api", ManifestKind::Deployment, json!({})));
        let mut status = ServiceStatus::default();

        transformer
            .transform_manifests(env.as_ref(), &ConfigTree::new(), &mut bundle, &mut status)
            .await
            .unwrap();

        assert!(bundle.get("api").unwrap().annotations.is_empty());
    }
}
