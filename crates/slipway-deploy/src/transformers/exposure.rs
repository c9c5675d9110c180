//! Service exposure transformer
//!
//! Makes a deployed service reachable from outside the target environment.
//! The reverse pass rewrites the `{service}-api` and `{service}-ui` service
//! manifests to the declared exposure kind, asks the environment for the
//! provisioned endpoints, and records them in the status snapshot. The
//! forward pass writes endpoints recorded by a *previous* attempt back into
//! the configuration, so generation can reference them once they exist; on a
//! first deployment nothing is known yet and the forward pass writes nothing.

use crate::environment::TargetEnvironment;
use crate::transformer::{Transformer, TransformerError, TransformerGenerator};
use async_trait::async_trait;
use serde_json::json;
use slipway_config::ConfigTree;
use slipway_types::{
    ArtifactBundle, ExposureConfig, ManifestKind, ServiceDeclaration, ServiceName, ServiceStatus,
};
use std::sync::Arc;

/// Configuration property holding the last provisioned API endpoint
pub const API_URL_PROP: &str = "exposure.apiBaseUrl";

/// Configuration property holding the last provisioned UI endpoint
pub const UI_URL_PROP: &str = "exposure.uiBaseUrl";

/// Generator for [`ExposureTransformer`]
pub struct ExposureTransformerGenerator;

#[async_trait]
impl TransformerGenerator for ExposureTransformerGenerator {
    fn name(&self) -> &'static str {
        "exposure"
    }

    async fn new_transformer(
        &self,
        declaration: &ServiceDeclaration,
        _environment: Arc<dyn TargetEnvironment>,
    ) -> Result<Box<dyn Transformer>, TransformerError> {
        if let Some(exposure) = &declaration.options.exposure {
            if exposure.port == 0 {
                return Err(TransformerError::InvalidOption {
                    option: "exposure.port".into(),
                    reason: "port must be non-zero".into(),
                });
            }
        }
        Ok(Box::new(ExposureTransformer {
            service: declaration.name.clone(),
            exposure: declaration.options.exposure.clone(),
            known_api_url: declaration.status.api_url.clone(),
            known_ui_url: declaration.status.ui_url.clone(),
        }))
    }
}

/// Exposes the API and UI service manifests of one deployment attempt
pub struct ExposureTransformer {
    service: ServiceName,
    exposure: Option<ExposureConfig>,
    known_api_url: Option<String>,
    known_ui_url: Option<String>,
}

impl ExposureTransformer {
    /// Rewrite one service manifest to the declared exposure and look up its
    /// provisioned endpoint. Returns `None` when the manifest is absent, not
    /// a service, or has no endpoint yet.
    async fn expose(
        exposure: &ExposureConfig,
        environment: &dyn TargetEnvironment,
        artifacts: &mut ArtifactBundle,
        name: &str,
    ) -> Option<String> {
        match artifacts.get_mut(name) {
            Some(manifest) if manifest.kind == ManifestKind::Service => {
                manifest.set_body_field("type", json!(exposure.kind.service_type()));
                manifest.set_body_field("port", json!(exposure.port));
                for (key, value) in &exposure.annotations {
                    manifest.annotations.insert(key.clone(), value.clone());
                }
                environment.service_endpoint(name).await
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Transformer for ExposureTransformer {
    async fn transform_config(&mut self, config: &mut ConfigTree) -> Result<(), TransformerError> {
        if self.exposure.is_none() {
            return Ok(());
        }
        if let Some(url) = &self.known_api_url {
            config.set_prop(API_URL_PROP, json!(url))?;
        }
        if let Some(url) = &self.known_ui_url {
            config.set_prop(UI_URL_PROP, json!(url))?;
        }
        Ok(())
    }

    async fn transform_manifests(
        &mut self,
        environment: &dyn TargetEnvironment,
        _config: &ConfigTree,
        artifacts: &mut ArtifactBundle,
        status: &mut ServiceStatus,
    ) -> Result<(), TransformerError> {
        let Some(exposure) = &self.exposure else {
            return Ok(());
        };

        let api_name = format!("{}-api", self.service);
        if let Some(endpoint) = Self::expose(exposure, environment, artifacts, &api_name).await {
            status.api_url = Some(endpoint);
        }

        let ui_name = format!("{}-ui", self.service);
        if let Some(endpoint) = Self::expose(exposure, environment, artifacts, &ui_name).await {
            status.ui_url = Some(endpoint);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use slipway_types::{CarrierRef, DeclarationOptions, ExposureKind, Manifest};

    fn exposed_declaration() -> ServiceDeclaration {
        ServiceDeclaration::new("billing", CarrierRef::new("ConfigMap", "billing-config"))
            .with_options(DeclarationOptions {
                exposure: Some(ExposureConfig {
                    kind: ExposureKind::LoadBalancer,
                    port: 443,
                    annotations: [("lb-class".to_string(), "external".to_string())].into(),
                }),
                ..DeclarationOptions::default()
            })
    }

    #[tokio::test]
    async fn test_zero_port_fails_construction() {
        let declaration = ServiceDeclaration::new(
            "billing",
            CarrierRef::new("ConfigMap", "billing-config"),
        )
        .with_options(DeclarationOptions {
            exposure: Some(ExposureConfig {
                port: 0,
                ..ExposureConfig::default()
            }),
            ..DeclarationOptions::default()
        });

        let result = ExposureTransformerGenerator
            .new_transformer(&declaration, Arc::new(StaticEnvironment::new("staging")))
            .await;
        assert!(matches!(
            result,
            Err(TransformerError::InvalidOption { .. })
        ));
    }

    #[tokio::test]
    async fn test_unexposed_service_is_untouched() {
        let declaration =
            ServiceDeclaration::new("billing", CarrierRef::new("ConfigMap", "billing-config"));
        let env = Arc::new(StaticEnvironment::new("staging"));
        let mut transformer = ExposureTransformerGenerator
            .new_transformer(&declaration, env.clone())
            .await
            .unwrap();

        let mut config = ConfigTree::new();
        transformer.transform_config(&mut config).await.unwrap();
        assert!(!config.has_prop(API_URL_PROP));

        let mut bundle = ArtifactBundle::new();
        bundle.push(Manifest::new("billing-api", ManifestKind::Service, json!({})));
        let before = bundle.clone();
        let mut status = ServiceStatus::default();
        transformer
            .transform_manifests(env.as_ref(), &config, &mut bundle, &mut status)
            .await
            .unwrap();

        assert_eq!(bundle, before);
        assert!(status.api_url.is_none());
    }

    #[tokio::test]
    async fn test_rewrites_services_and_records_endpoints() {
        let env = Arc::new(
            StaticEnvironment::new("staging")
                .with_endpoint("billing-api", "https://api.example.com")
                .with_endpoint("billing-ui", "https://ui.example.com"),
        );
        let mut transformer = ExposureTransformerGenerator
            .new_transformer(&exposed_declaration(), env.clone())
            .await
            .unwrap();

        let mut bundle = ArtifactBundle::new();
        bundle.push(Manifest::new("billing-api", ManifestKind::Service, json!({})));
        bundle.push(Manifest::new("billing-ui", ManifestKind::Service, json!({})));
        bundle.push(Manifest::new("billing-worker", ManifestKind::Deployment, json!({})));
        let mut status = ServiceStatus::default();

        transformer
            .transform_manifests(env.as_ref(), &ConfigTree::new(), &mut bundle, &mut status)
            .await
            .unwrap();

        let api = bundle.get("billing-api").unwrap();
        assert_eq!(api.body["type"], "LoadBalancer");
        assert_eq!(api.body["port"], 443);
        assert_eq!(api.annotations.get("lb-class").map(String::as_str), Some("external"));
        assert_eq!(status.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(status.ui_url.as_deref(), Some("https://ui.example.com"));

        // Workload manifests are not exposure targets.
        assert!(bundle.get("billing-worker").unwrap().body.get("type").is_none());
    }

    #[tokio::test]
    async fn test_forward_pass_writes_previously_recorded_endpoints() {
        let mut declaration = exposed_declaration();
        declaration.status.api_url = Some("https://api.example.com".into());

        let mut transformer = ExposureTransformerGenerator
            .new_transformer(&declaration, Arc::new(StaticEnvironment::new("staging")))
            .await
            .unwrap();

        let mut config = ConfigTree::new();
        transformer.transform_config(&mut config).await.unwrap();

        assert_eq!(
            config.get_string(API_URL_PROP).unwrap(),
            "https://api.example.com"
        );
        // No UI endpoint was ever recorded, so none is written.
        assert!(!config.has_prop(UI_URL_PROP));
    }
}
