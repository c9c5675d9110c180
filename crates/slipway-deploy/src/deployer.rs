//! The deployment pipeline
//!
//! The Deployer runs one deployment attempt end to end: resolve the carrier,
//! run the transformer chain forward over the configuration, generate
//! manifests, run the chain in reverse over the manifests, persist, and
//! commit the status snapshot. Every step is a hard failure point; the first
//! error aborts the attempt with nothing retried and nothing rolled back.
//! The status commit at the end is the only durable marker of success, so
//! re-running `deploy` is the recovery path for a failed attempt.

use crate::committer::StatusCommitter;
use crate::engine::ManifestEngine;
use crate::environment::TargetEnvironment;
use crate::error::{DeployError, Result};
use crate::store::ManifestStore;
use crate::transformer::{Transformer, TransformerGenerator};
use crate::transformers;
use slipway_config::ConfigCarrier;
use slipway_types::{DeployEvent, DeployEventEnvelope, ServiceDeclaration, ServiceName};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

/// What a successful attempt produced
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOutcome {
    /// Version stamped into the committed status (may be empty)
    pub version: String,
    /// Number of manifests persisted
    pub manifest_count: usize,
}

/// Orchestrates deployment attempts over pluggable collaborators
pub struct Deployer {
    /// Manifest generation engine
    engine: Arc<dyn ManifestEngine>,
    /// Durable storage for generated manifests
    store: Arc<dyn ManifestStore>,
    /// Durable storage for committed statuses
    committer: Arc<dyn StatusCommitter>,
    /// Transformer generators, in registration order
    generators: Vec<Arc<dyn TransformerGenerator>>,
    /// Event channel
    event_tx: broadcast::Sender<DeployEventEnvelope>,
}

impl Deployer {
    /// Create a deployer with the standard transformer set
    pub fn new(
        engine: Arc<dyn ManifestEngine>,
        store: Arc<dyn ManifestStore>,
        committer: Arc<dyn StatusCommitter>,
    ) -> Self {
        Self::with_generators(engine, store, committer, transformers::standard_generators())
    }

    /// Create a deployer with a custom transformer registration list
    ///
    /// The list's order is the forward order; the manifest pass runs its
    /// exact reverse.
    pub fn with_generators(
        engine: Arc<dyn ManifestEngine>,
        store: Arc<dyn ManifestStore>,
        committer: Arc<dyn StatusCommitter>,
        generators: Vec<Arc<dyn TransformerGenerator>>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(4096);
        Self {
            engine,
            store,
            committer,
            generators,
            event_tx,
        }
    }

    /// Subscribe to deployment events
    pub fn subscribe(&self) -> broadcast::Receiver<DeployEventEnvelope> {
        self.event_tx.subscribe()
    }

    /// Run one deployment attempt end to end
    #[instrument(skip(self, environment, carrier), fields(service = %declaration.name))]
    pub async fn deploy(
        &self,
        declaration: &ServiceDeclaration,
        environment: Arc<dyn TargetEnvironment>,
        carrier: &ConfigCarrier,
    ) -> Result<DeployOutcome> {
        // 1. Resolve the carrier into a normalized configuration
        info!(carrier = %carrier.name(), "Resolving service configuration");
        let mut config = carrier.resolve()?;

        // 2. Best-effort version read; a missing or malformed version is
        //    tolerated and the attempt proceeds with an empty string
        let version = match config.get_string("version") {
            Ok(version) => version,
            Err(err) => {
                warn!(error = %err, "Could not read configuration version");
                String::new()
            }
        };

        // 3. Announce the resolved configuration
        self.emit_event(
            &declaration.name,
            DeployEvent::ConfigDetected {
                version: version.clone(),
            },
        );
        info!(version = %version, "New configuration detected");

        // 4. Construct the transformer chain in registration order, before
        //    any of it runs, so a construction failure leaves the
        //    configuration untouched
        let mut chain: Vec<(&'static str, Box<dyn Transformer>)> =
            Vec::with_capacity(self.generators.len());
        for generator in &self.generators {
            let transformer = generator
                .new_transformer(declaration, environment.clone())
                .await
                .map_err(|source| DeployError::TransformerConstruction {
                    name: generator.name(),
                    source,
                })?;
            chain.push((generator.name(), transformer));
        }

        // 5. Forward pass over the configuration
        for (name, transformer) in chain.iter_mut() {
            let name = *name;
            transformer
                .transform_config(&mut config)
                .await
                .map_err(|source| DeployError::ConfigTransform { name, source })?;
        }

        // 6. Generate the manifests
        let mut bundle = self.engine.generate(&config).await?;
        info!(manifests = bundle.len(), "Manifests generated");

        // 7. Working copy of the last committed status; the declaration's
        //    own status stays untouched until commit
        let mut status = declaration.status.clone();

        // 8. Reverse pass over the manifests, the exact reverse of step 5
        for (name, transformer) in chain.iter_mut().rev() {
            let name = *name;
            transformer
                .transform_manifests(environment.as_ref(), &config, &mut bundle, &mut status)
                .await
                .map_err(|source| DeployError::ManifestTransform { name, source })?;
        }

        // 9. Persist the transformed manifests
        self.store.persist(&bundle, &mut status).await?;

        // 10. Announce the deployment
        self.emit_event(
            &declaration.name,
            DeployEvent::VersionDeploymentSet {
                version: version.clone(),
            },
        );
        info!(version = %version, "Version deployment set");

        // 11. Stamp and commit; the single durable success marker
        status.version = version.clone();
        status.last_deployed_at = Some(chrono::Utc::now());
        let manifest_count = bundle.len();
        self.committer.commit(declaration, status).await?;

        Ok(DeployOutcome {
            version,
            manifest_count,
        })
    }

    fn emit_event(&self, service: &ServiceName, event: DeployEvent) {
        let envelope = DeployEventEnvelope::new(service.clone(), event);
        let _ = self.event_tx.send(envelope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::committer::InMemoryStatusCommitter;
    use crate::engine::StaticManifestEngine;
    use crate::environment::StaticEnvironment;
    use crate::store::InMemoryManifestStore;
    use serde_json::json;
    use slipway_config::{ConfigMapCarrier, PRIMARY_ENTRY};
    use slipway_types::{CarrierRef, Manifest, ManifestKind};

    fn carrier(version: &str) -> ConfigCarrier {
        ConfigCarrier::ConfigMap(
            ConfigMapCarrier::new("billing-config")
                .with_entry(PRIMARY_ENTRY, format!("version: {version}\n")),
        )
    }

    #[tokio::test]
    async fn test_deploy_with_standard_transformers() {
        let engine = Arc::new(
            StaticManifestEngine::new()
                .with_manifest(Manifest::new("billing-api", ManifestKind::Deployment, json!({}))),
        );
        let store = Arc::new(InMemoryManifestStore::new());
        let committer = Arc::new(InMemoryStatusCommitter::new());
        let deployer = Deployer::new(engine, store.clone(), committer.clone());

        let declaration =
            ServiceDeclaration::new("billing", CarrierRef::new("ConfigMap", "billing-config"));
        let outcome = deployer
            .deploy(
                &declaration,
                Arc::new(StaticEnvironment::new("staging")),
                &carrier("1.20.0"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.version, "1.20.0");
        assert_eq!(outcome.manifest_count, 1);

        // The target transformer pinned the persisted manifest's namespace.
        let persisted = store.manifest("billing-api").unwrap();
        assert_eq!(persisted.namespace.as_deref(), Some("staging"));

        let committed = committer.committed(&declaration.name).unwrap();
        assert_eq!(committed.version, "1.20.0");
        assert!(committed.last_deployed_at.is_some());
        assert_eq!(committed.artifacts.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_version_is_tolerated() {
        let deployer = Deployer::new(
            Arc::new(StaticManifestEngine::new()),
            Arc::new(InMemoryManifestStore::new()),
            Arc::new(InMemoryStatusCommitter::new()),
        );

        let declaration =
            ServiceDeclaration::new("billing", CarrierRef::new("ConfigMap", "billing-config"));
        let no_version = ConfigCarrier::ConfigMap(
            ConfigMapCarrier::new("billing-config").with_entry(PRIMARY_ENTRY, "replicas: 2\n"),
        );

        let outcome = deployer
            .deploy(
                &declaration,
                Arc::new(StaticEnvironment::new("staging")),
                &no_version,
            )
            .await
            .unwrap();

        assert_eq!(outcome.version, "");
    }

    #[tokio::test]
    async fn test_events_are_broadcast_in_order() {
        let deployer = Deployer::new(
            Arc::new(StaticManifestEngine::new()),
            Arc::new(InMemoryManifestStore::new()),
            Arc::new(InMemoryStatusCommitter::new()),
        );
        let mut events = deployer.subscribe();

        let declaration =
            ServiceDeclaration::new("billing", CarrierRef::new("ConfigMap", "billing-config"));
        deployer
            .deploy(
                &declaration,
                Arc::new(StaticEnvironment::new("staging")),
                &carrier("1.20.0"),
            )
            .await
            .unwrap();

        let first = events.recv().await.unwrap();
        assert!(matches!(first.event, DeployEvent::ConfigDetected { .. }));
        assert_eq!(
            first.message(),
            "New configuration detected, version: 1.20.0"
        );

        let second = events.recv().await.unwrap();
        assert!(matches!(
            second.event,
            DeployEvent::VersionDeploymentSet { .. }
        ));
    }

    #[tokio::test]
    async fn test_unsupported_carrier_aborts_before_events() {
        let deployer = Deployer::new(
            Arc::new(StaticManifestEngine::new()),
            Arc::new(InMemoryManifestStore::new()),
            Arc::new(InMemoryStatusCommitter::new()),
        );
        let mut events = deployer.subscribe();

        let declaration =
            ServiceDeclaration::new("billing", CarrierRef::new("Bucket", "billing-config"));
        let unsupported = ConfigCarrier::External(slipway_config::ObjectReference::new(
            "Bucket",
            "billing-config",
        ));

        let err = deployer
            .deploy(
                &declaration,
                Arc::new(StaticEnvironment::new("staging")),
                &unsupported,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::ConfigResolution(_)));
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
