//! Backend constructor registry.
//!
//! Holds one constructor per known backend. The factory receives a registry
//! by value and only ever reads it; tests swap individual constructors with
//! the `with_*` builders before handing it over.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;

use crate::domain::errors::BoxError;
use crate::domain::models::{AdminContext, TransportConfig};
use crate::domain::ports::AdminClient;

use super::custom::{CustomAdminClient, DEFAULT_SIDECAR_URL};
use super::event_hub::{EventHubAdminClient, HubManagerConnector};
use super::kafka::{ClusterAdminConnector, KafkaAdminClient};

/// Parameters handed to the broker backend constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaBackendArgs {
    pub transport: TransportConfig,
    pub client_id: String,
    pub namespace: String,
}

/// Future produced by every backend constructor.
pub type BackendFuture = BoxFuture<'static, Result<Box<dyn AdminClient>, BoxError>>;

pub type KafkaConstructor = Arc<dyn Fn(AdminContext, KafkaBackendArgs) -> BackendFuture + Send + Sync>;

/// Constructor for backends parameterized only by namespace.
pub type NamespacedConstructor = Arc<dyn Fn(AdminContext, String) -> BackendFuture + Send + Sync>;

/// Collaborators the production constructors are built from.
#[derive(Clone)]
pub struct BackendWiring {
    pub cluster_connector: Option<Arc<dyn ClusterAdminConnector>>,
    pub hub_connector: Option<Arc<dyn HubManagerConnector>>,
    pub sidecar_url: String,
}

impl Default for BackendWiring {
    fn default() -> Self {
        Self {
            cluster_connector: None,
            hub_connector: None,
            sidecar_url: DEFAULT_SIDECAR_URL.to_string(),
        }
    }
}

impl BackendWiring {
    pub fn with_cluster_connector(mut self, connector: Arc<dyn ClusterAdminConnector>) -> Self {
        self.cluster_connector = Some(connector);
        self
    }

    pub fn with_hub_connector(mut self, connector: Arc<dyn HubManagerConnector>) -> Self {
        self.hub_connector = Some(connector);
        self
    }

    pub fn with_sidecar_url(mut self, url: impl Into<String>) -> Self {
        self.sidecar_url = url.into();
        self
    }
}

/// One constructor per known backend variant.
#[derive(Clone)]
pub struct BackendRegistry {
    kafka: KafkaConstructor,
    event_hub: NamespacedConstructor,
    custom: NamespacedConstructor,
}

impl BackendRegistry {
    /// Registry whose constructors all fail until replaced.
    pub fn new() -> Self {
        Self {
            kafka: Arc::new(|_: AdminContext, _: KafkaBackendArgs| unconfigured("kafka")),
            event_hub: Arc::new(|_: AdminContext, _: String| unconfigured("event hub")),
            custom: Arc::new(|_: AdminContext, _: String| unconfigured("custom")),
        }
    }

    /// Registry wired to the real adapters.
    ///
    /// Backends whose collaborator is absent from `wiring` fail at
    /// construction with a descriptive error.
    pub fn production(wiring: BackendWiring) -> Self {
        let mut registry = Self::new();

        if let Some(connector) = wiring.cluster_connector {
            registry = registry.with_kafka(move |_ctx, args| {
                let connector = connector.clone();
                async move {
                    let client = KafkaAdminClient::connect(args, connector.as_ref()).await?;
                    Ok::<_, BoxError>(Box::new(client) as Box<dyn AdminClient>)
                }
            });
        }

        if let Some(connector) = wiring.hub_connector {
            registry = registry.with_event_hub(move |_ctx, namespace| {
                let connector = connector.clone();
                async move {
                    let client = EventHubAdminClient::connect(&namespace, connector.as_ref()).await?;
                    Ok::<_, BoxError>(Box::new(client) as Box<dyn AdminClient>)
                }
            });
        }

        let sidecar_url = wiring.sidecar_url;
        registry.with_custom(move |_ctx, namespace| {
            let result = CustomAdminClient::new(sidecar_url.clone(), namespace)
                .map(|client| Box::new(client) as Box<dyn AdminClient>);
            async move { result }
        })
    }

    pub fn with_kafka<F, Fut>(mut self, constructor: F) -> Self
    where
        F: Fn(AdminContext, KafkaBackendArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn AdminClient>, BoxError>> + Send + 'static,
    {
        self.kafka = Arc::new(move |ctx, args| constructor(ctx, args).boxed());
        self
    }

    pub fn with_event_hub<F, Fut>(mut self, constructor: F) -> Self
    where
        F: Fn(AdminContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn AdminClient>, BoxError>> + Send + 'static,
    {
        self.event_hub = Arc::new(move |ctx, namespace| constructor(ctx, namespace).boxed());
        self
    }

    pub fn with_custom<F, Fut>(mut self, constructor: F) -> Self
    where
        F: Fn(AdminContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn AdminClient>, BoxError>> + Send + 'static,
    {
        self.custom = Arc::new(move |ctx, namespace| constructor(ctx, namespace).boxed());
        self
    }

    pub fn kafka(&self, ctx: AdminContext, args: KafkaBackendArgs) -> BackendFuture {
        (self.kafka)(ctx, args)
    }

    pub fn event_hub(&self, ctx: AdminContext, namespace: String) -> BackendFuture {
        (self.event_hub)(ctx, namespace)
    }

    pub fn custom(&self, ctx: AdminContext, namespace: String) -> BackendFuture {
        (self.custom)(ctx, namespace)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn unconfigured(backend: &'static str) -> BackendFuture {
    let err: BoxError = format!("no {backend} backend configured").into();
    futures::future::ready(Err(err)).boxed()
}
