//! Admin client factory: picks the backend named by the application config
//! and constructs it through the registry.

use tracing::{info, warn};

use crate::adapters::admin::{BackendRegistry, KafkaBackendArgs};
use crate::domain::errors::FactoryError;
use crate::domain::models::{AdminContext, AdminType, AppConfig, TransportConfig};
use crate::domain::ports::AdminClient;

/// Builds admin clients for whichever backend the config selects.
///
/// Holds nothing but an immutable registry, so one factory may serve
/// concurrent callers.
#[derive(Clone)]
pub struct AdminClientFactory {
    registry: BackendRegistry,
}

impl AdminClientFactory {
    pub const fn new(registry: BackendRegistry) -> Self {
        Self { registry }
    }

    /// Construct a client for `app.kafka.admin_type`.
    ///
    /// The constructor is raced against `ctx`; its errors are returned
    /// verbatim inside [`FactoryError::BackendConstruction`] and never
    /// retried.
    pub async fn create(
        &self,
        ctx: &AdminContext,
        transport: &TransportConfig,
        app: &AppConfig,
    ) -> Result<Box<dyn AdminClient>, FactoryError> {
        let backend = app.kafka.admin_type.clone();
        let construction = match &backend {
            AdminType::Kafka => self.registry.kafka(
                ctx.clone(),
                KafkaBackendArgs {
                    transport: transport.clone(),
                    client_id: transport.client_id.clone(),
                    namespace: ctx.namespace().to_string(),
                },
            ),
            AdminType::EventHub => self.registry.event_hub(ctx.clone(), ctx.namespace().to_string()),
            AdminType::Custom => self.registry.custom(ctx.clone(), ctx.namespace().to_string()),
            AdminType::Unknown(name) => {
                warn!(admin_type = %name, "unsupported admin backend requested");
                return Err(FactoryError::UnsupportedBackend(name.clone()));
            }
        };

        let client = ctx
            .guard(construction)
            .await
            .map_err(|reason| FactoryError::Interrupted {
                backend: backend.clone(),
                reason,
            })?
            .map_err(|source| {
                warn!(backend = %backend, error = %source, "admin client construction failed");
                FactoryError::BackendConstruction {
                    backend: backend.clone(),
                    source,
                }
            })?;

        info!(backend = %backend, client = client.name(), namespace = ctx.namespace(), "admin client created");
        Ok(client)
    }
}
