use tracing::{info, warn};

use crate::domain::errors::ConfigResult;
use crate::domain::models::CONFIG_RESOURCE_NAME;
use crate::domain::ports::OverlaySource;

use super::merger::{ConfigMerger, MergedConfig};

/// Startup entry point: fetch the overlay resource and merge it.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `namespace`.
    ///
    /// Precedence (lowest to highest):
    /// 1. Compiled-in defaults held by the merger
    /// 2. The `config-kafka` resource's payloads
    ///
    /// Any failure is fatal; no partial configuration is returned.
    pub async fn load(
        source: &dyn OverlaySource,
        merger: &ConfigMerger,
        namespace: &str,
    ) -> ConfigResult<MergedConfig> {
        let resource = source.fetch(namespace, CONFIG_RESOURCE_NAME).await?;
        match merger.merge(resource.as_ref()) {
            Ok(merged) => {
                info!(
                    namespace,
                    admin_type = %merged.app.kafka.admin_type,
                    version = %merged.transport.version,
                    "configuration loaded"
                );
                Ok(merged)
            }
            Err(err) => {
                warn!(namespace, error = %err, "configuration rejected");
                Err(err)
            }
        }
    }
}
