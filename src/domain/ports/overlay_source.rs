use async_trait::async_trait;

use crate::domain::errors::ConfigError;
use crate::domain::models::ConfigResource;

/// Supplies the raw configuration resource the overlay is read from.
///
/// How the resource is stored or watched is up to the implementation.
#[async_trait]
pub trait OverlaySource: Send + Sync {
    /// Fetch the resource `name` in `namespace`.
    ///
    /// Returns `Ok(None)` when no such resource exists.
    async fn fetch(&self, namespace: &str, name: &str) -> Result<Option<ConfigResource>, ConfigError>;
}
