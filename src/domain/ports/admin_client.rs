//! Admin client port - the capability set every cluster backend provides.

use async_trait::async_trait;

use crate::domain::errors::{CloseError, TopicError};
use crate::domain::models::{AdminContext, TopicSpec};

/// Topic lifecycle operations against one cluster backend.
///
/// A client is owned by whoever asked the factory for it. It may be shared
/// across tasks; `close` is idempotent and safe to race with itself.
#[async_trait]
pub trait AdminClient: Send + Sync {
    /// Backend name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Request creation of a topic.
    ///
    /// `Ok(())` means the backend accepted the request; the topic may appear
    /// asynchronously.
    async fn create_topic(
        &self,
        ctx: &AdminContext,
        name: &str,
        spec: &TopicSpec,
    ) -> Result<(), TopicError>;

    /// Delete a topic. A topic that does not exist yields
    /// [`TopicError::NotFound`].
    async fn delete_topic(&self, ctx: &AdminContext, name: &str) -> Result<(), TopicError>;

    /// Name of the credential resource associated with `namespace` for this
    /// backend, or an empty string when there is none. Pure lookup.
    fn secret_name(&self, namespace: &str) -> String;

    /// Release underlying connections.
    async fn close(&self) -> Result<(), CloseError>;
}
