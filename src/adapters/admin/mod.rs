//! Admin client backends.
//!
//! - `kafka`: native broker admin over a `ClusterAdmin` wire collaborator
//! - `rest_proxy`: `ClusterAdmin` over the Kafka REST v3 API
//! - `event_hub`: managed hub namespaces over a `HubManager` collaborator
//! - `custom`: HTTP sidecar
//! - `mock`: scripted test double
//! - `registry`: constructor registry the factory selects from

pub mod custom;
pub mod event_hub;
pub mod kafka;
pub mod mock;
pub mod registry;
pub mod rest_proxy;

pub use custom::{CustomAdminClient, DEFAULT_SIDECAR_URL};
pub use event_hub::{
    EventHubAdminClient, HubError, HubManager, HubManagerConnector, HubNamespace,
    MAX_HUBS_PER_NAMESPACE,
};
pub use kafka::{ClusterAdmin, ClusterAdminConnector, KafkaAdminClient, KafkaProtocolError};
pub use mock::{MockAdminClient, MockCall};
pub use registry::{BackendRegistry, BackendWiring, KafkaBackendArgs};
pub use rest_proxy::RestProxyConnector;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::errors::TopicError;

/// Open/closed flag shared by every backend.
#[derive(Debug, Default)]
pub(crate) struct CloseState(AtomicBool);

impl CloseState {
    /// Flip to closed. Returns `true` only for the call that performed the
    /// transition, so teardown runs once under concurrent closes.
    pub(crate) fn begin_close(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn ensure_open(&self, backend: &str, topic: &str) -> Result<(), TopicError> {
        if self.0.load(Ordering::Acquire) {
            return Err(TopicError::Closed {
                topic: topic.to_string(),
                backend: backend.to_string(),
            });
        }
        Ok(())
    }
}
