//! Managed event hub backend.
//!
//! Topics map to hubs spread across a pool of hub namespaces, each with its
//! own connection secret. The pool is listed once at construction and kept
//! current as hubs are created and deleted through this client.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::errors::{BoxError, CloseError, TopicError};
use crate::domain::models::{validate_topic_name, AdminContext, TopicSpec};
use crate::domain::ports::AdminClient;

use super::CloseState;

const BACKEND: &str = "event_hub";

/// Hubs a single namespace can host.
pub const MAX_HUBS_PER_NAMESPACE: usize = 10;

/// Partition range a hub accepts.
const MAX_HUB_PARTITIONS: i32 = 32;

/// One hub namespace and the hubs it currently hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubNamespace {
    pub name: String,
    pub secret_name: String,
    pub hubs: Vec<String>,
}

impl HubNamespace {
    pub fn new(name: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret_name: secret_name.into(),
            hubs: Vec::new(),
        }
    }

    pub fn with_hubs<I, S>(mut self, hubs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hubs.extend(hubs.into_iter().map(Into::into));
        self
    }

    fn has_capacity(&self) -> bool {
        self.hubs.len() < MAX_HUBS_PER_NAMESPACE
    }
}

/// Failure reported by a [`HubManager`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl HubError {
    fn into_topic_error(self, topic: &str) -> TopicError {
        let topic_owned = topic.to_string();
        match self {
            Self::Conflict(_) => TopicError::AlreadyExists { topic: topic_owned },
            Self::NotFound(_) => TopicError::NotFound { topic: topic_owned },
            Self::BadRequest(reason) => TopicError::InvalidConfiguration {
                topic: topic_owned,
                reason,
            },
            Self::Forbidden(reason) => TopicError::Unauthorized {
                topic: topic_owned,
                reason,
            },
            Self::Unavailable(reason) => TopicError::unavailable(topic, reason),
        }
    }
}

/// Management-plane operations on hub namespaces.
#[async_trait]
pub trait HubManager: Send + Sync {
    async fn list_namespaces(&self) -> Result<Vec<HubNamespace>, HubError>;

    async fn create_hub(&self, namespace: &str, hub: &str, spec: &TopicSpec) -> Result<(), HubError>;

    async fn delete_hub(&self, namespace: &str, hub: &str) -> Result<(), HubError>;

    async fn close(&self) -> Result<(), BoxError>;
}

/// Opens a [`HubManager`] scoped to the operator namespace.
#[async_trait]
pub trait HubManagerConnector: Send + Sync {
    async fn connect(&self, namespace: &str) -> Result<Arc<dyn HubManager>, BoxError>;
}

/// Admin client for managed event hubs.
pub struct EventHubAdminClient {
    manager: Arc<dyn HubManager>,
    namespaces: RwLock<Vec<HubNamespace>>,
    closed: CloseState,
}

impl EventHubAdminClient {
    /// Connect and take the initial inventory of hub namespaces.
    pub async fn connect(namespace: &str, connector: &dyn HubManagerConnector) -> Result<Self, BoxError> {
        let manager = connector.connect(namespace).await?;
        let namespaces = manager.list_namespaces().await?;
        if namespaces.is_empty() {
            return Err(format!("no hub namespaces available to {namespace}").into());
        }
        debug!(count = namespaces.len(), "hub namespaces discovered");
        Ok(Self::new(manager, namespaces))
    }

    pub fn new(manager: Arc<dyn HubManager>, namespaces: Vec<HubNamespace>) -> Self {
        Self {
            manager,
            namespaces: RwLock::new(namespaces),
            closed: CloseState::default(),
        }
    }

    /// Claim a slot for `hub` in the namespace with the fewest hubs that
    /// still has room. The slot is held until [`Self::release`] gives it back.
    fn reserve(&self, hub: &str) -> Result<String, TopicError> {
        let mut namespaces = self.namespaces.write().unwrap_or_else(PoisonError::into_inner);
        if namespaces.iter().any(|ns| ns.hubs.iter().any(|h| h == hub)) {
            return Err(TopicError::AlreadyExists {
                topic: hub.to_string(),
            });
        }
        let ns = namespaces
            .iter_mut()
            .filter(|ns| ns.has_capacity())
            .min_by_key(|ns| ns.hubs.len())
            .ok_or_else(|| TopicError::unavailable(hub, "every hub namespace is at capacity"))?;
        ns.hubs.push(hub.to_string());
        Ok(ns.name.clone())
    }

    fn hosting_namespace(&self, hub: &str) -> Option<String> {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|ns| ns.hubs.iter().any(|h| h == hub))
            .map(|ns| ns.name.clone())
    }

    fn release(&self, namespace: &str, hub: &str) {
        let mut namespaces = self.namespaces.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(ns) = namespaces.iter_mut().find(|ns| ns.name == namespace) {
            ns.hubs.retain(|h| h != hub);
        }
    }
}

#[async_trait]
impl AdminClient for EventHubAdminClient {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn create_topic(
        &self,
        ctx: &AdminContext,
        name: &str,
        spec: &TopicSpec,
    ) -> Result<(), TopicError> {
        self.closed.ensure_open(BACKEND, name)?;
        spec.validate(name)?;
        if spec.num_partitions > MAX_HUB_PARTITIONS {
            return Err(TopicError::InvalidConfiguration {
                topic: name.to_string(),
                reason: format!(
                    "hubs support at most {MAX_HUB_PARTITIONS} partitions, got {}",
                    spec.num_partitions
                ),
            });
        }

        let namespace = self.reserve(name)?;
        let outcome = match ctx.guard(self.manager.create_hub(&namespace, name, spec)).await {
            Ok(outcome) => outcome,
            Err(reason) => {
                self.release(&namespace, name);
                return Err(TopicError::interrupted(name, reason));
            }
        };
        match outcome {
            Ok(()) => {
                info!(topic = name, hub_namespace = %namespace, "hub creation accepted");
                Ok(())
            }
            // a conflict means the hub exists remotely, so the slot stays taken
            Err(err @ HubError::Conflict(_)) => Err(err.into_topic_error(name)),
            Err(err) => {
                self.release(&namespace, name);
                Err(err.into_topic_error(name))
            }
        }
    }

    async fn delete_topic(&self, ctx: &AdminContext, name: &str) -> Result<(), TopicError> {
        self.closed.ensure_open(BACKEND, name)?;
        validate_topic_name(name)?;
        let namespace = self.hosting_namespace(name).ok_or_else(|| TopicError::NotFound {
            topic: name.to_string(),
        })?;

        let outcome = ctx
            .guard(self.manager.delete_hub(&namespace, name))
            .await
            .map_err(|reason| TopicError::interrupted(name, reason))?;
        match outcome {
            Ok(()) => {
                self.release(&namespace, name);
                info!(topic = name, hub_namespace = %namespace, "hub deletion accepted");
                Ok(())
            }
            Err(err) => {
                if matches!(err, HubError::NotFound(_)) {
                    self.release(&namespace, name);
                }
                Err(err.into_topic_error(name))
            }
        }
    }

    fn secret_name(&self, namespace: &str) -> String {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|ns| ns.name == namespace)
            .map(|ns| ns.secret_name.clone())
            .unwrap_or_default()
    }

    async fn close(&self) -> Result<(), CloseError> {
        if !self.closed.begin_close() {
            return Ok(());
        }
        self.manager.close().await.map_err(|err| CloseError {
            backend: BACKEND,
            reason: err.to_string(),
        })
    }
}
