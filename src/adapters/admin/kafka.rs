//! Native broker backend.
//!
//! The broker wire protocol lives behind [`ClusterAdmin`]; this adapter owns
//! the capability contract: validation, context racing, error-code mapping and
//! idempotent close.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::errors::{BoxError, CloseError, TopicError};
use crate::domain::models::{validate_topic_name, AdminContext, SecretName, TopicSpec, TransportConfig};
use crate::domain::ports::AdminClient;

use super::registry::KafkaBackendArgs;
use super::CloseState;

const BACKEND: &str = "kafka";

/// Broker protocol error codes this adapter distinguishes.
pub mod codes {
    pub const UNKNOWN_TOPIC_OR_PARTITION: i16 = 3;
    pub const INVALID_TOPIC_EXCEPTION: i16 = 17;
    pub const TOPIC_AUTHORIZATION_FAILED: i16 = 29;
    pub const CLUSTER_AUTHORIZATION_FAILED: i16 = 31;
    pub const TOPIC_ALREADY_EXISTS: i16 = 36;
    pub const INVALID_PARTITIONS: i16 = 37;
    pub const INVALID_REPLICATION_FACTOR: i16 = 38;
    pub const INVALID_REPLICA_ASSIGNMENT: i16 = 39;
    pub const INVALID_CONFIG: i16 = 40;
    pub const INVALID_REQUEST: i16 = 42;
    pub const SASL_AUTHENTICATION_FAILED: i16 = 58;
}

/// Failure reported by a [`ClusterAdmin`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KafkaProtocolError {
    #[error("broker error code {code}: {message}")]
    Broker { code: i16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Wire-level topic administration against a broker cluster.
#[async_trait]
pub trait ClusterAdmin: Send + Sync {
    async fn create_topic(&self, name: &str, spec: &TopicSpec) -> Result<(), KafkaProtocolError>;

    async fn delete_topic(&self, name: &str) -> Result<(), KafkaProtocolError>;

    async fn close(&self) -> Result<(), BoxError>;
}

/// Opens [`ClusterAdmin`] sessions from transport settings.
#[async_trait]
pub trait ClusterAdminConnector: Send + Sync {
    async fn connect(
        &self,
        transport: &TransportConfig,
        client_id: &str,
    ) -> Result<Arc<dyn ClusterAdmin>, BoxError>;
}

/// Map a protocol failure on `topic` into the admin error taxonomy.
pub fn map_protocol_error(topic: &str, err: KafkaProtocolError) -> TopicError {
    let topic_owned = topic.to_string();
    match err {
        KafkaProtocolError::Broker { code, message } => match code {
            codes::TOPIC_ALREADY_EXISTS => TopicError::AlreadyExists { topic: topic_owned },
            codes::UNKNOWN_TOPIC_OR_PARTITION => TopicError::NotFound { topic: topic_owned },
            codes::INVALID_TOPIC_EXCEPTION
            | codes::INVALID_PARTITIONS
            | codes::INVALID_REPLICATION_FACTOR
            | codes::INVALID_REPLICA_ASSIGNMENT
            | codes::INVALID_CONFIG
            | codes::INVALID_REQUEST => TopicError::InvalidConfiguration {
                topic: topic_owned,
                reason: message,
            },
            codes::TOPIC_AUTHORIZATION_FAILED
            | codes::CLUSTER_AUTHORIZATION_FAILED
            | codes::SASL_AUTHENTICATION_FAILED => TopicError::Unauthorized {
                topic: topic_owned,
                reason: message,
            },
            _ => TopicError::unavailable(topic, format!("broker error code {code}: {message}")),
        },
        KafkaProtocolError::Transport(reason) => TopicError::unavailable(topic, reason),
    }
}

/// Admin client for native broker clusters.
pub struct KafkaAdminClient {
    admin: Arc<dyn ClusterAdmin>,
    credentials_secret: Option<SecretName>,
    closed: CloseState,
}

impl KafkaAdminClient {
    /// Open a session through `connector`.
    pub async fn connect(
        args: KafkaBackendArgs,
        connector: &dyn ClusterAdminConnector,
    ) -> Result<Self, BoxError> {
        if args.transport.bootstrap_servers.is_empty() {
            return Err("no bootstrap servers configured".into());
        }
        debug!(
            client_id = %args.client_id,
            namespace = %args.namespace,
            servers = ?args.transport.bootstrap_servers,
            "connecting cluster admin"
        );
        let admin = connector.connect(&args.transport, &args.client_id).await?;
        Ok(Self::new(admin, args.transport.credentials_secret))
    }

    pub fn new(admin: Arc<dyn ClusterAdmin>, credentials_secret: Option<SecretName>) -> Self {
        Self {
            admin,
            credentials_secret,
            closed: CloseState::default(),
        }
    }
}

#[async_trait]
impl AdminClient for KafkaAdminClient {
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

        ctx.guard(self.admin.create_topic(name, spec))
            .await
            .map_err(|reason| TopicError::interrupted(name, reason))?
            .map_err(|err| map_protocol_error(name, err))?;

        info!(
            topic = name,
            partitions = spec.num_partitions,
            replication_factor = spec.replication_factor,
            "topic creation accepted"
        );
        Ok(())
    }

    async fn delete_topic(&self, ctx: &AdminContext, name: &str) -> Result<(), TopicError> {
        self.closed.ensure_open(BACKEND, name)?;
        validate_topic_name(name)?;

        ctx.guard(self.admin.delete_topic(name))
            .await
            .map_err(|reason| TopicError::interrupted(name, reason))?
            .map_err(|err| map_protocol_error(name, err))?;

        info!(topic = name, "topic deletion accepted");
        Ok(())
    }

    fn secret_name(&self, namespace: &str) -> String {
        self.credentials_secret
            .as_ref()
            .filter(|secret| secret.namespace == namespace)
            .map(|secret| secret.name.clone())
            .unwrap_or_default()
    }

    async fn close(&self) -> Result<(), CloseError> {
        if !self.closed.begin_close() {
            return Ok(());
        }
        self.admin.close().await.map_err(|err| {
            warn!(error = %err, "cluster admin close failed");
            CloseError {
                backend: BACKEND,
                reason: err.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory cluster that replays one scripted result per call.
    #[derive(Default)]
    struct ScriptedCluster {
        outcome: Mutex<Option<KafkaProtocolError>>,
        hang: bool,
        closes: AtomicUsize,
    }

    #[async_trait]
    impl ClusterAdmin for ScriptedCluster {
        async fn create_topic(&self, _: &str, _: &TopicSpec) -> Result<(), KafkaProtocolError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            self.outcome.lock().unwrap().take().map_or(Ok(()), Err)
        }

        async fn delete_topic(&self, _: &str) -> Result<(), KafkaProtocolError> {
            self.outcome.lock().unwrap().take().map_or(Ok(()), Err)
        }

        async fn close(&self) -> Result<(), BoxError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn client_with(cluster: Arc<ScriptedCluster>) -> KafkaAdminClient {
        KafkaAdminClient::new(
            cluster,
            Some(SecretName {
                name: "kafka-cluster".into(),
                namespace: "eventing".into(),
            }),
        )
    }

    fn spec() -> TopicSpec {
        TopicSpec::new(4, 1, Duration::from_secs(60))
    }

    #[test]
    fn test_error_code_mapping() {
        let broker = |code| KafkaProtocolError::Broker {
            code,
            message: "m".into(),
        };
        assert!(matches!(map_protocol_error("t", broker(36)), TopicError::AlreadyExists { .. }));
        assert!(matches!(map_protocol_error("t", broker(3)), TopicError::NotFound { .. }));
        for code in [17, 37, 38, 39, 40, 42] {
            assert!(matches!(
                map_protocol_error("t", broker(code)),
                TopicError::InvalidConfiguration { .. }
            ));
        }
        for code in [29, 31, 58] {
            assert!(matches!(
                map_protocol_error("t", broker(code)),
                TopicError::Unauthorized { .. }
            ));
        }
        assert!(map_protocol_error("t", broker(7)).is_retriable());
        assert!(map_protocol_error("t", KafkaProtocolError::Transport("eof".into())).is_retriable());
    }

    #[tokio::test]
    async fn test_create_maps_already_exists() {
        let cluster = Arc::new(ScriptedCluster::default());
        *cluster.outcome.lock().unwrap() = Some(KafkaProtocolError::Broker {
            code: codes::TOPIC_ALREADY_EXISTS,
            message: "exists".into(),
        });
        let client = client_with(cluster);
        let ctx = AdminContext::new("eventing");

        let err = client.create_topic(&ctx, "orders", &spec()).await.unwrap_err();
        assert_eq!(err, TopicError::AlreadyExists { topic: "orders".into() });
        assert!(client.create_topic(&ctx, "orders", &spec()).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_spec_rejected_before_io() {
        let client = client_with(Arc::new(ScriptedCluster::default()));
        let ctx = AdminContext::new("eventing");
        let err = client
            .create_topic(&ctx, "orders", &spec().with_partitions(0))
            .await
            .unwrap_err();
        assert!(matches!(err, TopicError::InvalidConfiguration { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_respects_deadline() {
        let cluster = Arc::new(ScriptedCluster {
            hang: true,
            ..ScriptedCluster::default()
        });
        let client = client_with(cluster);
        let ctx = AdminContext::new("eventing").with_timeout(Duration::from_secs(1));

        let err = client.create_topic(&ctx, "orders", &spec()).await.unwrap_err();
        assert!(matches!(err, TopicError::Interrupted { .. }));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let cluster = Arc::new(ScriptedCluster::default());
        let client = Arc::new(client_with(cluster.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.close().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(cluster.closes.load(Ordering::SeqCst), 1);

        let ctx = AdminContext::new("eventing");
        let err = client.delete_topic(&ctx, "orders").await.unwrap_err();
        assert!(matches!(err, TopicError::Closed { .. }));
        assert!(!err.is_retriable());
    }

    #[tokio::test]
    async fn test_delete_rejects_illegal_name_before_io() {
        let cluster = Arc::new(ScriptedCluster::default());
        *cluster.outcome.lock().unwrap() = Some(KafkaProtocolError::Transport("unused".into()));
        let client = client_with(cluster.clone());

        let err = client
            .delete_topic(&AdminContext::new("eventing"), "../admin")
            .await
            .unwrap_err();
        assert!(matches!(err, TopicError::InvalidConfiguration { .. }));
        // the scripted outcome was never consumed
        assert!(cluster.outcome.lock().unwrap().is_some());
    }

    #[test]
    fn test_secret_name_matches_namespace() {
        let client = client_with(Arc::new(ScriptedCluster::default()));
        assert_eq!(client.secret_name("eventing"), "kafka-cluster");
        assert_eq!(client.secret_name("other"), "");
    }
}
