//! Implementation of the `topic-admin topic` commands.

use anyhow::{Context, Result};
use backoff::ExponentialBackoffBuilder;
use clap::{Args, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapters::admin::{BackendRegistry, BackendWiring, RestProxyConnector, DEFAULT_SIDECAR_URL};
use crate::cli::output::{output, CommandOutput};
use crate::cli::ConfigSourceArgs;
use crate::domain::errors::TopicError;
use crate::domain::models::{AdminContext, TopicSpec};
use crate::domain::ports::AdminClient;
use crate::infrastructure::config::MergedConfig;
use crate::services::AdminClientFactory;

#[derive(Args, Debug)]
pub struct TopicArgs {
    #[command(subcommand)]
    pub command: TopicCommands,
}

#[derive(Subcommand, Debug)]
pub enum TopicCommands {
    /// Create a topic, sized from the configured defaults unless overridden
    Create(CreateArgs),

    /// Delete a topic
    Delete(DeleteArgs),
}

/// Backend endpoints and per-command limits shared by topic commands.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    #[command(flatten)]
    pub source: ConfigSourceArgs,

    /// REST proxy fronting the broker cluster
    #[arg(long, env = "KAFKA_REST_PROXY_URL")]
    pub rest_proxy_url: Option<String>,

    /// Sidecar serving the custom admin backend
    #[arg(long, env = "ADMIN_SIDECAR_URL", default_value = DEFAULT_SIDECAR_URL)]
    pub sidecar_url: String,

    /// Overall deadline for the command (e.g. 30s, 2m)
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Topic name
    pub name: String,

    /// Partition count (defaults to kafka.topic.defaultNumPartitions)
    #[arg(long)]
    pub partitions: Option<i32>,

    /// Replication factor (defaults to kafka.topic.defaultReplicationFactor)
    #[arg(long)]
    pub replication_factor: Option<i16>,

    /// Retention in milliseconds (defaults to kafka.topic.defaultRetentionMillis)
    #[arg(long)]
    pub retention_ms: Option<u64>,

    /// Extra topic config entries as key=value
    #[arg(long = "config", value_parser = parse_config_entry)]
    pub config_entries: Vec<(String, String)>,

    /// Retries on transient backend failures
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Topic name
    pub name: String,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Debug, serde::Serialize)]
pub struct TopicOutput {
    pub success: bool,
    pub action: &'static str,
    pub topic: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<TopicSpec>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_name: String,
}

impl CommandOutput for TopicOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Topic '{}' {} via {} backend", self.topic, self.action, self.backend)];
        if let Some(spec) = &self.spec {
            lines.push(format!("  Partitions:         {}", spec.num_partitions));
            lines.push(format!("  Replication factor: {}", spec.replication_factor));
            lines.push(format!("  Retention (ms):     {}", spec.retention_ms()));
        }
        if self.attempts > 1 {
            lines.push(format!("  Attempts:           {}", self.attempts));
        }
        if !self.secret_name.is_empty() {
            lines.push(format!("  Credentials secret: {}", self.secret_name));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn parse_config_entry(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// Wire the production registry from command-line endpoints.
pub fn registry(backend: &BackendArgs) -> BackendRegistry {
    let mut wiring = BackendWiring::default().with_sidecar_url(backend.sidecar_url.clone());
    if let Some(url) = &backend.rest_proxy_url {
        wiring = wiring.with_cluster_connector(Arc::new(RestProxyConnector::new(url.clone())));
    }
    BackendRegistry::production(wiring)
}

/// Context bounded by `--timeout` and cancelled on Ctrl-C.
fn command_context(backend: &BackendArgs) -> AdminContext {
    let ctx = AdminContext::new(backend.source.namespace.clone()).with_timeout(backend.timeout);
    let token = ctx.cancellation().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    ctx
}

/// Create `name`, retrying with exponential backoff while the backend
/// reports a retriable failure. Returns the number of attempts made.
pub async fn create_with_retry(
    client: &dyn AdminClient,
    ctx: &AdminContext,
    name: &str,
    spec: &TopicSpec,
    retries: u32,
) -> Result<u32, TopicError> {
    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(250))
        .with_max_interval(Duration::from_secs(5))
        .with_max_elapsed_time(None)
        .build();

    let mut attempt = 0u32;
    backoff::future::retry_notify(
        policy,
        || {
            attempt += 1;
            let current = attempt;
            async move {
                match client.create_topic(ctx, name, spec).await {
                    Ok(()) => Ok(current),
                    Err(err) if err.is_retriable() && current <= retries => {
                        Err(backoff::Error::transient(err))
                    }
                    Err(err) => Err(backoff::Error::permanent(err)),
                }
            }
        },
        |err: TopicError, wait: Duration| {
            warn!(topic = name, error = %err, retry_in = ?wait, "transient failure creating topic");
        },
    )
    .await
}

/// A connected client plus what the command reports about it.
struct Session {
    ctx: AdminContext,
    client: Box<dyn AdminClient>,
    backend: String,
    secret_name: String,
}

async fn connect(backend: &BackendArgs, merged: &MergedConfig) -> Result<Session> {
    let ctx = command_context(backend);
    let factory = AdminClientFactory::new(registry(backend));
    let client = factory
        .create(&ctx, &merged.transport, &merged.app)
        .await
        .context("Failed to create admin client")?;
    let secret_name = client.secret_name(ctx.namespace());
    Ok(Session {
        ctx,
        client,
        backend: merged.app.kafka.admin_type.to_string(),
        secret_name,
    })
}

async fn release(client: &dyn AdminClient) {
    if let Err(err) = client.close().await {
        warn!(error = %err, "failed to close admin client");
    }
}

pub async fn execute(args: TopicArgs, json_mode: bool) -> Result<()> {
    match args.command {
        TopicCommands::Create(create) => {
            let merged = create.backend.source.load().await?;
            let mut spec = TopicSpec::from_defaults(&merged.app.kafka.topic);
            if let Some(partitions) = create.partitions {
                spec = spec.with_partitions(partitions);
            }
            if let Some(replication_factor) = create.replication_factor {
                spec = spec.with_replication_factor(replication_factor);
            }
            if let Some(retention_ms) = create.retention_ms {
                spec = spec.with_retention(Duration::from_millis(retention_ms));
            }
            for (key, value) in create.config_entries {
                spec = spec.with_config(key, value);
            }

            let session = connect(&create.backend, &merged).await?;
            let result = create_with_retry(
                session.client.as_ref(),
                &session.ctx,
                &create.name,
                &spec,
                create.retries,
            )
            .await;
            release(session.client.as_ref()).await;
            let attempts = result.with_context(|| format!("Failed to create topic '{}'", create.name))?;
            info!(topic = %create.name, backend = %session.backend, attempts, "topic created");

            output(
                &TopicOutput {
                    success: true,
                    action: "created",
                    topic: create.name,
                    backend: session.backend,
                    spec: Some(spec),
                    attempts,
                    secret_name: session.secret_name,
                },
                json_mode,
            );
        }
        TopicCommands::Delete(delete) => {
            let merged = delete.backend.source.load().await?;
            let session = connect(&delete.backend, &merged).await?;
            let result = session.client.delete_topic(&session.ctx, &delete.name).await;
            release(session.client.as_ref()).await;
            result.with_context(|| format!("Failed to delete topic '{}'", delete.name))?;
            info!(topic = %delete.name, backend = %session.backend, "topic deleted");

            output(
                &TopicOutput {
                    success: true,
                    action: "deleted",
                    topic: delete.name,
                    backend: session.backend,
                    spec: None,
                    attempts: 1,
                    secret_name: session.secret_name,
                },
                json_mode,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::admin::{MockAdminClient, MockCall};

    fn spec() -> TopicSpec {
        TopicSpec::new(1, 1, Duration::from_secs(60))
    }

    #[test]
    fn test_parse_config_entry() {
        assert_eq!(
            parse_config_entry("cleanup.policy=compact").unwrap(),
            ("cleanup.policy".to_string(), "compact".to_string())
        );
        assert_eq!(parse_config_entry("a=b=c").unwrap().1, "b=c");
        assert!(parse_config_entry("novalue").is_err());
        assert!(parse_config_entry("=x").is_err());
    }

    #[tokio::test]
    async fn test_create_succeeds_first_attempt() {
        let mock = MockAdminClient::new();
        let attempts = create_with_retry(&mock, &AdminContext::new("ns"), "orders", &spec(), 3)
            .await
            .unwrap();
        assert_eq!(attempts, 1);
        assert_eq!(mock.created_topics().await, vec!["orders"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retriable_failure_exhausts_retries() {
        let mock = MockAdminClient::new();
        mock.fail_topic("orders", TopicError::unavailable("orders", "broker down"))
            .await;
        let err = create_with_retry(&mock, &AdminContext::new("ns"), "orders", &spec(), 2)
            .await
            .unwrap_err();
        assert!(err.is_retriable());
        assert_eq!(mock.created_topics().await.len(), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let mock = MockAdminClient::new();
        mock.fail_topic("orders", TopicError::AlreadyExists { topic: "orders".into() })
            .await;
        let err = create_with_retry(&mock, &AdminContext::new("ns"), "orders", &spec(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, TopicError::AlreadyExists { .. }));
        assert_eq!(mock.calls().await, vec![MockCall::Create { name: "orders".into(), spec: spec() }]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_client_is_not_retried() {
        let mock = MockAdminClient::new();
        mock.close().await.unwrap();
        let err = create_with_retry(&mock, &AdminContext::new("ns"), "orders", &spec(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, TopicError::Closed { .. }));
        assert_eq!(mock.created_topics().await.len(), 1);
    }

    #[test]
    fn test_topic_output_human() {
        let out = TopicOutput {
            success: true,
            action: "created",
            topic: "orders".into(),
            backend: "kafka".into(),
            spec: Some(spec()),
            attempts: 2,
            secret_name: "kafka-cluster".into(),
        };
        let human = out.to_human();
        assert!(human.contains("Topic 'orders' created via kafka backend"));
        assert!(human.contains("Retention (ms):     60000"));
        assert!(human.contains("Attempts:           2"));
        assert_eq!(out.to_json()["secret_name"], "kafka-cluster");
    }
}
