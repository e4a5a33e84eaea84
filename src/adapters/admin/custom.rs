//! Sidecar backend: topic administration delegated over plain HTTP/JSON to a
//! user-supplied process next to the controller.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::errors::{BoxError, CloseError, TopicError};
use crate::domain::models::{validate_topic_name, AdminContext, TopicSpec};
use crate::domain::ports::AdminClient;

use super::CloseState;

const BACKEND: &str = "custom";

/// Where the sidecar listens unless told otherwise.
pub const DEFAULT_SIDECAR_URL: &str = "http://localhost:8888";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTopicBody<'a> {
    name: &'a str,
    num_partitions: i32,
    replication_factor: i16,
    retention_millis: i64,
    config_entries: BTreeMap<String, String>,
}

/// Admin client speaking to an HTTP sidecar.
#[derive(Debug)]
pub struct CustomAdminClient {
    http: Client,
    base_url: String,
    namespace: String,
    closed: CloseState,
}

impl CustomAdminClient {
    pub fn new(base_url: impl Into<String>, namespace: impl Into<String>) -> Result<Self, BoxError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            namespace: namespace.into(),
            closed: CloseState::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, ctx: &AdminContext, topic: &str, request: RequestBuilder) -> Result<(), TopicError> {
        let response = ctx
            .guard(request.send())
            .await
            .map_err(|reason| TopicError::interrupted(topic, reason))?
            .map_err(|err| TopicError::unavailable(topic, format!("sidecar unreachable: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        let reason = if body.trim().is_empty() {
            format!("sidecar returned {status}")
        } else {
            format!("sidecar returned {status}: {}", body.trim())
        };
        debug!(topic, %status, "sidecar rejected request");
        Err(status_to_error(topic, status, reason))
    }
}

fn status_to_error(topic: &str, status: StatusCode, reason: String) -> TopicError {
    let topic_owned = topic.to_string();
    match status {
        StatusCode::CONFLICT => TopicError::AlreadyExists { topic: topic_owned },
        StatusCode::NOT_FOUND => TopicError::NotFound { topic: topic_owned },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => TopicError::InvalidConfiguration {
            topic: topic_owned,
            reason,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TopicError::Unauthorized {
            topic: topic_owned,
            reason,
        },
        _ => TopicError::unavailable(topic, reason),
    }
}

#[async_trait]
impl AdminClient for CustomAdminClient {
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

        let body = CreateTopicBody {
            name,
            num_partitions: spec.num_partitions,
            replication_factor: spec.replication_factor,
            retention_millis: spec.retention_ms(),
            config_entries: spec.effective_config(),
        };
        let request = self
            .http
            .post(format!("{}/topics", self.base_url))
            .json(&body);
        self.send(ctx, name, request).await?;

        info!(topic = name, namespace = %self.namespace, "sidecar accepted topic creation");
        Ok(())
    }

    async fn delete_topic(&self, ctx: &AdminContext, name: &str) -> Result<(), TopicError> {
        self.closed.ensure_open(BACKEND, name)?;
        validate_topic_name(name)?;

        let request = self.http.delete(format!("{}/topics/{name}", self.base_url));
        self.send(ctx, name, request).await?;

        info!(topic = name, namespace = %self.namespace, "sidecar accepted topic deletion");
        Ok(())
    }

    fn secret_name(&self, _namespace: &str) -> String {
        // the sidecar owns its own credentials
        String::new()
    }

    async fn close(&self) -> Result<(), CloseError> {
        self.closed.begin_close();
        Ok(())
    }
}
