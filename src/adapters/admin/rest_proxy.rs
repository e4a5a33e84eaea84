//! `ClusterAdmin` over the Kafka REST proxy v3 API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::BoxError;
use crate::domain::models::{validate_topic_name, TopicSpec, TransportConfig};

use super::kafka::{codes, ClusterAdmin, ClusterAdminConnector, KafkaProtocolError};

/// REST proxy error code for a topic that already exists.
const REST_TOPIC_EXISTS: i64 = 40002;

/// Connects to a REST proxy fronting the cluster.
#[derive(Debug, Clone)]
pub struct RestProxyConnector {
    base_url: String,
}

impl RestProxyConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_client(transport: &TransportConfig, client_id: &str) -> Result<Client, BoxError> {
        let mut builder = Client::builder()
            .user_agent(client_id)
            .connect_timeout(transport.net.dial_timeout)
            .timeout(transport.admin_timeout.max(transport.net.read_timeout));

        let tls = &transport.net.tls;
        if tls.enabled {
            builder = builder
                .add_root_certificate(reqwest::Certificate::from_pem(tls.ca_cert.as_bytes())?)
                .identity(reqwest::Identity::from_pem(
                    format!("{}\n{}", tls.cert, tls.key).as_bytes(),
                )?);
        }
        if tls.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(builder.build()?)
    }
}

#[derive(Debug, Deserialize)]
struct ClusterList {
    data: Vec<ClusterEntry>,
}

#[derive(Debug, Deserialize)]
struct ClusterEntry {
    cluster_id: String,
}

#[derive(Debug, Deserialize)]
struct RestError {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct CreateTopicRequest<'a> {
    topic_name: &'a str,
    partitions_count: i32,
    replication_factor: i16,
    configs: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
struct ConfigEntry {
    name: String,
    value: String,
}

#[async_trait]
impl ClusterAdminConnector for RestProxyConnector {
    async fn connect(
        &self,
        transport: &TransportConfig,
        client_id: &str,
    ) -> Result<Arc<dyn ClusterAdmin>, BoxError> {
        let client = Self::build_client(transport, client_id)?;
        let sasl = &transport.net.sasl;
        let credentials = sasl
            .enabled
            .then(|| (sasl.user.clone(), sasl.password.clone()));

        let admin = RestProxyAdmin {
            client,
            base_url: self.base_url.clone(),
            cluster_id: String::new(),
            credentials,
        };
        let response = admin
            .authorized(admin.client.get(format!("{}/v3/clusters", admin.base_url)))
            .send()
            .await?
            .error_for_status()?;
        let clusters: ClusterList = response.json().await?;
        let cluster_id = clusters
            .data
            .into_iter()
            .next()
            .map(|c| c.cluster_id)
            .ok_or("REST proxy reported no clusters")?;

        debug!(base_url = %self.base_url, cluster_id = %cluster_id, "REST proxy connected");
        Ok(Arc::new(RestProxyAdmin { cluster_id, ..admin }))
    }
}

/// Session bound to one cluster behind the proxy.
struct RestProxyAdmin {
    client: Client,
    base_url: String,
    cluster_id: String,
    credentials: Option<(String, String)>,
}

impl RestProxyAdmin {
    fn topics_url(&self) -> String {
        format!("{}/v3/clusters/{}/topics", self.base_url, self.cluster_id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<(), KafkaProtocolError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| KafkaProtocolError::Transport(err.to_string()))?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::protocol_error(response).await)
    }

    async fn protocol_error(response: Response) -> KafkaProtocolError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: Option<RestError> = serde_json::from_str(&body).ok();
        let message = parsed
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        let rest_code = parsed.map_or(0, |e| e.error_code);

        let code = match status {
            _ if rest_code == REST_TOPIC_EXISTS => codes::TOPIC_ALREADY_EXISTS,
            StatusCode::CONFLICT => codes::TOPIC_ALREADY_EXISTS,
            StatusCode::NOT_FOUND => codes::UNKNOWN_TOPIC_OR_PARTITION,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => codes::TOPIC_AUTHORIZATION_FAILED,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => codes::INVALID_REQUEST,
            _ => return KafkaProtocolError::Transport(format!("HTTP {status}: {message}")),
        };
        KafkaProtocolError::Broker { code, message }
    }
}

#[async_trait]
impl ClusterAdmin for RestProxyAdmin {
    async fn create_topic(&self, name: &str, spec: &TopicSpec) -> Result<(), KafkaProtocolError> {
        let body = CreateTopicRequest {
            topic_name: name,
            partitions_count: spec.num_partitions,
            replication_factor: spec.replication_factor,
            configs: spec
                .effective_config()
                .into_iter()
                .map(|(name, value)| ConfigEntry { name, value })
                .collect(),
        };
        self.send(self.client.post(self.topics_url()).json(&body)).await
    }

    async fn delete_topic(&self, name: &str) -> Result<(), KafkaProtocolError> {
        validate_topic_name(name).map_err(|err| KafkaProtocolError::Broker {
            code: codes::INVALID_TOPIC_EXCEPTION,
            message: err.to_string(),
        })?;
        let url = format!("{}/{name}", self.topics_url());
        self.send(self.client.delete(url)).await
    }

    async fn close(&self) -> Result<(), BoxError> {
        // connections are pooled per client and dropped with it
        Ok(())
    }
}
