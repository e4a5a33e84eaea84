//! Mock admin client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{CloseError, TopicError};
use crate::domain::models::{AdminContext, TopicSpec};
use crate::domain::ports::AdminClient;

use super::CloseState;

/// One recorded call against a [`MockAdminClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Create { name: String, spec: TopicSpec },
    Delete { name: String },
    Close,
}

/// Records calls and replays scripted failures per topic.
///
/// Clones share state, so a test can keep a handle after boxing one copy.
#[derive(Clone, Default)]
pub struct MockAdminClient {
    calls: Arc<RwLock<Vec<MockCall>>>,
    failures: Arc<RwLock<HashMap<String, TopicError>>>,
    secret_name: String,
    closed: Arc<CloseState>,
}

impl MockAdminClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret_name(mut self, secret_name: impl Into<String>) -> Self {
        self.secret_name = secret_name.into();
        self
    }

    /// Make every operation on `topic` fail with `error`.
    pub async fn fail_topic(&self, topic: impl Into<String>, error: TopicError) {
        self.failures.write().await.insert(topic.into(), error);
    }

    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    pub async fn created_topics(&self) -> Vec<String> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                MockCall::Create { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    async fn outcome(&self, topic: &str) -> Result<(), TopicError> {
        self.closed.ensure_open("mock", topic)?;
        match self.failures.read().await.get(topic) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdminClient for MockAdminClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_topic(
        &self,
        _ctx: &AdminContext,
        name: &str,
        spec: &TopicSpec,
    ) -> Result<(), TopicError> {
        self.calls.write().await.push(MockCall::Create {
            name: name.to_string(),
            spec: spec.clone(),
        });
        self.outcome(name).await
    }

    async fn delete_topic(&self, _ctx: &AdminContext, name: &str) -> Result<(), TopicError> {
        self.calls.write().await.push(MockCall::Delete {
            name: name.to_string(),
        });
        self.outcome(name).await
    }

    fn secret_name(&self, _namespace: &str) -> String {
        self.secret_name.clone()
    }

    async fn close(&self) -> Result<(), CloseError> {
        self.calls.write().await.push(MockCall::Close);
        self.closed.begin_close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_records_calls_and_replays_failures() {
        let mock = MockAdminClient::new().with_secret_name("kafka-cluster");
        mock.fail_topic("bad", TopicError::NotFound { topic: "bad".into() })
            .await;
        let client: Box<dyn AdminClient> = Box::new(mock.clone());
        let ctx = AdminContext::new("ns");
        let spec = TopicSpec::new(1, 1, Duration::ZERO);

        client.create_topic(&ctx, "good", &spec).await.unwrap();
        assert!(client.delete_topic(&ctx, "bad").await.is_err());
        client.close().await.unwrap();

        assert_eq!(mock.created_topics().await, vec!["good"]);
        assert_eq!(mock.calls().await.len(), 3);
        assert_eq!(client.secret_name("ns"), "kafka-cluster");
        assert!(client.create_topic(&ctx, "good", &spec).await.is_err());
    }
}
