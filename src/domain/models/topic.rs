use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::config::TopicDefaults;
use crate::domain::errors::TopicError;

/// Config entry carrying the topic retention window.
pub const RETENTION_MS_CONFIG: &str = "retention.ms";

/// Longest topic name a broker accepts.
pub const MAX_TOPIC_NAME_LEN: usize = 249;

/// Check `name` against broker naming rules: 1 to 249 characters drawn from
/// `[a-zA-Z0-9._-]`, and neither `.` nor `..`.
///
/// Backends place the name in request paths, so every create and delete
/// goes through this first.
pub fn validate_topic_name(name: &str) -> Result<(), TopicError> {
    let reason = if name.is_empty() {
        "topic name must not be empty".to_string()
    } else if name == "." || name == ".." {
        format!("'{name}' is not a legal topic name")
    } else if name.len() > MAX_TOPIC_NAME_LEN {
        format!(
            "topic name is {} characters long, at most {MAX_TOPIC_NAME_LEN} allowed",
            name.len()
        )
    } else if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        format!("illegal character {c:?} in topic name")
    } else {
        return Ok(());
    };
    Err(TopicError::InvalidConfiguration {
        topic: name.to_string(),
        reason,
    })
}

/// Requested shape of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSpec {
    pub num_partitions: i32,
    pub replication_factor: i16,
    pub retention: Duration,
    /// Extra backend-specific entries, sent alongside `retention.ms`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config_entries: BTreeMap<String, String>,
}

impl TopicSpec {
    pub const fn new(num_partitions: i32, replication_factor: i16, retention: Duration) -> Self {
        Self {
            num_partitions,
            replication_factor,
            retention,
            config_entries: BTreeMap::new(),
        }
    }

    pub fn from_defaults(defaults: &TopicDefaults) -> Self {
        Self::new(
            defaults.default_num_partitions,
            defaults.default_replication_factor,
            defaults.retention(),
        )
    }

    pub fn with_partitions(mut self, num_partitions: i32) -> Self {
        self.num_partitions = num_partitions;
        self
    }

    pub fn with_replication_factor(mut self, replication_factor: i16) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_entries.insert(key.into(), value.into());
        self
    }

    pub fn retention_ms(&self) -> i64 {
        i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX)
    }

    /// All config entries including the retention window.
    pub fn effective_config(&self) -> BTreeMap<String, String> {
        let mut entries = self.config_entries.clone();
        entries.insert(RETENTION_MS_CONFIG.to_string(), self.retention_ms().to_string());
        entries
    }

    /// Reject shapes no backend could accept before any I/O happens.
    pub fn validate(&self, topic: &str) -> Result<(), TopicError> {
        let invalid = |reason: String| TopicError::InvalidConfiguration {
            topic: topic.to_string(),
            reason,
        };
        validate_topic_name(topic)?;
        if self.num_partitions <= 0 {
            return Err(invalid(format!(
                "partition count must be positive, got {}",
                self.num_partitions
            )));
        }
        if self.replication_factor < 1 {
            return Err(invalid(format!(
                "replication factor must be at least 1, got {}",
                self.replication_factor
            )));
        }
        Ok(())
    }
}
