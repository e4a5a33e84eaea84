//! Error taxonomy for configuration resolution, backend selection and topic
//! administration.

use thiserror::Error;

use crate::domain::models::AdminType;

/// Boxed error returned by backend constructors and wire collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while fetching and merging configuration.
///
/// Every variant is fatal to startup: there is no partial configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration resource {resource} not found")]
    SourceUnavailable { resource: String },

    #[error("failed to read configuration resource {resource}: {source}")]
    SourceRead {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration resource {resource} has no data")]
    EmptyOverlay { resource: String },

    #[error("configuration resource {resource} is missing payload key '{key}'")]
    MissingPayload { resource: String, key: String },

    #[error("malformed '{key}' payload: {reason}")]
    MalformedOverlay { key: String, reason: String },

    #[error("invalid value for {field}: {reason}")]
    FieldCoercion { field: String, reason: String },

    #[error("failed to resolve {field} from secret {reference}: {reason}")]
    CredentialResolution {
        field: String,
        reference: String,
        reason: String,
    },

    #[error("invalid bootstrap environment: {0}")]
    Environment(String),
}

impl ConfigError {
    pub(crate) fn coercion(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FieldCoercion {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Why an operation stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Errors raised by the admin client factory.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("unsupported admin backend type '{0}'")]
    UnsupportedBackend(String),

    #[error("failed to construct {backend} admin client: {source}")]
    BackendConstruction {
        backend: AdminType,
        #[source]
        source: BoxError,
    },

    #[error("construction of {backend} admin client interrupted: {reason}")]
    Interrupted {
        backend: AdminType,
        reason: Interrupted,
    },
}

/// Structured outcome of a failed topic operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    #[error("topic '{topic}' already exists")]
    AlreadyExists { topic: String },

    #[error("invalid configuration for topic '{topic}': {reason}")]
    InvalidConfiguration { topic: String, reason: String },

    #[error("not authorized to manage topic '{topic}': {reason}")]
    Unauthorized { topic: String, reason: String },

    #[error("cluster unavailable for topic '{topic}': {reason}")]
    Unavailable { topic: String, reason: String },

    #[error("topic '{topic}' not found")]
    NotFound { topic: String },

    #[error("operation on topic '{topic}' interrupted: {reason}")]
    Interrupted { topic: String, reason: Interrupted },

    #[error("{backend} admin client is closed; cannot manage topic '{topic}'")]
    Closed { topic: String, backend: String },
}

impl TopicError {
    /// Name of the topic the failed operation targeted.
    pub fn topic(&self) -> &str {
        match self {
            Self::AlreadyExists { topic }
            | Self::InvalidConfiguration { topic, .. }
            | Self::Unauthorized { topic, .. }
            | Self::Unavailable { topic, .. }
            | Self::NotFound { topic }
            | Self::Interrupted { topic, .. }
            | Self::Closed { topic, .. } => topic,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub(crate) fn unavailable(topic: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            topic: topic.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn interrupted(topic: &str, reason: Interrupted) -> Self {
        Self::Interrupted {
            topic: topic.to_string(),
            reason,
        }
    }
}

/// Failure while releasing an admin client's connections.
#[derive(Debug, Error)]
#[error("failed to close {backend} admin client: {reason}")]
pub struct CloseError {
    pub backend: &'static str,
    pub reason: String,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_retriable() {
        assert!(TopicError::unavailable("t", "broker down").is_retriable());
        assert!(!TopicError::NotFound { topic: "t".into() }.is_retriable());
        assert!(!TopicError::interrupted("t", Interrupted::Cancelled).is_retriable());
        assert!(!TopicError::Closed {
            topic: "t".into(),
            backend: "kafka".into()
        }
        .is_retriable());
    }

    #[test]
    fn test_coercion_message_names_field() {
        let err = ConfigError::coercion("kafka.topic.defaultNumPartitions", "must be > 0");
        assert_eq!(
            err.to_string(),
            "invalid value for kafka.topic.defaultNumPartitions: must be > 0"
        );
    }
}
