//! Domain models: configuration documents, resolved configuration, topic
//! shapes and the ambient admin context.

pub mod admin_type;
pub mod config;
pub mod context;
pub mod duration;
pub mod overlay;
pub mod quantity;
pub mod topic;

pub use admin_type::AdminType;
pub use config::{
    AdminSettings, AppConfig, AutoCommitSettings, ConsumerSettings, KafkaSettings,
    MetadataSettings, NetConfig, NetSettings, OffsetsConfig, OffsetsSettings, ProtocolVersion,
    RoleSizing, SaslConfig, SaslMechanism, SaslSettings, TlsConfig, TlsSettings, TopicDefaults,
    TransportConfig, TransportSettings,
};
pub use context::{AdminContext, DEFAULT_SYSTEM_NAMESPACE, SYSTEM_NAMESPACE_ENV};
pub use overlay::{
    ConfigResource, CredentialSource, SecretKeyRef, SecretKeySelector, SecretName,
    APP_SETTINGS_KEY, CONFIG_RESOURCE_NAME, TRANSPORT_SETTINGS_KEY,
};
pub use quantity::{Quantity, QuantityError};
pub use topic::{validate_topic_name, TopicSpec, MAX_TOPIC_NAME_LEN, RETENTION_MS_CONFIG};
