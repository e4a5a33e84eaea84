use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::admin_type::AdminType;
use super::duration;
use super::overlay::{CredentialSource, SecretName};
use super::quantity::{self, Quantity};

// ---------------------------------------------------------------------------
// Transport settings document (overlay schema, PascalCase keys)
// ---------------------------------------------------------------------------

/// Transport settings as written in the overlay, credentials unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransportSettings {
    /// Protocol version, dotted (`2.0.0`)
    #[serde(deserialize_with = "deserialize_version_string")]
    pub version: String,

    #[serde(rename = "ClientID", deserialize_with = "deserialize_scalar_string")]
    pub client_id: String,

    /// Bootstrap endpoints; a comma-separated string is also accepted
    #[serde(deserialize_with = "deserialize_server_list")]
    pub bootstrap_servers: Vec<String>,

    pub net: NetSettings,
    pub metadata: MetadataSettings,
    pub admin: AdminSettings,
    pub consumer: ConsumerSettings,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            version: "2.0.0".to_string(),
            client_id: "topic-admin".to_string(),
            bootstrap_servers: vec![],
            net: NetSettings::default(),
            metadata: MetadataSettings::default(),
            admin: AdminSettings::default(),
            consumer: ConsumerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetSettings {
    #[serde(with = "duration")]
    pub dial_timeout: Duration,
    #[serde(with = "duration")]
    pub read_timeout: Duration,
    #[serde(with = "duration")]
    pub write_timeout: Duration,

    /// Default secret for credential references that omit name or namespace
    pub secret: SecretName,

    #[serde(rename = "TLS")]
    pub tls: TlsSettings,

    #[serde(rename = "SASL")]
    pub sasl: SaslSettings,
}

impl Default for NetSettings {
    fn default() -> Self {
        Self {
            dial_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            secret: SecretName::default(),
            tls: TlsSettings::default(),
            sasl: SaslSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TlsSettings {
    pub enable: bool,
    #[serde(rename = "CACert")]
    pub ca_cert: CredentialSource,
    pub cert: CredentialSource,
    pub key: CredentialSource,
    pub insecure_skip_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SaslSettings {
    pub enable: bool,
    pub mechanism: String,
    pub user: CredentialSource,
    pub password: CredentialSource,
}

impl Default for SaslSettings {
    fn default() -> Self {
        Self {
            enable: false,
            mechanism: SaslMechanism::Plain.as_str().to_string(),
            user: CredentialSource::default(),
            password: CredentialSource::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetadataSettings {
    #[serde(with = "duration")]
    pub refresh_frequency: Duration,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            refresh_frequency: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AdminSettings {
    #[serde(with = "duration")]
    pub timeout: Duration,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConsumerSettings {
    pub offsets: OffsetsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OffsetsSettings {
    pub auto_commit: AutoCommitSettings,
    #[serde(with = "duration")]
    pub retention: Duration,
}

impl Default for OffsetsSettings {
    fn default() -> Self {
        Self {
            auto_commit: AutoCommitSettings::default(),
            retention: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AutoCommitSettings {
    #[serde(with = "duration")]
    pub interval: Duration,
}

impl Default for AutoCommitSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Accept any scalar as text, so `ClientID: 42` still reads as a string.
pub(crate) fn deserialize_scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarVisitor { floats: true })
}

/// Like [`deserialize_scalar_string`], but an unquoted float is refused:
/// YAML reads `2.10` as `2.1`, which would name a different version.
fn deserialize_version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarVisitor { floats: false })
}

struct ScalarVisitor {
    floats: bool,
}

impl serde::de::Visitor<'_> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or scalar value")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
        if self.floats {
            Ok(format!("{v:?}"))
        } else {
            Err(E::custom("quote the version string"))
        }
    }
}

fn deserialize_server_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ServerList {
        List(Vec<String>),
        Joined(String),
    }

    let servers = match ServerList::deserialize(deserializer)? {
        ServerList::List(list) => list,
        ServerList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(servers
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

// ---------------------------------------------------------------------------
// Resolved transport configuration
// ---------------------------------------------------------------------------

/// Wire protocol version (`2.0.0`, `0.10.2.1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion([u16; 4]);

impl ProtocolVersion {
    pub const V2_0_0: Self = Self([2, 0, 0, 0]);

    pub const fn components(&self) -> [u16; 4] {
        self.0
    }
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(format!("'{s}' is not a dotted version with 2 to 4 components"));
        }
        let mut components = [0u16; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("'{s}' has a non-numeric component '{part}'"))?;
        }
        Ok(Self(components))
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, build] = self.0;
        if build == 0 {
            write!(f, "{major}.{minor}.{patch}")
        } else {
            write!(f, "{major}.{minor}.{patch}.{build}")
        }
    }
}

impl Serialize for ProtocolVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// SASL mechanisms accepted for admin connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaslMechanism {
    Plain,
    ScramSha256,
    ScramSha512,
}

impl SaslMechanism {
    pub const ALL: [Self; 3] = [Self::Plain, Self::ScramSha256, Self::ScramSha512];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::ScramSha512 => "SCRAM-SHA-512",
        }
    }
}

impl FromStr for SaslMechanism {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let allowed: Vec<_> = Self::ALL.iter().map(Self::as_str).collect();
                format!("unsupported SASL mechanism '{s}', expected one of {}", allowed.join(", "))
            })
    }
}

impl fmt::Display for SaslMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SaslMechanism {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Fully resolved wire/transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransportConfig {
    pub version: ProtocolVersion,
    pub client_id: String,
    pub bootstrap_servers: Vec<String>,
    pub net: NetConfig,
    #[serde(with = "duration")]
    pub metadata_refresh: Duration,
    #[serde(with = "duration")]
    pub admin_timeout: Duration,
    pub offsets: OffsetsConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_secret: Option<SecretName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetConfig {
    #[serde(with = "duration")]
    pub dial_timeout: Duration,
    #[serde(with = "duration")]
    pub read_timeout: Duration,
    #[serde(with = "duration")]
    pub write_timeout: Duration,
    pub tls: TlsConfig,
    pub sasl: SaslConfig,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct TlsConfig {
    pub enabled: bool,
    pub ca_cert: String,
    pub cert: String,
    pub key: String,
    pub insecure_skip_verify: bool,
}

impl fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConfig")
            .field("enabled", &self.enabled)
            .field("ca_cert", &redacted(&self.ca_cert))
            .field("cert", &redacted(&self.cert))
            .field("key", &redacted(&self.key))
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SaslConfig {
    pub enabled: bool,
    pub mechanism: SaslMechanism,
    pub user: String,
    pub password: String,
}

impl Default for SaslConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mechanism: SaslMechanism::Plain,
            user: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for SaslConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslConfig")
            .field("enabled", &self.enabled)
            .field("mechanism", &self.mechanism)
            .field("user", &self.user)
            .field("password", &redacted(&self.password))
            .finish()
    }
}

fn redacted(material: &str) -> &'static str {
    if material.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffsetsConfig {
    #[serde(with = "duration")]
    pub auto_commit_interval: Duration,
    #[serde(with = "duration")]
    pub retention: Duration,
}

// ---------------------------------------------------------------------------
// Application configuration (overlay schema and result, camelCase keys)
// ---------------------------------------------------------------------------

/// Application-level settings: topic defaults, per-role sizing, backend type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub receiver: RoleSizing,
    pub dispatcher: RoleSizing,
    pub kafka: KafkaSettings,
}

/// Resource sizing for one deployed role. `None` quantities are unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleSizing {
    #[serde(with = "quantity::optional")]
    pub cpu_request: Option<Quantity>,
    #[serde(with = "quantity::optional")]
    pub memory_request: Option<Quantity>,
    #[serde(with = "quantity::optional")]
    pub cpu_limit: Option<Quantity>,
    #[serde(with = "quantity::optional")]
    pub memory_limit: Option<Quantity>,
    pub replicas: u32,
}

impl Default for RoleSizing {
    fn default() -> Self {
        Self {
            cpu_request: Quantity::parse("100m").ok(),
            memory_request: Quantity::parse("50Mi").ok(),
            cpu_limit: None,
            memory_limit: None,
            replicas: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KafkaSettings {
    pub topic: TopicDefaults,
    pub admin_type: AdminType,
}

/// Sizing applied to topics created without explicit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicDefaults {
    pub default_num_partitions: i32,
    pub default_replication_factor: i16,
    pub default_retention_millis: i64,
}

impl Default for TopicDefaults {
    fn default() -> Self {
        Self {
            default_num_partitions: 4,
            default_replication_factor: 1,
            default_retention_millis: 604_800_000,
        }
    }
}

impl TopicDefaults {
    /// Default retention as a duration; negative values clamp to zero.
    pub fn retention(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.default_retention_millis).unwrap_or(0))
    }
}
