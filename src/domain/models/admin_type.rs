use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend variant an admin client is built for.
///
/// Parsing never fails: an unrecognized value becomes [`AdminType::Unknown`],
/// which the factory always rejects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdminType {
    /// Native broker cluster reached over the Kafka wire protocol
    Kafka,
    /// Managed cloud event hub namespaces
    EventHub,
    /// Operator-provided sidecar speaking plain HTTP
    Custom,
    /// Unrecognized discriminator, kept verbatim for diagnostics
    Unknown(String),
}

impl AdminType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kafka => "kafka",
            Self::EventHub => "azure",
            Self::Custom => "custom",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "kafka" => Self::Kafka,
            "azure" | "eventhub" | "event_hub" => Self::EventHub,
            "custom" => Self::Custom,
            _ => Self::Unknown(s.to_string()),
        }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl Default for AdminType {
    fn default() -> Self {
        Self::Kafka
    }
}

impl From<String> for AdminType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AdminType> for String {
    fn from(value: AdminType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AdminType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
