use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed name of the configuration resource carrying the overlay.
pub const CONFIG_RESOURCE_NAME: &str = "config-kafka";

/// Payload key holding the transport settings document.
pub const TRANSPORT_SETTINGS_KEY: &str = "transport";

/// Payload key holding the application settings document.
pub const APP_SETTINGS_KEY: &str = "application";

/// A named configuration resource as delivered by an overlay source.
///
/// `data` maps payload keys to structured-text (YAML) documents. A resource
/// whose `data` is `None` or empty carries no overlay at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResource {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
}

impl ConfigResource {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            data: None,
        }
    }

    /// Add a payload entry, creating the data map if needed.
    pub fn with_payload(mut self, key: impl Into<String>, payload: impl Into<String>) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), payload.into());
        self
    }

    /// `namespace/name`, used in diagnostics.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty())
    }

    pub fn payload(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key).map(String::as_str)
    }
}

/// Namespace-qualified name of a secret resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretName {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl SecretName {
    pub fn is_set(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Fully qualified pointer to one field of a secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecretKeyRef {
    pub namespace: String,
    pub name: String,
    pub key: String,
}

impl fmt::Display for SecretKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}[{}]", self.namespace, self.name, self.key)
    }
}

/// Secret field reference as written in an overlay; name and namespace fall
/// back to the transport-level default secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretKeySelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub key: String,
}

/// Where a piece of credential material comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialSource {
    Reference {
        #[serde(rename = "SecretKeyRef")]
        secret_key_ref: SecretKeySelector,
    },
    Literal(String),
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl CredentialSource {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn secret_key(key: impl Into<String>) -> Self {
        Self::Reference {
            secret_key_ref: SecretKeySelector {
                name: None,
                namespace: None,
                key: key.into(),
            },
        }
    }
}
