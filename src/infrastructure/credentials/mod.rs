//! Credential resolvers backing secret references in transport settings.
//!
//! - `StaticCredentialResolver`: in-memory secrets, for embedding and tests
//! - `MountedSecretResolver`: secrets projected as files under
//!   `<root>/<namespace>/<name>/<key>`

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::errors::BoxError;
use crate::domain::models::SecretKeyRef;
use crate::domain::ports::CredentialResolver;

/// Resolver over a fixed set of secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialResolver {
    secrets: HashMap<(String, String), BTreeMap<String, String>>,
}

impl StaticCredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a secret's fields; repeated calls for the same secret merge.
    pub fn with_secret<I, K, V>(mut self, namespace: &str, name: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.secrets
            .entry((namespace.to_string(), name.to_string()))
            .or_default()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

impl CredentialResolver for StaticCredentialResolver {
    fn resolve(&self, reference: &SecretKeyRef) -> Result<Option<String>, BoxError> {
        Ok(self
            .secrets
            .get(&(reference.namespace.clone(), reference.name.clone()))
            .and_then(|fields| fields.get(&reference.key))
            .cloned())
    }
}

/// Resolver reading secrets mounted as a directory tree.
#[derive(Debug, Clone)]
pub struct MountedSecretResolver {
    root: PathBuf,
}

impl MountedSecretResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, reference: &SecretKeyRef) -> Result<PathBuf, BoxError> {
        for segment in [&reference.namespace, &reference.name, &reference.key] {
            if !is_plain_segment(segment) {
                return Err(format!("invalid secret path segment '{segment}'").into());
            }
        }
        Ok(self
            .root
            .join(&reference.namespace)
            .join(&reference.name)
            .join(&reference.key))
    }
}

impl CredentialResolver for MountedSecretResolver {
    fn resolve(&self, reference: &SecretKeyRef) -> Result<Option<String>, BoxError> {
        let path = self.path_for(reference)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => {
                tracing::debug!(secret = %reference, "resolved mounted secret");
                Ok(Some(value))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("failed to read {}: {err}", path.display()).into()),
        }
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}
