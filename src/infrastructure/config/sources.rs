//! Overlay sources.
//!
//! `DirectoryOverlaySource` reads a resource projected onto disk the way a
//! mounted config map is: `<root>/<namespace>/<name>/<payload key>`, one file
//! per payload. Dotfiles (including the `..data` bookkeeping links) are
//! skipped.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::errors::ConfigError;
use crate::domain::models::ConfigResource;
use crate::domain::ports::OverlaySource;

/// Overlay source over a mounted directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryOverlaySource {
    root: PathBuf,
}

impl DirectoryOverlaySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl OverlaySource for DirectoryOverlaySource {
    async fn fetch(&self, namespace: &str, name: &str) -> Result<Option<ConfigResource>, ConfigError> {
        let dir = self.root.join(namespace).join(name);
        let resource_name = format!("{namespace}/{name}");
        let read_error = |source: std::io::Error| ConfigError::SourceRead {
            resource: resource_name.clone(),
            source,
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %dir.display(), "overlay directory not found");
                return Ok(None);
            }
            Err(err) => return Err(read_error(err)),
        };

        let mut data = BTreeMap::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let Some(key) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if key.starts_with('.') {
                continue;
            }
            // follows symlinks, so projected files resolve to their targets
            let metadata = fs::metadata(entry.path()).await.map_err(read_error)?;
            if !metadata.is_file() {
                continue;
            }
            let payload = fs::read_to_string(entry.path()).await.map_err(read_error)?;
            data.insert(key, payload);
        }

        let mut resource = ConfigResource::new(namespace, name);
        if !data.is_empty() {
            resource.data = Some(data);
        }
        Ok(Some(resource))
    }
}

/// Overlay source over resources held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticOverlaySource {
    resources: HashMap<(String, String), ConfigResource>,
}

impl StaticOverlaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource: ConfigResource) -> Self {
        self.resources
            .insert((resource.namespace.clone(), resource.name.clone()), resource);
        self
    }
}

#[async_trait]
impl OverlaySource for StaticOverlaySource {
    async fn fetch(&self, namespace: &str, name: &str) -> Result<Option<ConfigResource>, ConfigError> {
        Ok(self
            .resources
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{APP_SETTINGS_KEY, CONFIG_RESOURCE_NAME, TRANSPORT_SETTINGS_KEY};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_directory_source_reads_payload_files() {
        let dir = TempDir::new().unwrap();
        let resource_dir = dir.path().join("eventing").join(CONFIG_RESOURCE_NAME);
        std::fs::create_dir_all(resource_dir.join("..2024_01_01")).unwrap();
        std::fs::write(resource_dir.join(TRANSPORT_SETTINGS_KEY), "Version: 2.0.0").unwrap();
        std::fs::write(resource_dir.join(APP_SETTINGS_KEY), "kafka: {}").unwrap();
        std::fs::write(resource_dir.join(".hidden"), "ignored").unwrap();

        let source = DirectoryOverlaySource::new(dir.path());
        let resource = source
            .fetch("eventing", CONFIG_RESOURCE_NAME)
            .await
            .unwrap()
            .expect("resource should exist");

        assert_eq!(resource.namespace, "eventing");
        assert_eq!(resource.payload(TRANSPORT_SETTINGS_KEY), Some("Version: 2.0.0"));
        assert_eq!(resource.payload(APP_SETTINGS_KEY), Some("kafka: {}"));
        assert_eq!(resource.data.as_ref().map(BTreeMap::len), Some(2));
    }

    #[tokio::test]
    async fn test_directory_source_missing_and_empty() {
        let dir = TempDir::new().unwrap();
        let source = DirectoryOverlaySource::new(dir.path());
        assert!(source.fetch("eventing", CONFIG_RESOURCE_NAME).await.unwrap().is_none());

        std::fs::create_dir_all(dir.path().join("eventing").join(CONFIG_RESOURCE_NAME)).unwrap();
        let resource = source.fetch("eventing", CONFIG_RESOURCE_NAME).await.unwrap().unwrap();
        assert!(!resource.has_data());
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticOverlaySource::new()
            .with_resource(ConfigResource::new("ns", CONFIG_RESOURCE_NAME).with_payload("transport", ""));
        assert!(source.fetch("ns", CONFIG_RESOURCE_NAME).await.unwrap().is_some());
        assert!(source.fetch("other", CONFIG_RESOURCE_NAME).await.unwrap().is_none());
    }
}
