//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use topic_admin::domain::models::{
    ConfigResource, APP_SETTINGS_KEY, CONFIG_RESOURCE_NAME, TRANSPORT_SETTINGS_KEY,
};
use topic_admin::infrastructure::config::{ConfigMerger, DefaultsRegistry};
use topic_admin::infrastructure::credentials::StaticCredentialResolver;

/// Namespace used by fixtures.
#[allow(dead_code)]
pub const NAMESPACE: &str = "eventing";

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Merger over the compiled-in defaults with one `kafka-cluster` secret.
#[allow(dead_code)]
pub fn merger() -> ConfigMerger {
    ConfigMerger::new(
        DefaultsRegistry::default(),
        Arc::new(StaticCredentialResolver::new().with_secret(
            NAMESPACE,
            "kafka-cluster",
            [("username", "admin"), ("password", "s3cret")],
        )),
    )
}

/// `config-kafka` resource carrying both payloads.
#[allow(dead_code)]
pub fn overlay(transport: &str, application: &str) -> ConfigResource {
    ConfigResource::new(NAMESPACE, CONFIG_RESOURCE_NAME)
        .with_payload(TRANSPORT_SETTINGS_KEY, transport)
        .with_payload(APP_SETTINGS_KEY, application)
}

/// Write `overlay` into `root` using the directory layout the CLI reads.
#[allow(dead_code)]
pub fn write_overlay(root: &Path, transport: &str, application: &str) {
    let dir = root.join(NAMESPACE).join(CONFIG_RESOURCE_NAME);
    std::fs::create_dir_all(&dir).expect("Failed to create overlay dir");
    std::fs::write(dir.join(TRANSPORT_SETTINGS_KEY), transport).expect("Failed to write transport");
    std::fs::write(dir.join(APP_SETTINGS_KEY), application).expect("Failed to write application");
}
