//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::domain::models::TransportConfig;
use crate::infrastructure::config::{ConfigMerger, DefaultsRegistry};
use crate::infrastructure::credentials::StaticCredentialResolver;

pub fn merger() -> ConfigMerger {
    ConfigMerger::new(
        DefaultsRegistry::default(),
        Arc::new(StaticCredentialResolver::new()),
    )
}

/// Default transport with a single bootstrap server.
pub fn transport() -> TransportConfig {
    merger()
        .merge_transport("BootstrapServers: [localhost:9092]", "eventing")
        .expect("fixture transport merges")
}
