//! topic-admin - layered messaging-cluster configuration and topic administration
//!
//! Resolves a cluster's transport and application settings from compiled-in
//! defaults plus an operator-supplied overlay, then builds an admin client for
//! whichever backend the settings select.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): configuration models, error taxonomy, port traits
//! - **Service Layer** (`services`): the admin client factory
//! - **Adapters** (`adapters`): backend admin clients and the constructor registry
//! - **Infrastructure Layer** (`infrastructure`): config merge, credentials, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use topic_admin::{AdminClientFactory, AdminContext, BackendRegistry, BackendWiring};
//! use topic_admin::infrastructure::config::{ConfigLoader, ConfigMerger, DefaultsRegistry, DirectoryOverlaySource};
//! use topic_admin::infrastructure::credentials::MountedSecretResolver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = AdminContext::from_env();
//!     let merger = ConfigMerger::new(DefaultsRegistry::default(), Arc::new(MountedSecretResolver::new("/etc/secrets")));
//!     let merged = ConfigLoader::load(&DirectoryOverlaySource::new("/etc/config"), &merger, ctx.namespace()).await?;
//!     let factory = AdminClientFactory::new(BackendRegistry::production(BackendWiring::default()));
//!     let client = factory.create(&ctx, &merged.transport, &merged.app).await?;
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use adapters::admin::{BackendRegistry, BackendWiring, KafkaBackendArgs};
pub use domain::errors::{ConfigError, FactoryError, TopicError};
pub use domain::models::{AdminContext, AdminType, AppConfig, TopicSpec, TransportConfig};
pub use domain::ports::{AdminClient, CredentialResolver, OverlaySource};
pub use infrastructure::config::{ConfigLoader, ConfigMerger, MergedConfig};
pub use services::AdminClientFactory;
