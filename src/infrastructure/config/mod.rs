//! Configuration resolution infrastructure
//!
//! Layered configuration using figment:
//! - Compiled-in defaults
//! - Operator overlay payloads (YAML) from an overlay source
//! - `KAFKA_*` environment bootstrap for overlay-less processes
//! - Coercion and validation into typed configs

pub mod defaults;
pub mod env;
pub mod loader;
pub mod merger;
pub mod sources;

pub use defaults::DefaultsRegistry;
pub use env::{EnvBootstrap, ENV_PREFIX};
pub use loader::ConfigLoader;
pub use merger::{ConfigMerger, MergedConfig};
pub use sources::{DirectoryOverlaySource, StaticOverlaySource};
