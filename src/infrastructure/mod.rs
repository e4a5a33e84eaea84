//! Infrastructure layer module
//!
//! - Configuration loading (defaults, overlay sources, layered merge, env bootstrap)
//! - Credential resolution
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod logging;
