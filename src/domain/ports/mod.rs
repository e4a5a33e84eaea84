//! Port trait definitions (Hexagonal Architecture)
//!
//! - AdminClient: topic lifecycle against a cluster backend
//! - OverlaySource: where the configuration overlay comes from
//! - CredentialResolver: where secret material comes from

pub mod admin_client;
pub mod credential_resolver;
pub mod overlay_source;

pub use admin_client::AdminClient;
pub use credential_resolver::CredentialResolver;
pub use overlay_source::OverlaySource;
