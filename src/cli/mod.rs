//! Command-line interface.
//!
//! Commands load configuration the same way a deployed process does: an
//! overlay directory (or the `KAFKA_*` environment) merged onto the
//! compiled-in defaults, with credentials from a mounted secrets directory.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::models::{DEFAULT_SYSTEM_NAMESPACE, SYSTEM_NAMESPACE_ENV};
use crate::domain::ports::CredentialResolver;
use crate::infrastructure::config::{
    ConfigLoader, ConfigMerger, DefaultsRegistry, DirectoryOverlaySource, EnvBootstrap,
    MergedConfig,
};
use crate::infrastructure::credentials::{MountedSecretResolver, StaticCredentialResolver};

/// Where configuration and credentials are read from.
#[derive(Args, Debug, Clone)]
pub struct ConfigSourceArgs {
    /// Directory holding `<namespace>/config-kafka/<payload-key>` files
    #[arg(long, env = "TOPIC_ADMIN_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Directory holding `<namespace>/<secret>/<key>` files
    #[arg(long, env = "TOPIC_ADMIN_SECRETS_DIR")]
    pub secrets_dir: Option<PathBuf>,

    /// Namespace the process is scoped to
    #[arg(long, env = SYSTEM_NAMESPACE_ENV, default_value = DEFAULT_SYSTEM_NAMESPACE)]
    pub namespace: String,

    /// Build transport settings from KAFKA_* variables instead of an overlay
    #[arg(long, conflicts_with = "config_dir")]
    pub from_env: bool,
}

impl ConfigSourceArgs {
    pub fn merger(&self) -> ConfigMerger {
        let resolver: Arc<dyn CredentialResolver> = match &self.secrets_dir {
            Some(dir) => Arc::new(MountedSecretResolver::new(dir)),
            None => Arc::new(StaticCredentialResolver::new()),
        };
        ConfigMerger::new(DefaultsRegistry::default(), resolver)
    }

    /// Resolve transport and application configuration.
    ///
    /// With `--from-env` the application settings are the defaults; otherwise
    /// `--config-dir` is required.
    pub async fn load(&self) -> Result<MergedConfig> {
        let merger = self.merger();
        if self.from_env {
            let transport =
                EnvBootstrap::load(&merger).context("Failed to load transport settings from environment")?;
            return Ok(MergedConfig {
                transport,
                app: merger.defaults().app().clone(),
            });
        }

        let dir = self
            .config_dir
            .as_ref()
            .context("No configuration source: pass --config-dir or --from-env")?;
        let source = DirectoryOverlaySource::new(dir);
        ConfigLoader::load(&source, &merger, &self.namespace)
            .await
            .with_context(|| format!("Failed to load configuration from {}", dir.display()))
    }
}

/// Report a command failure and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": chain.get(1..).unwrap_or_default(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{APP_SETTINGS_KEY, CONFIG_RESOURCE_NAME, TRANSPORT_SETTINGS_KEY};

    fn args(config_dir: Option<PathBuf>) -> ConfigSourceArgs {
        ConfigSourceArgs {
            config_dir,
            secrets_dir: None,
            namespace: "eventing".to_string(),
            from_env: false,
        }
    }

    #[tokio::test]
    async fn test_load_requires_a_source() {
        let err = args(None).load().await.unwrap_err();
        assert!(err.to_string().contains("--config-dir"));
    }

    #[tokio::test]
    async fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let resource = dir.path().join("eventing").join(CONFIG_RESOURCE_NAME);
        std::fs::create_dir_all(&resource).unwrap();
        std::fs::write(resource.join(TRANSPORT_SETTINGS_KEY), "BootstrapServers: [b:9092]\n").unwrap();
        std::fs::write(resource.join(APP_SETTINGS_KEY), "kafka:\n  adminType: custom\n").unwrap();

        let merged = args(Some(dir.path().to_path_buf())).load().await.unwrap();
        assert_eq!(merged.transport.bootstrap_servers, vec!["b:9092"]);
        assert_eq!(merged.app.kafka.admin_type.to_string(), "custom");
    }

    #[tokio::test]
    async fn test_missing_resource_is_reported_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = args(Some(dir.path().to_path_buf())).load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
        assert!(format!("{err:#}").contains(CONFIG_RESOURCE_NAME));
    }
}
