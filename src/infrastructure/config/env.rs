//! Transport configuration from `KAFKA_*` environment variables, for
//! processes that run without an overlay resource.

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::models::{CredentialSource, ProtocolVersion, TransportConfig};

use super::merger::ConfigMerger;

/// Prefix shared by every bootstrap variable.
pub const ENV_PREFIX: &str = "KAFKA_";

/// Raw bootstrap variables, keyed by their name without the prefix.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BootstrapEnv {
    bootstrap_servers: String,
    net_sasl_enable: bool,
    net_sasl_user: String,
    net_sasl_password: String,
    net_sasl_type: String,
    net_tls_enable: bool,
    net_tls_cert: String,
    net_tls_key: String,
    net_tls_ca_cert: String,
}

/// Builds a [`TransportConfig`] from the process environment.
///
/// Recognized variables: `KAFKA_BOOTSTRAP_SERVERS` (required),
/// `KAFKA_NET_SASL_{ENABLE,USER,PASSWORD,TYPE}` and
/// `KAFKA_NET_TLS_{ENABLE,CERT,KEY,CA_CERT}`. The protocol version is pinned
/// to 2.0.0; everything else comes from the merger's defaults.
pub struct EnvBootstrap;

impl EnvBootstrap {
    pub fn load(merger: &ConfigMerger) -> ConfigResult<TransportConfig> {
        let vars = Env::prefixed(ENV_PREFIX)
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value))
            .collect();
        Self::load_from(merger, vars)
    }

    /// Same as [`EnvBootstrap::load`] over raw variables keyed by their
    /// lowercased name without the prefix (`net_sasl_user`).
    ///
    /// Values reach the string fields exactly as given; only the `*_ENABLE`
    /// flags are interpreted (`true`, `1`, `yes`, `on` and their negations).
    pub fn load_from(
        merger: &ConfigMerger,
        vars: BTreeMap<String, String>,
    ) -> ConfigResult<TransportConfig> {
        let env: BootstrapEnv = Figment::from(Serialized::defaults(vars))
            .extract_lossy()
            .map_err(|err| {
                let var = format!("{ENV_PREFIX}{}", err.path.join("_").to_uppercase());
                ConfigError::Environment(format!("{var}: {}", err.kind))
            })?;

        let servers: Vec<String> = env
            .bootstrap_servers
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if servers.is_empty() {
            return Err(ConfigError::Environment(format!(
                "{ENV_PREFIX}BOOTSTRAP_SERVERS must name at least one broker"
            )));
        }

        let mut settings = merger.defaults().transport().clone();
        settings.version = ProtocolVersion::V2_0_0.to_string();
        settings.bootstrap_servers = servers;

        let sasl = &mut settings.net.sasl;
        sasl.enable = env.net_sasl_enable;
        sasl.user = CredentialSource::literal(env.net_sasl_user);
        sasl.password = CredentialSource::literal(env.net_sasl_password);
        if !env.net_sasl_type.trim().is_empty() {
            sasl.mechanism = env.net_sasl_type;
        }

        let tls = &mut settings.net.tls;
        tls.enable = env.net_tls_enable;
        tls.cert = CredentialSource::literal(env.net_tls_cert);
        tls.key = CredentialSource::literal(env.net_tls_key);
        tls.ca_cert = CredentialSource::literal(env.net_tls_ca_cert);

        debug!(
            servers = settings.bootstrap_servers.len(),
            sasl = settings.net.sasl.enable,
            tls = settings.net.tls.enable,
            "transport configuration read from environment"
        );
        merger.finalize_transport(settings, "")
    }
}
