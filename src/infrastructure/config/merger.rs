//! Layered merge of compiled-in defaults with an operator overlay.
//!
//! Each payload is merged at leaf granularity with figment: defaults first,
//! then the overlay document. Keys absent from the overlay keep their default,
//! unrecognized keys are ignored. Coercion into semantic types happens here
//! and failures carry the dotted overlay path of the offending field.

use figment::providers::{Format, Serialized, Yaml};
use figment::Figment;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::models::{
    AppConfig, ConfigResource, CredentialSource, NetConfig, OffsetsConfig, ProtocolVersion,
    Quantity, RoleSizing, SaslConfig, SaslMechanism, SecretKeyRef, SecretName, TlsConfig,
    TransportConfig, TransportSettings, APP_SETTINGS_KEY, CONFIG_RESOURCE_NAME,
    TRANSPORT_SETTINGS_KEY,
};
use crate::domain::ports::CredentialResolver;

use super::defaults::DefaultsRegistry;

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedConfig {
    pub transport: TransportConfig,
    pub app: AppConfig,
}

/// Merges overlays onto a [`DefaultsRegistry`], resolving credential
/// references through a [`CredentialResolver`].
#[derive(Clone)]
pub struct ConfigMerger {
    defaults: DefaultsRegistry,
    resolver: Arc<dyn CredentialResolver>,
}

impl ConfigMerger {
    pub fn new(defaults: DefaultsRegistry, resolver: Arc<dyn CredentialResolver>) -> Self {
        Self { defaults, resolver }
    }

    pub const fn defaults(&self) -> &DefaultsRegistry {
        &self.defaults
    }

    /// Merge a configuration resource into transport and application config.
    ///
    /// A missing resource, a resource without data, and a resource lacking
    /// either payload key are all errors; nothing is returned on failure.
    #[instrument(skip_all, fields(resource = ?overlay.map(ConfigResource::qualified_name)))]
    pub fn merge(&self, overlay: Option<&ConfigResource>) -> ConfigResult<MergedConfig> {
        let resource = overlay.ok_or_else(|| ConfigError::SourceUnavailable {
            resource: CONFIG_RESOURCE_NAME.to_string(),
        })?;
        if !resource.has_data() {
            return Err(ConfigError::EmptyOverlay {
                resource: resource.qualified_name(),
            });
        }

        let transport_payload = required_payload(resource, TRANSPORT_SETTINGS_KEY)?;
        let app_payload = required_payload(resource, APP_SETTINGS_KEY)?;

        let transport = self.merge_transport(transport_payload, &resource.namespace)?;
        let app = self.merge_app(app_payload)?;
        Ok(MergedConfig { transport, app })
    }

    /// Merge one transport payload; `namespace` scopes credential references
    /// that name no namespace of their own.
    pub fn merge_transport(&self, payload: &str, namespace: &str) -> ConfigResult<TransportConfig> {
        let settings: TransportSettings =
            layered(self.defaults.transport(), TRANSPORT_SETTINGS_KEY, payload)?;
        self.finalize_transport(settings, namespace)
    }

    /// Merge one application payload.
    pub fn merge_app(&self, payload: &str) -> ConfigResult<AppConfig> {
        let app: AppConfig = layered(self.defaults.app(), APP_SETTINGS_KEY, payload)?;
        validate_app(&app)?;
        Ok(app)
    }

    /// Coerce a transport settings document into a [`TransportConfig`],
    /// resolving credentials of enabled TLS/SASL blocks.
    pub fn finalize_transport(
        &self,
        settings: TransportSettings,
        namespace: &str,
    ) -> ConfigResult<TransportConfig> {
        let version: ProtocolVersion = settings
            .version
            .parse()
            .map_err(|reason| ConfigError::coercion("Version", reason))?;

        let client_id = settings.client_id.trim().to_string();
        if client_id.is_empty() {
            return Err(ConfigError::coercion("ClientID", "must not be empty"));
        }

        let net = &settings.net;
        for (field, value) in [
            ("Net.DialTimeout", net.dial_timeout),
            ("Net.ReadTimeout", net.read_timeout),
            ("Net.WriteTimeout", net.write_timeout),
            ("Admin.Timeout", settings.admin.timeout),
        ] {
            require_positive(field, value)?;
        }

        let secret_namespace = if net.secret.namespace.is_empty() {
            namespace.to_string()
        } else {
            net.secret.namespace.clone()
        };
        let scope = SecretScope {
            name: &net.secret.name,
            namespace: &secret_namespace,
        };

        let tls = if net.tls.enable {
            TlsConfig {
                enabled: true,
                ca_cert: self.credential("Net.TLS.CACert", &net.tls.ca_cert, &scope)?,
                cert: self.credential("Net.TLS.Cert", &net.tls.cert, &scope)?,
                key: self.credential("Net.TLS.Key", &net.tls.key, &scope)?,
                insecure_skip_verify: net.tls.insecure_skip_verify,
            }
        } else {
            TlsConfig {
                insecure_skip_verify: net.tls.insecure_skip_verify,
                ..TlsConfig::default()
            }
        };

        let sasl = if net.sasl.enable {
            let mechanism: SaslMechanism = net
                .sasl
                .mechanism
                .parse()
                .map_err(|reason| ConfigError::coercion("Net.SASL.Mechanism", reason))?;
            SaslConfig {
                enabled: true,
                mechanism,
                user: self.credential("Net.SASL.User", &net.sasl.user, &scope)?,
                password: self.credential("Net.SASL.Password", &net.sasl.password, &scope)?,
            }
        } else {
            SaslConfig {
                mechanism: net.sasl.mechanism.parse().unwrap_or(SaslMechanism::Plain),
                ..SaslConfig::default()
            }
        };

        let credentials_secret = net.secret.is_set().then(|| SecretName {
            name: net.secret.name.clone(),
            namespace: secret_namespace.clone(),
        });

        debug!(
            version = %version,
            tls = tls.enabled,
            sasl = sasl.enabled,
            servers = settings.bootstrap_servers.len(),
            "transport settings resolved"
        );

        Ok(TransportConfig {
            version,
            client_id,
            bootstrap_servers: settings.bootstrap_servers,
            net: NetConfig {
                dial_timeout: net.dial_timeout,
                read_timeout: net.read_timeout,
                write_timeout: net.write_timeout,
                tls,
                sasl,
            },
            metadata_refresh: settings.metadata.refresh_frequency,
            admin_timeout: settings.admin.timeout,
            offsets: OffsetsConfig {
                auto_commit_interval: settings.consumer.offsets.auto_commit.interval,
                retention: settings.consumer.offsets.retention,
            },
            credentials_secret,
        })
    }

    fn credential(
        &self,
        field: &str,
        source: &CredentialSource,
        scope: &SecretScope<'_>,
    ) -> ConfigResult<String> {
        let selector = match source {
            CredentialSource::Literal(value) if value.is_empty() => {
                return Err(ConfigError::coercion(field, "required when enabled but empty"));
            }
            CredentialSource::Literal(value) => return Ok(value.clone()),
            CredentialSource::Reference { secret_key_ref } => secret_key_ref,
        };

        let name = selector
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| Some(scope.name).filter(|n| !n.is_empty()))
            .ok_or_else(|| {
                ConfigError::coercion(field, "secret reference has no Name and Net.Secret.Name is unset")
            })?;
        let reference = SecretKeyRef {
            namespace: selector
                .namespace
                .clone()
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| scope.namespace.to_string()),
            name: name.to_string(),
            key: selector.key.clone(),
        };

        let failure = |reason: String| ConfigError::CredentialResolution {
            field: field.to_string(),
            reference: reference.to_string(),
            reason,
        };
        match self.resolver.resolve(&reference) {
            Ok(Some(value)) if !value.is_empty() => Ok(value),
            Ok(Some(_)) => Err(failure("secret field is empty".to_string())),
            Ok(None) => Err(failure("secret or key not found".to_string())),
            Err(err) => Err(failure(err.to_string())),
        }
    }
}

/// Default secret used by references that omit name or namespace.
struct SecretScope<'a> {
    name: &'a str,
    namespace: &'a str,
}

fn required_payload<'r>(resource: &'r ConfigResource, key: &str) -> ConfigResult<&'r str> {
    resource
        .payload(key)
        .ok_or_else(|| ConfigError::MissingPayload {
            resource: resource.qualified_name(),
            key: key.to_string(),
        })
}

/// Layer `payload` over `defaults` and extract the merged document.
fn layered<T>(defaults: &T, key: &str, payload: &str) -> ConfigResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut figment = Figment::new().merge(Serialized::defaults(defaults));
    match overlay_document(key, payload)? {
        Some(document) => figment = figment.merge(Yaml::string(&document)),
        None => debug!(key, "payload is empty; using defaults"),
    }
    figment.extract().map_err(|err| {
        let field = if err.path.is_empty() {
            key.to_string()
        } else {
            err.path.join(".")
        };
        ConfigError::coercion(field, err.kind.to_string())
    })
}

/// Check that a payload parses as a mapping and return the document to
/// layer. Blank or comment-only payloads carry no overrides, and keys left
/// without a value (`topic:`) are dropped so their defaults survive.
fn overlay_document(key: &str, payload: &str) -> ConfigResult<Option<String>> {
    if payload.trim().is_empty() {
        return Ok(None);
    }
    let malformed = |reason: String| ConfigError::MalformedOverlay {
        key: key.to_string(),
        reason,
    };
    let mut map = match serde_yaml::from_str::<serde_yaml::Value>(payload) {
        Ok(serde_yaml::Value::Mapping(map)) => map,
        Ok(serde_yaml::Value::Null) => return Ok(None),
        Ok(_) => return Err(malformed("expected a mapping at the document root".to_string())),
        Err(err) => {
            // Well-formed YAML can still hold integers wider than a YAML
            // value; extraction reports those against their field.
            return match serde_yaml::from_str::<IgnoredAny>(payload) {
                Ok(_) => Ok(Some(payload.to_string())),
                Err(_) => Err(malformed(err.to_string())),
            };
        }
    };
    if let Some(bad) = map.keys().find(|k| !k.is_string()) {
        return Err(malformed(format!("non-string key {bad:?}")));
    }
    drop_nulls(&mut map);
    if map.is_empty() {
        return Ok(None);
    }
    serde_yaml::to_string(&map)
        .map(Some)
        .map_err(|err| malformed(err.to_string()))
}

fn drop_nulls(map: &mut serde_yaml::Mapping) {
    map.retain(|_, value| {
        if let serde_yaml::Value::Mapping(inner) = value {
            drop_nulls(inner);
        }
        !value.is_null()
    });
}

fn require_positive(field: &str, value: Duration) -> ConfigResult<()> {
    if value.is_zero() {
        return Err(ConfigError::coercion(field, "must be greater than zero"));
    }
    Ok(())
}

fn validate_app(app: &AppConfig) -> ConfigResult<()> {
    let topic = &app.kafka.topic;
    if topic.default_num_partitions <= 0 {
        return Err(ConfigError::coercion(
            "kafka.topic.defaultNumPartitions",
            format!("must be greater than 0, got {}", topic.default_num_partitions),
        ));
    }
    if topic.default_replication_factor < 1 {
        return Err(ConfigError::coercion(
            "kafka.topic.defaultReplicationFactor",
            format!("must be at least 1, got {}", topic.default_replication_factor),
        ));
    }
    if topic.default_retention_millis < 0 {
        return Err(ConfigError::coercion(
            "kafka.topic.defaultRetentionMillis",
            format!("must not be negative, got {}", topic.default_retention_millis),
        ));
    }

    validate_role("receiver", &app.receiver)?;
    validate_role("dispatcher", &app.dispatcher)
}

fn validate_role(role: &str, sizing: &RoleSizing) -> ConfigResult<()> {
    let pairs: [(&str, &Option<Quantity>, &Option<Quantity>); 2] = [
        ("cpu", &sizing.cpu_request, &sizing.cpu_limit),
        ("memory", &sizing.memory_request, &sizing.memory_limit),
    ];
    for (resource, request, limit) in pairs {
        if let (Some(request), Some(limit)) = (request, limit) {
            if limit.milli_value() < request.milli_value() {
                return Err(ConfigError::coercion(
                    format!("{role}.{resource}Limit"),
                    format!("limit {limit} is lower than request {request}"),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AdminType;
    use crate::infrastructure::credentials::StaticCredentialResolver;

    const TRANSPORT: &str = r"
Version: 2.3.0
ClientID: reconciler
BootstrapServers: broker-0:9092,broker-1:9092
Net:
  Secret:
    Name: kafka-cluster
  SASL:
    Enable: true
    Mechanism: SCRAM-SHA-512
    User:
      SecretKeyRef: { Key: username }
    Password:
      SecretKeyRef: { Key: password }
Admin:
  Timeout: 10s
";

    const APP: &str = r"
receiver:
  cpuRequest: 250m
  memoryLimit: 1Gi
  replicas: 2
dispatcher:
  replicas: 0
kafka:
  topic:
    defaultNumPartitions: 12
    defaultRetentionMillis: 3600000
  adminType: custom
";

    fn resolver() -> Arc<StaticCredentialResolver> {
        Arc::new(StaticCredentialResolver::new().with_secret(
            "eventing",
            "kafka-cluster",
            [("username", "admin"), ("password", "s3cret")],
        ))
    }

    fn merger() -> ConfigMerger {
        ConfigMerger::new(DefaultsRegistry::default(), resolver())
    }

    fn resource(transport: &str, app: &str) -> ConfigResource {
        ConfigResource::new("eventing", CONFIG_RESOURCE_NAME)
            .with_payload(TRANSPORT_SETTINGS_KEY, transport)
            .with_payload(APP_SETTINGS_KEY, app)
    }

    #[test]
    fn test_merge_overrides_leaves_and_keeps_defaults() {
        let merged = merger().merge(Some(&resource(TRANSPORT, APP))).unwrap();

        let transport = &merged.transport;
        assert_eq!(transport.version.to_string(), "2.3.0");
        assert_eq!(transport.client_id, "reconciler");
        assert_eq!(transport.bootstrap_servers, vec!["broker-0:9092", "broker-1:9092"]);
        assert_eq!(transport.admin_timeout, Duration::from_secs(10));
        assert_eq!(transport.net.dial_timeout, Duration::from_secs(30));
        assert!(transport.net.sasl.enabled);
        assert_eq!(transport.net.sasl.mechanism, SaslMechanism::ScramSha512);
        assert_eq!(transport.net.sasl.user, "admin");
        assert_eq!(transport.net.sasl.password, "s3cret");
        assert!(!transport.net.tls.enabled);
        assert_eq!(
            transport.credentials_secret,
            Some(SecretName {
                name: "kafka-cluster".into(),
                namespace: "eventing".into()
            })
        );

        let app = &merged.app;
        assert_eq!(app.receiver.cpu_request.as_ref().unwrap().as_str(), "250m");
        assert_eq!(app.receiver.memory_request.as_ref().unwrap().as_str(), "50Mi");
        assert_eq!(app.receiver.memory_limit.as_ref().unwrap().as_str(), "1Gi");
        assert_eq!(app.receiver.replicas, 2);
        assert_eq!(app.dispatcher.replicas, 0);
        assert_eq!(app.dispatcher.cpu_request.as_ref().unwrap().as_str(), "100m");
        assert_eq!(app.kafka.topic.default_num_partitions, 12);
        assert_eq!(app.kafka.topic.default_replication_factor, 1);
        assert_eq!(app.kafka.topic.default_retention_millis, 3_600_000);
        assert_eq!(app.kafka.admin_type, AdminType::Custom);
    }

    #[test]
    fn test_empty_payloads_yield_defaults() {
        let merged = merger().merge(Some(&resource("", "# nothing here"))).unwrap();
        assert_eq!(merged.app, AppConfig::default());
        assert_eq!(merged.transport.client_id, "topic-admin");
        assert_eq!(merged.transport.version, ProtocolVersion::V2_0_0);
        assert_eq!(merged.transport.credentials_secret, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let app = "futureSetting: true\nkafka:\n  adminType: kafka\n  brandNew: { a: 1 }\n";
        let merged = merger().merge(Some(&resource("Unrecognized: 1", app))).unwrap();
        assert_eq!(merged.app.kafka.admin_type, AdminType::Kafka);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let overlay = resource(TRANSPORT, APP);
        let first = serde_json::to_vec(&merger().merge(Some(&overlay)).unwrap()).unwrap();
        let second = serde_json::to_vec(&merger().merge(Some(&overlay)).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_resource_and_data_are_distinct() {
        let m = merger();
        assert!(matches!(m.merge(None), Err(ConfigError::SourceUnavailable { .. })));

        let no_data = ConfigResource::new("eventing", CONFIG_RESOURCE_NAME);
        assert!(matches!(m.merge(Some(&no_data)), Err(ConfigError::EmptyOverlay { .. })));

        let mut empty_map = no_data.clone();
        empty_map.data = Some(Default::default());
        assert!(matches!(m.merge(Some(&empty_map)), Err(ConfigError::EmptyOverlay { .. })));

        let transport_only = ConfigResource::new("eventing", CONFIG_RESOURCE_NAME)
            .with_payload(TRANSPORT_SETTINGS_KEY, "");
        match m.merge(Some(&transport_only)) {
            Err(ConfigError::MissingPayload { key, .. }) => assert_eq!(key, APP_SETTINGS_KEY),
            other => panic!("expected MissingPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_payloads() {
        let m = merger();
        for bad in ["kafka: [unclosed", "- just\n- a list", "plain scalar"] {
            match m.merge(Some(&resource("", bad))) {
                Err(ConfigError::MalformedOverlay { key, .. }) => assert_eq!(key, APP_SETTINGS_KEY),
                other => panic!("expected MalformedOverlay for {bad:?}, got {other:?}"),
            }
        }
        assert!(matches!(
            m.merge(Some(&resource("Net: {TLS: ", ""))),
            Err(ConfigError::MalformedOverlay { .. })
        ));
    }

    fn coercion_field(result: ConfigResult<MergedConfig>) -> String {
        match result {
            Err(ConfigError::FieldCoercion { field, .. }) => field,
            other => panic!("expected FieldCoercion, got {other:?}"),
        }
    }

    #[test]
    fn test_topic_range_violations_name_the_field() {
        let m = merger();
        let cases = [
            ("kafka:\n  topic:\n    defaultNumPartitions: -1", "kafka.topic.defaultNumPartitions"),
            ("kafka:\n  topic:\n    defaultNumPartitions: 0", "kafka.topic.defaultNumPartitions"),
            ("kafka:\n  topic:\n    defaultReplicationFactor: 0", "kafka.topic.defaultReplicationFactor"),
            ("kafka:\n  topic:\n    defaultRetentionMillis: -5", "kafka.topic.defaultRetentionMillis"),
        ];
        for (app, field) in cases {
            assert_eq!(coercion_field(m.merge(Some(&resource("", app)))), field);
        }
    }

    #[test]
    fn test_type_mismatches_name_the_field() {
        let m = merger();
        let field = coercion_field(m.merge(Some(&resource("", "receiver:\n  replicas: -2"))));
        assert!(field.ends_with("replicas"), "{field}");

        let field = coercion_field(m.merge(Some(&resource("", "dispatcher:\n  cpuRequest: lots"))));
        assert!(field.ends_with("cpuRequest"), "{field}");

        let field = coercion_field(m.merge(Some(&resource("Admin:\n  Timeout: eventually", ""))));
        assert!(field.ends_with("Timeout"), "{field}");
    }

    #[test]
    fn test_empty_sections_keep_defaults() {
        let app = "kafka:\n  topic:\n  adminType: custom\nreceiver:\n";
        let merged = merger().merge(Some(&resource("Net:\n  SASL:\n", app))).unwrap();
        assert_eq!(merged.app.kafka.admin_type, AdminType::Custom);
        assert_eq!(merged.app.kafka.topic, AppConfig::default().kafka.topic);
        assert_eq!(merged.app.receiver, AppConfig::default().receiver);
        assert!(!merged.transport.net.sasl.enabled);

        let merged = merger().merge(Some(&resource("", "kafka:\n"))).unwrap();
        assert_eq!(merged.app, AppConfig::default());
    }

    #[test]
    fn test_oversized_integer_names_the_field() {
        let app = "kafka:\n  topic:\n    defaultRetentionMillis: 99999999999999999999";
        assert_eq!(
            coercion_field(merger().merge(Some(&resource("", app)))),
            "kafka.topic.defaultRetentionMillis"
        );
    }

    #[test]
    fn test_unquoted_float_version_names_the_field() {
        match merger().merge(Some(&resource("Version: 2.10", ""))) {
            Err(ConfigError::FieldCoercion { field, reason }) => {
                assert_eq!(field, "Version");
                assert!(reason.contains("quote the version string"), "{reason}");
            }
            other => panic!("expected FieldCoercion, got {other:?}"),
        }
        let merged = merger().merge(Some(&resource("Version: \"2.10\"", ""))).unwrap();
        assert_eq!(merged.transport.version.to_string(), "2.10.0");
    }

    #[test]
    fn test_limit_below_request_rejected() {
        let app = "receiver:\n  cpuRequest: 500m\n  cpuLimit: 200m";
        assert_eq!(
            coercion_field(merger().merge(Some(&resource("", app)))),
            "receiver.cpuLimit"
        );
    }

    #[test]
    fn test_transport_coercion_failures() {
        let m = merger();
        assert_eq!(coercion_field(m.merge(Some(&resource("Version: banana", "")))), "Version");
        assert_eq!(coercion_field(m.merge(Some(&resource("ClientID: \"  \"", "")))), "ClientID");
        assert_eq!(
            coercion_field(m.merge(Some(&resource("Net:\n  DialTimeout: 0s", "")))),
            "Net.DialTimeout"
        );
        let sasl = "Net:\n  SASL:\n    Enable: true\n    Mechanism: GSSAPI\n    User: u\n    Password: p";
        assert_eq!(coercion_field(m.merge(Some(&resource(sasl, "")))), "Net.SASL.Mechanism");
    }

    #[test]
    fn test_disabled_sasl_ignores_mechanism_and_credentials() {
        let sasl = "Net:\n  SASL:\n    Enable: false\n    Mechanism: GSSAPI\n    Password: { SecretKeyRef: { Name: nope, Key: x } }";
        let merged = merger().merge(Some(&resource(sasl, ""))).unwrap();
        assert!(!merged.transport.net.sasl.enabled);
        assert!(merged.transport.net.sasl.password.is_empty());
    }

    #[test]
    fn test_enabled_tls_requires_all_material() {
        let tls = "Net:\n  TLS:\n    Enable: true\n    CACert: ca-pem\n    Cert: cert-pem";
        assert_eq!(coercion_field(merger().merge(Some(&resource(tls, "")))), "Net.TLS.Key");

        let tls = "Net:\n  TLS:\n    Enable: true\n    CACert: ca-pem\n    Cert: cert-pem\n    Key: key-pem";
        let merged = merger().merge(Some(&resource(tls, ""))).unwrap();
        assert_eq!(merged.transport.net.tls.key, "key-pem");
    }

    #[test]
    fn test_unresolvable_secret_fails_merge() {
        let tls = r"
Net:
  TLS:
    Enable: true
    CACert: { SecretKeyRef: { Name: tls-secret, Namespace: other, Key: ca.crt } }
    Cert: c
    Key: k
";
        match merger().merge(Some(&resource(tls, ""))) {
            Err(ConfigError::CredentialResolution { field, reference, .. }) => {
                assert_eq!(field, "Net.TLS.CACert");
                assert_eq!(reference, "other/tls-secret[ca.crt]");
            }
            other => panic!("expected CredentialResolution, got {other:?}"),
        }
    }

    #[test]
    fn test_reference_without_any_secret_name() {
        let sasl = "Net:\n  SASL:\n    Enable: true\n    User: u\n    Password: { SecretKeyRef: { Key: password } }";
        assert_eq!(
            coercion_field(merger().merge(Some(&resource(sasl, "")))),
            "Net.SASL.Password"
        );
    }

    #[test]
    fn test_custom_defaults_survive_when_not_overridden() {
        let mut app = AppConfig::default();
        app.dispatcher.memory_limit = Some(Quantity::parse("512Mi").unwrap());
        app.kafka.topic.default_num_partitions = 16;
        let merger = ConfigMerger::new(DefaultsRegistry::default().with_app(app), resolver());

        let merged = merger
            .merge(Some(&resource("", "kafka:\n  topic:\n    defaultNumPartitions: 2")))
            .unwrap();
        assert_eq!(merged.app.kafka.topic.default_num_partitions, 2);
        assert_eq!(
            merged.app.dispatcher.memory_limit,
            Some(Quantity::parse("512Mi").unwrap())
        );

        let merged = merger
            .merge(Some(&resource("", "dispatcher:\n  memoryLimit: \"\"")))
            .unwrap();
        assert_eq!(merged.app.dispatcher.memory_limit, None);
    }
}
