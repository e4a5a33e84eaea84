use clap::Parser;
use std::time::Duration;

use topic_admin::cli::commands::config::ConfigCommands;
use topic_admin::cli::commands::topic::TopicCommands;
use topic_admin::cli::{Cli, Commands};
use topic_admin::infrastructure::logging::LogFormat;

#[test]
fn test_parse_config_show() {
    let cli = Cli::try_parse_from(vec![
        "topic-admin",
        "config",
        "show",
        "--config-dir",
        "/etc/topic-admin",
        "--secrets-dir",
        "/var/run/secrets",
        "--namespace",
        "eventing",
        "--json",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Config(args) => match args.command {
            ConfigCommands::Show(source) => {
                assert_eq!(source.config_dir.unwrap().to_str(), Some("/etc/topic-admin"));
                assert_eq!(source.secrets_dir.unwrap().to_str(), Some("/var/run/secrets"));
                assert_eq!(source.namespace, "eventing");
                assert!(!source.from_env);
            }
            ConfigCommands::Defaults => panic!("Wrong config command"),
        },
        Commands::Topic(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_from_env_conflicts_with_config_dir() {
    let result = Cli::try_parse_from(vec![
        "topic-admin",
        "config",
        "show",
        "--from-env",
        "--config-dir",
        "/etc/topic-admin",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_topic_create() {
    let cli = Cli::try_parse_from(vec![
        "topic-admin",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "topic",
        "create",
        "orders",
        "--partitions",
        "12",
        "--replication-factor",
        "3",
        "--retention-ms",
        "3600000",
        "--config",
        "cleanup.policy=compact",
        "--retries",
        "5",
        "--rest-proxy-url",
        "http://proxy:8082",
        "--timeout",
        "2m",
        "--config-dir",
        "/etc/topic-admin",
    ])
    .unwrap();

    assert_eq!(cli.log_level, "debug");
    assert_eq!(cli.log_format, LogFormat::Json);
    match cli.command {
        Commands::Topic(args) => match args.command {
            TopicCommands::Create(create) => {
                assert_eq!(create.name, "orders");
                assert_eq!(create.partitions, Some(12));
                assert_eq!(create.replication_factor, Some(3));
                assert_eq!(create.retention_ms, Some(3_600_000));
                assert_eq!(
                    create.config_entries,
                    vec![("cleanup.policy".to_string(), "compact".to_string())]
                );
                assert_eq!(create.retries, 5);
                assert_eq!(create.backend.rest_proxy_url.as_deref(), Some("http://proxy:8082"));
                assert_eq!(create.backend.timeout, Duration::from_secs(120));
            }
            TopicCommands::Delete(_) => panic!("Wrong topic command"),
        },
        Commands::Config(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_topic_delete_defaults() {
    let cli = Cli::try_parse_from(vec!["topic-admin", "topic", "delete", "orders", "--from-env"]).unwrap();

    match cli.command {
        Commands::Topic(args) => match args.command {
            TopicCommands::Delete(delete) => {
                assert_eq!(delete.name, "orders");
                assert!(delete.backend.source.from_env);
                assert_eq!(delete.backend.timeout, Duration::from_secs(30));
            }
            TopicCommands::Create(_) => panic!("Wrong topic command"),
        },
        Commands::Config(_) => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_rejects_malformed_config_entry() {
    let result = Cli::try_parse_from(vec!["topic-admin", "topic", "create", "orders", "--config", "compact"]);
    assert!(result.is_err());
}
