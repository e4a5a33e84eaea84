//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::config::ConfigArgs;
use super::commands::topic::TopicArgs;
use crate::infrastructure::logging::{LogConfig, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "topic-admin")]
#[command(about = "Resolve messaging-cluster configuration and administer topics", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TOPIC_ADMIN_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format for stderr (json, pretty)
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Also write JSON logs to a daily-rotated file in this directory
    #[arg(long, global = true, env = "TOPIC_ADMIN_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        let config = LogConfig::default()
            .with_level(self.log_level.clone())
            .with_format(self.log_format);
        match &self.log_dir {
            Some(dir) => config.with_log_dir(dir),
            None => config,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect resolved configuration
    Config(ConfigArgs),

    /// Create and delete topics on the configured backend
    Topic(TopicArgs),
}
