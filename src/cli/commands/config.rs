//! Implementation of the `topic-admin config` commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::cli::output::{kv_table, output, CommandOutput};
use crate::cli::ConfigSourceArgs;
use crate::infrastructure::config::{DefaultsRegistry, MergedConfig};
use crate::infrastructure::logging::SecretScrubber;

const REDACTED: &str = "<redacted>";

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the merged configuration with credentials redacted
    Show(ConfigSourceArgs),

    /// Print the compiled-in defaults
    Defaults,
}

/// Any configuration document, rendered as dotted `key  value` rows.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    pub document: Value,
}

impl ConfigOutput {
    fn new<T: Serialize>(document: &T) -> Self {
        Self {
            document: serde_json::to_value(document).unwrap_or_default(),
        }
    }
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        let mut rows = Vec::new();
        flatten("", &self.document, &mut rows);
        SecretScrubber::new().scrub(&kv_table(rows).to_string())
    }

    fn to_json(&self) -> Value {
        self.document.clone()
    }
}

/// Copy of `merged` with all credential material replaced.
pub fn redact(merged: &MergedConfig) -> MergedConfig {
    let mut redacted = merged.clone();
    let tls = &mut redacted.transport.net.tls;
    for material in [&mut tls.ca_cert, &mut tls.cert, &mut tls.key] {
        mask(material);
    }
    mask(&mut redacted.transport.net.sasl.password);
    redacted
}

fn mask(material: &mut String) {
    if !material.is_empty() {
        *material = REDACTED.to_string();
    }
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let key = |child: &str| {
        if prefix.is_empty() {
            child.to_string()
        } else {
            format!("{prefix}.{child}")
        }
    };
    match value {
        Value::Object(map) => {
            for (child, nested) in map {
                flatten(&key(child), nested, rows);
            }
        }
        Value::Array(items) => rows.push((
            prefix.to_string(),
            items
                .iter()
                .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join(","),
        )),
        Value::String(text) => rows.push((prefix.to_string(), text.clone())),
        Value::Null => rows.push((prefix.to_string(), String::new())),
        other => rows.push((prefix.to_string(), other.to_string())),
    }
}

pub async fn execute(args: ConfigArgs, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show(source) => {
            let merged = source.load().await?;
            output(&ConfigOutput::new(&redact(&merged)), json_mode);
        }
        ConfigCommands::Defaults => {
            let defaults = DefaultsRegistry::default();
            let document = serde_json::json!({
                "transport": defaults.transport(),
                "application": defaults.app(),
            });
            output(&ConfigOutput { document }, json_mode);
        }
    }
    Ok(())
}
