//! CLI configuration with TOML file support.

use anyhow::Context;
use kyc_oracle::OracleConfig;
use kyc_verification::GateConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the `kyc` binary can be configured with.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub gate: GateConfig,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            oracle: OracleConfig::default(),
            gate: GateConfig::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
