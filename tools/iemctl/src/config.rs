//! iemctl configuration
//!
//! Priority (highest to lowest):
//! 1. Command-line overrides
//! 2. Environment variables (`IEMCTL_`, nested keys split on `__`)
//! 3. Config file given with `--config`, otherwise `iemctl.yaml` then `iemctl.toml`
//! 4. Default values

use std::path::Path;

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use iem_protocol::SerialParams;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "IEMCTL_";
pub const DEFAULT_TOML: &str = "iemctl.toml";
pub const DEFAULT_YAML: &str = "iemctl.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IemctlConfig {
    pub serial: SerialParams,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. "info" or "iem_protocol=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Values given on the command line; `None` leaves the loaded value alone
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub device: Option<String>,
    pub baud_rate: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub verbose: bool,
}

impl IemctlConfig {
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(device) = &overrides.device {
            self.serial.device.clone_from(device);
        }
        if let Some(baud) = overrides.baud_rate {
            self.serial.baud_rate = baud;
        }
        if let Some(timeout) = overrides.timeout_ms {
            self.serial.timeout_ms = timeout;
        }
        if overrides.verbose {
            self.logging.level = "debug".to_string();
        }
    }
}

/// Build the figment for an optional explicit config file
pub fn figment(config_path: Option<&Path>) -> Result<Figment> {
    let base = Figment::from(Serialized::defaults(IemctlConfig::default()));

    let figment = match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            match path.extension().and_then(|s| s.to_str()) {
                Some("toml") => base.merge(Toml::file(path)),
                Some("yaml" | "yml") => base.merge(Yaml::file(path)),
                other => bail!("Unsupported config file format: {}", other.unwrap_or("none")),
            }
        },
        None => base
            .merge(Toml::file(DEFAULT_TOML))
            .merge(Yaml::file(DEFAULT_YAML)),
    };

    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<IemctlConfig> {
    let mut config: IemctlConfig = figment(config_path)?
        .extract()
        .context("Failed to load configuration")?;
    config.apply(overrides);
    Ok(config)
}
