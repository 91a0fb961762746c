// src/config.rs

//! Manages server configuration: loading, defaults, and validation.

use crate::core::acl::PasswordHashAlgorithm;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::warn;

/// Configuration for Access Control List (ACL).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AclConfig {
    /// When false, commands are never checked against the bound user.
    #[serde(default = "default_acl_enabled")]
    pub enabled: bool,
    /// Reject `+cmd` / `+@category` rules naming unknown commands or categories.
    #[serde(default)]
    pub strict_rules: bool,
    /// Rule tokens applied to the `default` user at startup.
    #[serde(default = "default_user_rules")]
    pub default_user: Vec<String>,
    /// How `>password` rules are hashed.
    #[serde(default)]
    pub password_hash: PasswordHashAlgorithm,
    /// Delay before replying to a failed `AUTH`, in milliseconds.
    #[serde(default = "default_auth_failure_delay_ms")]
    pub auth_failure_delay_ms: u64,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            enabled: default_acl_enabled(),
            strict_rules: false,
            default_user: default_user_rules(),
            password_hash: PasswordHashAlgorithm::default(),
            auth_failure_delay_ms: default_auth_failure_delay_ms(),
        }
    }
}

fn default_acl_enabled() -> bool {
    true
}
fn default_user_rules() -> Vec<String> {
    ["on", "allkeys", "allchannels", "+@all"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_auth_failure_delay_ms() -> u64 {
    100
}

/// A raw representation of the config file before validation.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_max_clients")]
    max_clients: usize,
    #[serde(default)]
    acl_file: Option<String>,
    #[serde(default)]
    acl: AclConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7878
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_clients() -> usize {
    10000
}

/// Represents the final, validated server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_clients: usize,
    /// File used by `ACL LOAD`, `ACL SAVE` and loaded at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acl_file: Option<String>,
    #[serde(default)]
    pub acl: AclConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_clients: default_max_clients(),
            acl_file: None,
            acl: AclConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file and validates it.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file '{path}'"))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let raw_config: RawConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;

        let config = Config {
            host: raw_config.host,
            port: raw_config.port,
            log_level: raw_config.log_level,
            max_clients: raw_config.max_clients,
            acl_file: raw_config.acl_file,
            acl: raw_config.acl,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.max_clients == 0 {
            return Err(anyhow!("max_clients cannot be 0"));
        }
        if let Some(path) = &self.acl_file
            && path.trim().is_empty()
        {
            return Err(anyhow!("acl_file cannot be empty when set"));
        }
        if self.acl.auth_failure_delay_ms > 10_000 {
            return Err(anyhow!("acl.auth_failure_delay_ms cannot exceed 10000"));
        }
        if !self.acl.enabled {
            warn!("ACL enforcement is disabled: every connection can run every command.");
        }
        Ok(())
    }
}
