// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management
//!
//! The configuration is a YAML file validated against an embedded JSON
//! schema, then against a few rules the schema cannot express. It is read
//! once at startup and never changes afterwards.
//!
//! ## Configuration Structure
//!
//! - `server`: web server binding, name, session secret and login landing path
//! - `provider`: admin API URL and timeout of the authorization server
//! - `consent`: whitelist, audience override and remember-me duration
//! - `access`: users allowed to sign in
//!
//! ## Overrides
//!
//! Values from the file can be overridden by environment variables
//! ([`Config::apply_env`]) and then by command line flags
//! ([`Config::apply_args`]).
//!
//! ## Usage
//!
//! ```no_run
//! use hydra_consent::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//! config.apply_env().unwrap();
//! config.apply_args(Some(3001), None, None);
//!
//! println!("Admin API: {}", config.provider.admin_url);
//! ```

pub mod access;
pub mod consent;
pub mod provider;
pub mod server;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use access::{AccessConfig, User};
pub use consent::ConsentConfig;
pub use provider::ProviderConfig;
pub use server::ServerConfig;
pub use utils::{is_valid_ip_address, output_config_schema};

/// Environment variable overriding `provider.admin_url`
pub const ENV_ADMIN_URL: &str = "HYDRA_ADMIN_URL";
/// Environment variable overriding `consent.whitelist` (comma separated)
pub const ENV_CONSENT_WHITELIST: &str = "CONSENT_WHITELIST";
/// Environment variable overriding `consent.override_requested_audience`
pub const ENV_OVERRIDE_AUDIENCE: &str = "OVERRIDE_REQUESTED_AUDIENCE";
/// Environment variable overriding `consent.remember_for`
pub const ENV_REMEMBER_FOR: &str = "REMEMBER_FOR";

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub consent: ConsentConfig,

    #[serde(default)]
    pub access: AccessConfig,
}

impl Config {
    /// Write a `*.sample.yaml` file with default values next to `path`
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with default values. A file failing
    /// validation produces a sample file next to it and an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;
        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        let schema: serde_json::Value =
            serde_json::from_str(utils::CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        let config: Config = match serde_yml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = utils::validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply the overrides found in the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Empty variables are ignored. A variable that cannot be parsed is an
    /// error rather than a silent fallback to the file value.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(admin_url) = lookup(ENV_ADMIN_URL) {
            debug!("Overriding admin URL from {}: {}", ENV_ADMIN_URL, admin_url);
            self.provider.admin_url = admin_url.trim().to_string();
        }

        if let Some(whitelist) = lookup(ENV_CONSENT_WHITELIST) {
            debug!("Overriding consent whitelist from {}", ENV_CONSENT_WHITELIST);
            self.consent.whitelist = whitelist
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(flag) = lookup(ENV_OVERRIDE_AUDIENCE) {
            self.consent.override_requested_audience = utils::parse_bool(&flag)
                .with_context(|| format!("Invalid value for {}", ENV_OVERRIDE_AUDIENCE))?;
        }

        if let Some(seconds) = lookup(ENV_REMEMBER_FOR) {
            self.consent.remember_for = seconds
                .trim()
                .parse()
                .with_context(|| format!("Invalid value for {}: {}", ENV_REMEMBER_FOR, seconds))?;
        }

        Ok(())
    }

    /// Apply command line arguments to override configuration values
    ///
    /// Only explicitly provided values override the configuration.
    pub fn apply_args(
        &mut self,
        port: Option<u16>,
        address: Option<String>,
        admin_url: Option<String>,
    ) {
        if let Some(port) = port {
            debug!("Overriding port from command line: {}", port);
            self.server.port = port;
        }

        if let Some(address) = address {
            debug!("Overriding address from command line: {}", address);
            self.server.address = address;
        }

        if let Some(admin_url) = admin_url {
            debug!("Overriding admin URL from command line: {}", admin_url);
            self.provider.admin_url = admin_url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.login_ok_path, "/");
        assert_eq!(config.provider.admin_url, "http://localhost:4445");
        assert_eq!(config.provider.timeout, 30);
        assert!(config.consent.whitelist.is_empty());
        assert!(!config.consent.override_requested_audience);
        assert_eq!(config.consent.remember_for, 3600);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_from(env(&[
                (ENV_ADMIN_URL, "http://hydra:4445"),
                (ENV_CONSENT_WHITELIST, "https://a.example.org/cb, ,https://b.example.org/cb"),
                (ENV_OVERRIDE_AUDIENCE, "true"),
                (ENV_REMEMBER_FOR, "600"),
            ]))
            .unwrap();

        assert_eq!(config.provider.admin_url, "http://hydra:4445");
        assert_eq!(
            config.consent.whitelist,
            vec!["https://a.example.org/cb", "https://b.example.org/cb"]
        );
        assert!(config.consent.override_requested_audience);
        assert_eq!(config.consent.remember_for, 600);
    }

    #[test]
    fn test_env_empty_values_are_ignored() {
        let mut config = Config::default();
        config
            .apply_env_from(env(&[(ENV_ADMIN_URL, ""), (ENV_REMEMBER_FOR, " ")]))
            .unwrap();
        assert_eq!(config, {
            let mut expected = Config::default();
            expected.server.session_secret = config.server.session_secret.clone();
            expected
        });
    }

    #[test]
    fn test_env_invalid_values() {
        let mut config = Config::default();
        assert!(config
            .apply_env_from(env(&[(ENV_REMEMBER_FOR, "an hour")]))
            .is_err());
        assert!(config
            .apply_env_from(env(&[(ENV_OVERRIDE_AUDIENCE, "maybe")]))
            .is_err());
    }

    #[test]
    fn test_args_override_env() {
        let mut config = Config::default();
        config
            .apply_env_from(env(&[(ENV_ADMIN_URL, "http://from-env:4445")]))
            .unwrap();
        config.apply_args(
            Some(8443),
            Some("0.0.0.0".to_string()),
            Some("http://from-cli:4445".to_string()),
        );
        assert_eq!(config.server.port, 8443);
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.provider.admin_url, "http://from-cli:4445");
    }
}
