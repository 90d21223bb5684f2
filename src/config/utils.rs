// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! Schema access and the validation rules the JSON schema cannot express.

use std::collections::HashSet;

use anyhow::{Context, Result};
use base64::Engine;
use log::{debug, warn};
use url::Url;

use super::Config;

/// JSON schema of the configuration file
pub const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Output the embedded JSON schema to the console
///
/// Called for the `--show-config-schema` flag.
///
/// ```bash
/// ./hydra_consent --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;
    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;
    println!("{}", formatted_schema);
    Ok(())
}

/// Check if a string is a valid IP address
///
/// Accepts IPv4 and IPv6 addresses plus `localhost`.
pub fn is_valid_ip_address(addr: &str) -> bool {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return true;
    }
    matches!(addr, "localhost" | "::" | "::0" | "0.0.0.0")
}

/// Parse a boolean the way environment variables usually spell it
pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("'{}' is not a boolean", other),
    }
}

/// Validate the rules that aren't covered by the JSON schema
///
/// - port within 1-65534
/// - admin URL is an absolute http(s) URL
/// - `login_ok_path` is a local absolute path
/// - the session secret decodes to 32 or 64 bytes
/// - non-negative remember-me duration and positive admin timeout
/// - unique user names with well-formed `openssl passwd` hashes
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if config.server.port < 1 || config.server.port > 65534 {
        anyhow::bail!("Invalid port number: {}", config.server.port);
    }

    if !is_valid_ip_address(&config.server.address) {
        // Host names are legal for Rocket, only worth a warning
        warn!(
            "Potentially invalid address format: {}",
            config.server.address
        );
    }

    if !config.server.login_ok_path.starts_with('/') || config.server.login_ok_path.starts_with("//")
    {
        anyhow::bail!(
            "login_ok_path must be a local absolute path, got '{}'",
            config.server.login_ok_path
        );
    }

    let secret = base64::engine::general_purpose::STANDARD
        .decode(&config.server.session_secret)
        .context("Session secret is not valid base64")?;
    // Rocket only takes 256-bit or 512-bit secret keys
    if secret.len() != 32 && secret.len() != 64 {
        anyhow::bail!(
            "Session secret must decode to 32 or 64 bytes, got {}",
            secret.len()
        );
    }

    let admin_url = Url::parse(&config.provider.admin_url)
        .with_context(|| format!("Invalid admin URL: {}", config.provider.admin_url))?;
    if !matches!(admin_url.scheme(), "http" | "https") {
        anyhow::bail!("Admin URL must use http or https: {}", admin_url);
    }

    if config.provider.timeout == 0 {
        anyhow::bail!("Provider timeout must be at least one second");
    }

    if config.consent.remember_for < 0 {
        anyhow::bail!(
            "remember_for must not be negative, got {}",
            config.consent.remember_for
        );
    }

    if config.access.users.is_empty() {
        warn!("No user is configured, nobody will be able to sign in. Add one with hash_password <password>");
    }

    let mut seen = HashSet::new();
    for user in &config.access.users {
        if !seen.insert(user.user.as_str()) {
            anyhow::bail!("Duplicate user: {}", user.user);
        }
        let decoded_pass = base64::engine::general_purpose::STANDARD
            .decode(&user.pass)
            .with_context(|| format!("Password of {} is not valid base64", user.user))?;
        // $1$ md5, $5$ sha256, $6$ sha512, $apr1$ apache md5
        if !decoded_pass.starts_with(b"$1$")
            && !decoded_pass.starts_with(b"$5$")
            && !decoded_pass.starts_with(b"$6$")
            && !decoded_pass.starts_with(b"$apr1$")
        {
            anyhow::bail!(
                "Password of {} is not a valid hash, you should use hash_password <password> or openssl passwd -5 <password> | base64 -w0",
                user.user
            );
        }
    }

    Ok(())
}
