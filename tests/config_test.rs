// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::fs;

use anyhow::Result;
use hydra_consent::config::{self, Config, User};
use hydra_consent::session::{
    encode_password_hash, ConfigIdentityBridge, IdentityBridge, IdentityError,
};
use tempfile::tempdir;

#[test]
fn test_config_load_and_save() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    let mut config = Config::default();
    config.server.port = 3100;
    config.server.address = "0.0.0.0".to_string();
    config.server.login_ok_path = "/account".to_string();
    config.provider.admin_url = "http://hydra:4445".to_string();
    config.consent.whitelist = vec!["https://auth.example.org/oauth2/auth?client_id=app".to_string()];
    config.consent.override_requested_audience = true;
    config.access.users = vec![User {
        user: "alice".to_string(),
        pass: encode_password_hash("wonderland").unwrap(),
        email: Some("alice@example.org".to_string()),
        name: None,
    }];
    config.save_to_file(&config_path)?;

    let loaded_config = Config::from_file(&config_path)?;
    assert_eq!(loaded_config, config);

    Ok(())
}

#[test]
fn test_missing_file_creates_default() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("missing.yaml");

    let config = Config::from_file(&config_path)?;
    assert!(config_path.exists());
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.provider.admin_url, "http://localhost:4445");
    assert_eq!(config.consent.remember_for, 3600);

    // The generated file is valid and keeps its session secret
    let reloaded = Config::from_file(&config_path)?;
    assert_eq!(reloaded.server.session_secret, config.server.session_secret);

    Ok(())
}

#[tokio::test]
async fn test_default_config_has_no_credential() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("fresh.yaml");

    let config = Config::from_file(&config_path)?;
    assert!(config.access.users.is_empty());
    assert!(!fs::read_to_string(&config_path)?.contains("pass:"));

    let bridge = ConfigIdentityBridge::new(&config.access);
    let err = bridge.load_user_by_pid("admin").await.err().unwrap();
    assert_eq!(err, IdentityError::NotFound("admin".to_string()));

    Ok(())
}

#[test]
fn test_schema_violation_creates_sample_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(
        &config_path,
        r#"
server:
  port: "not-a-port"
consent:
  remember_for: -5
unknown_section: true
"#,
    )?;

    assert!(Config::from_file(&config_path).is_err());

    let sample_path = config_path.with_extension("sample.yaml");
    assert!(sample_path.exists(), "Sample config file was not created");
    let sample = Config::from_file(&sample_path)?;
    assert_eq!(sample.server.port, 3000);

    Ok(())
}

#[test]
fn test_rule_violation_is_rejected() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(
        &config_path,
        r#"
access:
  users:
    - user: alice
      pass: cGxhaW50ZXh0
"#,
    )?;

    let err = Config::from_file(&config_path).unwrap_err();
    assert!(err.to_string().contains("alice"));
    assert!(config_path.with_extension("sample.yaml").exists());

    Ok(())
}

#[test]
fn test_overrides_apply_in_order() -> Result<()> {
    let mut config = Config::default();
    config.apply_env_from(|name| match name {
        config::ENV_ADMIN_URL => Some("http://hydra-env:4445".to_string()),
        config::ENV_CONSENT_WHITELIST => Some("https://a.example.org, ,https://b.example.org".to_string()),
        config::ENV_OVERRIDE_AUDIENCE => Some("true".to_string()),
        _ => None,
    })?;
    assert_eq!(config.provider.admin_url, "http://hydra-env:4445");
    assert_eq!(
        config.consent.whitelist,
        vec!["https://a.example.org", "https://b.example.org"]
    );
    assert!(config.consent.override_requested_audience);

    config.apply_args(Some(4000), None, Some("http://hydra-cli:4445".to_string()));
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.server.address, "127.0.0.1");
    assert_eq!(config.provider.admin_url, "http://hydra-cli:4445");

    Ok(())
}

#[test]
fn test_config_schema_output() -> Result<()> {
    config::output_config_schema()?;
    Ok(())
}
