// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point of the login, consent and logout provider
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hydra_consent::config::{self, Config};
use hydra_consent::server::{build_rocket, figment_from_config};
use log::{info, LevelFilter};
use rocket::config::LogLevel;

/// Login, consent and logout provider for an OAuth2 authorization server
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file, created with defaults if missing
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Validate the configuration file and exit
    #[arg(long)]
    validate_config: bool,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable all logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Web server port, overrides server.port
    #[arg(short, long)]
    port: Option<u16>,

    /// Web server address, overrides server.address
    #[arg(short, long)]
    address: Option<String>,

    /// Admin API URL of the authorization server, overrides provider.admin_url
    #[arg(long)]
    admin_url: Option<String>,
}

#[rocket::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::Off
    } else if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if args.show_config_schema {
        return config::output_config_schema();
    }

    let mut config = Config::from_file(&args.config)?;
    config.apply_env()?;
    config.apply_args(args.port, args.address.clone(), args.admin_url.clone());
    config::utils::validate_specific_rules(&config)?;

    if args.validate_config {
        println!("Configuration file {} is valid", args.config.display());
        return Ok(());
    }

    let rocket_log_level = match level {
        LevelFilter::Off => LogLevel::Off,
        LevelFilter::Debug => LogLevel::Debug,
        _ => LogLevel::Normal,
    };
    info!(
        "Starting {} on {}:{}",
        config.server.name, config.server.address, config.server.port
    );
    let figment = figment_from_config(&config, rocket_log_level);
    let rocket = build_rocket(figment, &config)?;
    let _rocket = rocket.launch().await?;

    Ok(())
}
