// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use rocket::config::LogLevel;
use rocket::data::{Limits, ToByteUnit};
use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};

use super::fairing::NoStore;
use super::handlers;
use crate::config::Config;
use crate::flow::{AuthHooks, ChallengeFlow};
use crate::policy::ConsentPolicy;
use crate::provider::AdminClient;
use crate::session::ConfigIdentityBridge;
use crate::views::Views;

/// Rocket settings derived from the configuration file
///
/// The session secret doubles as Rocket's `secret_key`, which encrypts the
/// private session cookie.
pub fn figment_from_config(config: &Config, log_level: LogLevel) -> Figment {
    rocket::Config::figment()
        .merge(("ident", config.server.name.clone()))
        .merge(("limits", Limits::new().limit("form", 64.kibibytes())))
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port))
        .merge(("log_level", log_level))
        .merge(("secret_key", config.server.session_secret.clone()))
}

/// Build the server with the admin client and user list of `config`
pub fn build_rocket(figment: Figment, config: &Config) -> Result<Rocket<Build>> {
    info!(
        "Using admin API at {} (timeout {}s)",
        config.provider.admin_url, config.provider.timeout
    );
    let admin = AdminClient::new(&config.provider.admin_url, config.provider.timeout())
        .context("Failed to create the admin API client")?;
    let identity = ConfigIdentityBridge::new(&config.access);
    let policy = ConsentPolicy::from_config(&config.consent);
    debug!(
        "Consent whitelist has {} entries, audience override {}",
        config.consent.whitelist.len(),
        if policy.override_requested_audience {
            "enabled"
        } else {
            "disabled"
        }
    );

    let flow = ChallengeFlow::new(
        Arc::new(admin),
        Arc::new(identity),
        policy,
        AuthHooks::new(),
        config.server.login_ok_path.clone(),
    );
    let views = Views::new(&config.server.name).context("Failed to compile page templates")?;

    Ok(build_rocket_with(figment, flow, views))
}

/// Mount the handshake routes around an already assembled flow
///
/// Hosts registering their own [`AuthHooks`] or identity bridge assemble the
/// [`ChallengeFlow`] themselves and start from here.
pub fn build_rocket_with(figment: Figment, flow: ChallengeFlow, views: Views) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(NoStore)
        .mount(
            "/",
            routes![
                handlers::login_show,
                handlers::login_submit,
                handlers::consent_show,
                handlers::consent_submit,
                handlers::logout_show,
                handlers::logout_submit,
                handlers::health,
            ],
        )
        .register("/", catchers![handlers::not_found])
        .manage(flow)
        .manage(views)
}
