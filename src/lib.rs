// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Login, consent and logout provider for an OAuth2 / OpenID Connect
//! authorization server
//!
//! The authorization server redirects the browser here with a single-use
//! challenge. This crate authenticates the user, asks for consent and
//! confirms logouts, then resolves the challenge through the server's admin
//! API and sends the browser back.
//!
//! - [`config`] - YAML configuration with JSON schema validation
//! - [`provider`] - admin API client
//! - [`session`] - user lookup, password check and cookie session
//! - [`policy`] - consent skip rules and grant assembly
//! - [`flow`] - the show/submit operations of each phase
//! - [`views`] - HTML pages
//! - [`server`] - Rocket routes

pub mod config;
pub mod flow;
pub mod policy;
pub mod provider;
pub mod server;
pub mod session;
pub mod views;
