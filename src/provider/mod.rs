// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Provider admin API
//!
//! Client side of the authorization server's administrative API. The provider
//! hands this service opaque, single-use challenges; this module fetches the
//! pending request behind a challenge and resolves it (accept or reject).
//!
//! - [`client`] - the [`AdminApi`] trait and its reqwest implementation
//! - [`types`] - JSON request and response bodies
//! - [`error`] - translation of transport and HTTP failures

pub mod client;
pub mod error;
pub mod types;

pub use client::{AdminApi, AdminClient, Phase, DEFAULT_TIMEOUT};
#[cfg(test)]
pub use client::MockAdminApi;
pub use error::ProviderError;
pub use types::{
    AcceptLogin, ClientInfo, CompletedRequest, ConsentRequest, GrantDecision, LoginRequest,
    LogoutRequest, RejectRequest,
};
