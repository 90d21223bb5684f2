// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # HTTP surface
//!
//! Rocket routes serving the three handshake pages:
//!
//! | Route                                | Operation                         |
//! |--------------------------------------|-----------------------------------|
//! | `GET /login?login_challenge=&redir=` | [`ChallengeFlow::login_show`]     |
//! | `POST /login`                        | [`ChallengeFlow::login_submit`]   |
//! | `GET /consent?consent_challenge=`    | [`ChallengeFlow::consent_show`]   |
//! | `POST /consent`                      | [`ChallengeFlow::consent_submit`] |
//! | `GET /logout?logout_challenge=`      | [`ChallengeFlow::logout_show`]    |
//! | `POST /logout`                       | [`ChallengeFlow::logout_submit`]  |
//! | `GET /health`                        | liveness probe                    |
//!
//! [`ChallengeFlow::login_show`]: crate::flow::ChallengeFlow::login_show
//! [`ChallengeFlow::login_submit`]: crate::flow::ChallengeFlow::login_submit
//! [`ChallengeFlow::consent_show`]: crate::flow::ChallengeFlow::consent_show
//! [`ChallengeFlow::consent_submit`]: crate::flow::ChallengeFlow::consent_submit
//! [`ChallengeFlow::logout_show`]: crate::flow::ChallengeFlow::logout_show
//! [`ChallengeFlow::logout_submit`]: crate::flow::ChallengeFlow::logout_submit

mod builder;
mod fairing;
pub mod forms;
mod handlers;
mod responses;

pub use builder::{build_rocket, build_rocket_with, figment_from_config};
pub use fairing::NoStore;
pub use responses::FlowResponse;
