// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Wire types of the provider admin API
//!
//! Requests fetched with a challenge are immutable snapshots of the provider's
//! state. The provider may send `null` for any list or string, which is read
//! as the empty value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata about the OAuth2 client that started the flow
///
/// Display only. Nothing in the handshake is decided from these values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo_uri: String,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub policy_uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tos_uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_logout_redirect_uris: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub redirect_uris: Vec<String>,
}

impl ClientInfo {
    /// Flatten the client descriptor into the map exposed to templates
    pub fn to_view(&self) -> Value {
        json!({
            "id": self.client_id,
            "name": self.client_name,
            "client_uri": self.client_uri,
            "contacts": self.contacts,
            "logo_uri": self.logo_uri,
            "metadata": self.metadata.clone().unwrap_or(Value::Object(Map::new())),
            "owner": self.owner,
            "policy_uri": self.policy_uri,
            "tos_uri": self.tos_uri,
            "post_logout_redirect_uris": self.post_logout_redirect_uris,
            "redirect_uris": self.redirect_uris,
        })
    }
}

/// Pending login decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub challenge: String,
    /// The provider already authenticated this subject and needs no UI
    #[serde(default, deserialize_with = "null_as_default")]
    pub skip: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_scope: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_access_token_audience: Vec<String>,
    #[serde(default)]
    pub client: Option<ClientInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(default)]
    pub oidc_context: Option<Value>,
}

/// Pending consent decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsentRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub challenge: String,
    /// The subject already granted this client the requested access
    #[serde(default, deserialize_with = "null_as_default")]
    pub skip: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_scope: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_access_token_audience: Vec<String>,
    #[serde(default)]
    pub client: Option<ClientInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_url: String,
    /// Correlates this consent with the login that preceded it
    #[serde(default, deserialize_with = "null_as_default")]
    pub login_session_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub login_challenge: String,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub oidc_context: Option<Value>,
}

/// Pending logout decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogoutRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_url: String,
    /// True when the logout was started by the relying party
    #[serde(default, deserialize_with = "null_as_default")]
    pub rp_initiated: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
}

/// Body of an accept-login call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptLogin {
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remember: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remember_for: Option<i64>,
}

impl AcceptLogin {
    /// Accept for a subject the provider already knows, without remember-me
    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            remember: None,
            remember_for: None,
        }
    }
}

/// Body of an accept-consent call
///
/// `session` is forwarded verbatim to the provider, which embeds it into the
/// tokens it issues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantDecision {
    pub grant_scope: Vec<String>,
    pub grant_access_token_audience: Vec<String>,
    pub session: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remember: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remember_for: Option<i64>,
}

/// Body of a reject call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectRequest {
    pub error: String,
    pub error_description: String,
}

impl RejectRequest {
    /// The resource owner refused to grant access
    pub fn access_denied() -> Self {
        Self {
            error: "access_denied".to_string(),
            error_description: "The resource owner denied the request".to_string(),
        }
    }
}

/// Answer of every accept/reject call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRequest {
    pub redirect_to: String,
}
