// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use serde_json::{Map, Value};

use super::Challenge;

/// Values handed to the template of a rendered page
pub type ViewData = Map<String, Value>;

/// Challenge and view data accumulated while handling one request
///
/// Built by the phase handlers and passed by value into
/// [`FlowOutcome::Render`](super::FlowOutcome::Render). The challenge, when
/// known, is always part of the view data under `challenge` so the rendered
/// form can post it back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub challenge: Option<Challenge>,
    pub data: ViewData,
}

impl RequestContext {
    pub fn new(challenge: &Challenge) -> Self {
        let mut data = ViewData::new();
        data.insert(
            "challenge".to_string(),
            Value::String(challenge.as_str().to_string()),
        );
        Self {
            challenge: Some(challenge.clone()),
            data,
        }
    }

    /// Add a view value, replacing any previous value for `key`
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}
