// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! HTML rendering of the login, consent, logout and error pages
//!
//! Templates are compiled into the binary from `resources/forms/` and
//! registered once at startup.

use handlebars::Handlebars;
use serde_json::{json, Value};
use thiserror::Error;

use crate::flow::Page;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Failed to register template '{name}': {reason}")]
    Register { name: String, reason: String },

    #[error("Failed to render template '{name}': {reason}")]
    Render { name: String, reason: String },
}

const PARTIALS: [(&str, &str); 2] = [
    (
        "layout_head",
        include_str!("../../resources/forms/layout_head.hbs"),
    ),
    (
        "layout_foot",
        include_str!("../../resources/forms/layout_foot.hbs"),
    ),
];

const TEMPLATES: [(Page, &str); 4] = [
    (Page::Login, include_str!("../../resources/forms/login.hbs")),
    (
        Page::Consent,
        include_str!("../../resources/forms/consent.hbs"),
    ),
    (Page::Logout, include_str!("../../resources/forms/logout.hbs")),
    (Page::Error, include_str!("../../resources/forms/error.hbs")),
];

/// Template registry shared by all requests
#[derive(Debug)]
pub struct Views {
    handlebars: Handlebars<'static>,
    app_name: String,
}

impl Views {
    /// Compile every page template
    ///
    /// `app_name` is shown in the page titles.
    pub fn new(app_name: &str) -> Result<Self, ViewError> {
        let mut handlebars = Handlebars::new();

        for (name, source) in PARTIALS {
            handlebars
                .register_partial(name, source)
                .map_err(|e| ViewError::Register {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
        }
        for (page, source) in TEMPLATES {
            handlebars
                .register_template_string(page.template_name(), source)
                .map_err(|e| ViewError::Register {
                    name: page.template_name().to_string(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Self {
            handlebars,
            app_name: app_name.to_string(),
        })
    }

    /// Render `page` with the view data built by the flow
    ///
    /// `data` must be a JSON object; `app_name` is added to it.
    pub fn render(&self, page: Page, data: &Value) -> Result<String, ViewError> {
        let mut data = data.clone();
        if let Value::Object(map) = &mut data {
            map.entry("app_name")
                .or_insert_with(|| Value::String(self.app_name.clone()));
        }

        self.handlebars
            .render(page.template_name(), &data)
            .map_err(|e| ViewError::Render {
                name: page.template_name().to_string(),
                reason: e.to_string(),
            })
    }

    pub fn render_error(&self, status: u16, message: &str) -> Result<String, ViewError> {
        self.render(Page::Error, &json!({ "status": status, "message": message }))
    }
}
