// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Translation of flow outcomes and errors into HTTP responses

use log::{error, warn};
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::{self, status, Flash, Redirect, Responder};
use rocket::Request;
use serde_json::Value;

use crate::flow::{FlowError, FlowOutcome, RedirectStatus, Redirection};
use crate::views::Views;

/// Every successful answer of the handshake routes
#[derive(Responder)]
pub enum FlowResponse {
    Page(status::Custom<RawHtml<String>>),
    Redirect(Redirect),
    Notice(Flash<Redirect>),
    /// The request carried no challenge
    #[response(status = 204)]
    Deferred(()),
}

impl FlowResponse {
    /// Turn a flow outcome into a response
    ///
    /// `notice` is a flash message left by a previous redirect, shown on
    /// rendered pages.
    pub fn from_outcome(
        views: &Views,
        outcome: FlowOutcome,
        notice: Option<String>,
    ) -> Result<Self, FlowError> {
        match outcome {
            FlowOutcome::Deferred => Ok(FlowResponse::Deferred(())),
            FlowOutcome::Render {
                page,
                status,
                context,
            } => {
                let mut data = context.to_value();
                if let (Some(notice), Value::Object(map)) = (notice, &mut data) {
                    map.insert("notice".to_string(), Value::String(notice));
                }
                let html = views
                    .render(page, &data)
                    .map_err(|e| FlowError::Render(e.to_string()))?;
                let status = Status::from_code(status).unwrap_or(Status::Ok);
                Ok(FlowResponse::Page(status::Custom(status, RawHtml(html))))
            }
            FlowOutcome::Redirect(redirection) => Ok(Self::redirect(redirection)),
        }
    }

    fn redirect(redirection: Redirection) -> Self {
        let Redirection {
            location,
            status,
            notice,
        } = redirection;
        let redirect = match status {
            RedirectStatus::Found => Redirect::found(location),
            RedirectStatus::Temporary => Redirect::temporary(location),
        };
        match notice {
            Some(notice) => FlowResponse::Notice(Flash::success(redirect, notice)),
            None => FlowResponse::Redirect(redirect),
        }
    }
}

/// Errors are rendered with the error page, or as plain text when the
/// template registry is not available
impl<'r> Responder<'r, 'static> for FlowError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = Status::from_code(self.status()).unwrap_or(Status::InternalServerError);
        if status.code >= 500 {
            error!("{} {} failed: {}", request.method(), request.uri(), self);
        } else {
            warn!("{} {} failed: {}", request.method(), request.uri(), self);
        }

        let message = self.to_string();
        let page = request
            .rocket()
            .state::<Views>()
            .map(|views| views.render_error(status.code, &message));
        match page {
            Some(Ok(html)) => status::Custom(status, RawHtml(html)).respond_to(request),
            Some(Err(e)) => {
                error!("Cannot render error page: {}", e);
                status::Custom(status, message).respond_to(request)
            }
            None => status::Custom(status, message).respond_to(request),
        }
    }
}
