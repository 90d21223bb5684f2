// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the provider admin API client
///
/// Every admin call either succeeds completely or fails with one of these
/// variants. Callers must not assume any partial success: an accept or reject
/// call that failed with [`ProviderError::Unavailable`] may or may not have
/// been committed by the provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The admin API could not be reached, timed out, or answered with a
    /// body that could not be decoded
    #[error("Provider admin API unavailable: {reason}")]
    Unavailable { reason: String, timed_out: bool },

    /// The provider does not know the challenge
    #[error("Challenge not found (provider answered {status})")]
    ChallengeNotFound { status: u16 },

    /// The challenge was already handled or has expired
    #[error("Challenge expired or already handled (provider answered {status})")]
    ChallengeExpired { status: u16 },

    /// Any other 4xx or 5xx answer
    #[error("Provider rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl ProviderError {
    /// HTTP status that should be surfaced to the browser for this error
    ///
    /// Provider answers are propagated verbatim. Transport failures map to
    /// `502 Bad Gateway`, timeouts to `504 Gateway Timeout`.
    pub fn status(&self) -> u16 {
        match self {
            ProviderError::Unavailable { timed_out: true, .. } => 504,
            ProviderError::Unavailable { .. } => 502,
            ProviderError::ChallengeNotFound { status }
            | ProviderError::ChallengeExpired { status }
            | ProviderError::Rejected { status, .. } => *status,
        }
    }

    /// Translate a non-2xx admin API answer
    ///
    /// Informational and redirect answers are not followed and count as an
    /// unusable upstream.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        match status {
            100..=199 | 300..=399 => ProviderError::Unavailable {
                reason: format!("unexpected status {} from the admin API", status),
                timed_out: false,
            },
            404 => ProviderError::ChallengeNotFound { status },
            409 | 410 => ProviderError::ChallengeExpired { status },
            _ => ProviderError::Rejected {
                status,
                message: error_message(body),
            },
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        ProviderError::Unavailable {
            timed_out: err.is_timeout(),
            reason: err.to_string(),
        }
    }
}

/// Error document returned by the provider on failures
#[derive(Debug, Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorDocument>(body) {
        Ok(ErrorDocument {
            error_description: Some(description),
            ..
        }) => description,
        Ok(ErrorDocument {
            error: Some(error), ..
        }) => error,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProviderError::from_status(404, ""),
            ProviderError::ChallengeNotFound { status: 404 }
        );
        assert_eq!(
            ProviderError::from_status(410, ""),
            ProviderError::ChallengeExpired { status: 410 }
        );
        assert_eq!(
            ProviderError::from_status(409, ""),
            ProviderError::ChallengeExpired { status: 409 }
        );
        assert_eq!(ProviderError::from_status(500, "boom").status(), 500);
    }

    #[test]
    fn test_redirect_answers_are_unavailable() {
        for code in [101, 301, 302, 307] {
            let err = ProviderError::from_status(code, "");
            assert!(
                matches!(err, ProviderError::Unavailable { timed_out: false, .. }),
                "status {} gave {:?}",
                code,
                err
            );
            assert_eq!(err.status(), 502);
        }
    }

    #[test]
    fn test_error_message_prefers_description() {
        let body = r#"{"error":"invalid_request","error_description":"The challenge is malformed"}"#;
        match ProviderError::from_status(400, body) {
            ProviderError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "The challenge is malformed");
            }
            other => panic!("unexpected error {:?}", other),
        }

        match ProviderError::from_status(401, r#"{"error":"unauthorized"}"#) {
            ProviderError::Rejected { message, .. } => assert_eq!(message, "unauthorized"),
            other => panic!("unexpected error {:?}", other),
        }

        match ProviderError::from_status(503, "upstream down\n") {
            ProviderError::Rejected { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_status() {
        let err = ProviderError::Unavailable {
            reason: "connection refused".to_string(),
            timed_out: false,
        };
        assert_eq!(err.status(), 502);
        let err = ProviderError::Unavailable {
            reason: "operation timed out".to_string(),
            timed_out: true,
        };
        assert_eq!(err.status(), 504);
    }
}
