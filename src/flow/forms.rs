// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Capabilities a submitted form must offer to each phase
//!
//! The submit handlers are generic over these traits, so a body type that
//! lacks a capability is rejected at compile time. Bodies that cannot be
//! decoded at all are turned into
//! [`FlowError::TypeContractViolation`](super::FlowError::TypeContractViolation)
//! by the HTTP layer.

/// Carries the challenge rendered into the hidden form field
pub trait ChallengeValues {
    fn challenge(&self) -> &str;
}

/// Carries login credentials
pub trait CredentialValues {
    /// Principal id typed by the user
    fn pid(&self) -> &str;
    fn password(&self) -> &str;
}

/// Carries the remember-me choice
pub trait RememberValues {
    /// True only when the form explicitly asked to be remembered
    fn should_remember(&self) -> bool;
}

/// Carries an optional post-login redirect override (`redir`)
pub trait RedirectValues {
    fn redirect_override(&self) -> Option<&str>;
}

/// Carries the resource owner's consent decision
pub trait ConsentValues {
    fn is_allowed(&self) -> bool;
    fn granted_scopes(&self) -> &[String];
    fn requested_audience(&self) -> &[String];
}

/// Carries the logout confirmation
pub trait LogoutValues {
    fn should_logout(&self) -> bool;
}

/// Accept a redirect override only when it stays on this site
///
/// Only absolute paths are followed. Protocol-relative URLs (`//host`),
/// backslash tricks and anything with a scheme are refused.
pub fn safe_local_redirect(raw: &str) -> Option<&str> {
    let candidate = raw.trim();
    let local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.starts_with("/\\")
        && !candidate.chars().any(char::is_control);
    local.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_local_redirect() {
        assert_eq!(safe_local_redirect("/account"), Some("/account"));
        assert_eq!(safe_local_redirect(" /a?b=c "), Some("/a?b=c"));
        assert_eq!(safe_local_redirect("//evil.example.org"), None);
        assert_eq!(safe_local_redirect("/\\evil.example.org"), None);
        assert_eq!(safe_local_redirect("https://evil.example.org"), None);
        assert_eq!(safe_local_redirect("javascript:alert(1)"), None);
        assert_eq!(safe_local_redirect("/line\nbreak"), None);
        assert_eq!(safe_local_redirect(""), None);
    }
}
