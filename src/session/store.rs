// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;
use rocket::http::{Cookie, CookieJar, SameSite};

use super::SessionStore;

/// Session key holding the logged-in principal id
pub const SESSION_KEY: &str = "uid";

/// Session values are stored as private cookies
///
/// Private cookies are encrypted and authenticated with the Rocket
/// `secret_key`, so the browser can neither read nor forge them.
impl SessionStore for CookieJar<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.get_private(key).map(|cookie| cookie.value().to_string())
    }

    fn put(&self, key: &str, value: &str) {
        let mut cookie = Cookie::new(key.to_string(), value.to_string());
        cookie.set_http_only(true);
        cookie.set_path("/");
        cookie.set_same_site(SameSite::Lax);
        self.add_private(cookie);
    }

    fn remove(&self, key: &str) {
        self.remove_private(Cookie::new(key.to_string(), ""));
    }

    fn clear(&self) {
        let names: Vec<String> = self.iter().map(|c| c.name().to_string()).collect();
        debug!("Clearing {} session cookie(s)", names.len());
        for name in names {
            self.remove_private(Cookie::new(name, ""));
        }
    }
}

/// In-memory [`SessionStore`]
///
/// Used where no browser is involved, mostly in tests.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already holding a logged-in principal
    pub fn with_user(pid: &str) -> Self {
        let session = Self::new();
        session.put(SESSION_KEY, pid);
        session
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values().remove(key);
    }

    fn clear(&self) {
        self.values().clear();
    }
}
