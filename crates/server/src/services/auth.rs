//! Admin authentication service.
//!
//! The back-office uses one shared password compared against the configured
//! `ADMIN_PASSWORD`. There is no admin user table; a successful login yields
//! the fixed shared identity, which the session codec then signs into a
//! cookie.

use secrecy::ExposeSecret;

use crate::config::ServerConfig;
use crate::models::CurrentAdmin;

/// Shared-password authentication for the back-office.
pub struct AdminAuthService<'a> {
    config: &'a ServerConfig,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(config: &'a ServerConfig) -> Self {
        Self { config }
    }

    /// Check a submitted password against the configured secret.
    ///
    /// Returns the shared admin identity on a match, `None` otherwise.
    #[must_use]
    pub fn authenticate(&self, password: &str) -> Option<CurrentAdmin> {
        if password.as_bytes() == self.config.admin_password.expose_secret().as_bytes() {
            Some(CurrentAdmin::shared())
        } else {
            None
        }
    }
}
