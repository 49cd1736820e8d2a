//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::Db;
use crate::services::SessionCodec;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the hosted database client, and the session codec.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    db: Db,
    sessions: SessionCodec,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let db = Db::new(&config.database);
        let sessions = SessionCodec::new(config.session_secret.clone(), config.is_secure());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                sessions,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the hosted database client.
    #[must_use]
    pub fn db(&self) -> &Db {
        &self.inner.db
    }

    /// Get a reference to the session codec.
    #[must_use]
    pub fn sessions(&self) -> &SessionCodec {
        &self.inner.sessions
    }
}
