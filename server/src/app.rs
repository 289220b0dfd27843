use std::path::PathBuf;
use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use history_db::Database;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

/// Application shared state handed to every axum handler.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    config: AppConfig,
    db: Database,
    /// Signs the owner-id cookie
    cookie_key: Key,
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Create shared state from an already-opened database and loaded config.
    pub fn new(db: Database, config: AppConfig, cookie_key: Key) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                db,
                cookie_key,
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn logos_dir(&self) -> PathBuf {
        self.inner.config.logos_dir()
    }

    pub fn cookie_key(&self) -> &Key {
        &self.inner.cookie_key
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
