//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub server_port: u16,
    /// Prefix for logo URLs; empty means root-relative (`/logos/...`).
    pub public_base_url: String,
    /// Allowed browser origin for credentialed CORS. `None` allows any origin without credentials.
    pub cors_origin: Option<String>,
    pub history_limit: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            server_port: DEFAULT_PORT,
            public_base_url: String::new(),
            cors_origin: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String { lookup(key).unwrap_or_default().trim().to_string() };

        let data_dir = {
            let d = g("QRFORGE_DATA_DIR");
            if d.is_empty() { default_data_dir() } else { PathBuf::from(d) }
        };
        let cors_origin = {
            let o = g("CORS_ORIGIN");
            if o.is_empty() { None } else { Some(o) }
        };
        let history_limit = parse_i64(&g("HISTORY_LIMIT"), DEFAULT_HISTORY_LIMIT);

        Self {
            data_dir,
            server_port: parse_u16(&g("SERVER_PORT"), DEFAULT_PORT),
            public_base_url: g("PUBLIC_BASE_URL").trim_end_matches('/').to_string(),
            cors_origin,
            history_limit: if history_limit > 0 { history_limit } else { DEFAULT_HISTORY_LIMIT },
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("qrforge.db")
    }

    pub fn logos_dir(&self) -> PathBuf {
        self.data_dir.join("logos")
    }

    /// Public URL of a stored logo.
    pub fn logo_url(&self, key: &str) -> String {
        format!("{}/logos/{}", self.public_base_url, key)
    }
}

/// ~/.qrforge, or ./.qrforge when no home directory is known.
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".qrforge")
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_i64(s: &str, default: i64) -> i64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
