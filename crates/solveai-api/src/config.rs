//! Server configuration read from the environment.
//!
//! Environment variables:
//!   HOST             - bind address (default: 0.0.0.0)
//!   PORT             - bind port (default: 5000)
//!   DATABASE_URL     - SQLite catalog location (default: sqlite://solveai.db?mode=rwc)
//!   MAX_BODY_BYTES   - request body limit (default: 25 MiB)
//!   ALLOWED_ORIGINS  - comma separated CORS whitelist
//!
//! Model settings (`GEMINI_*`) are read by the inference crate.

use axum::http::HeaderValue;
use tracing::warn;

use solveai_core::defaults;

/// Settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_body_bytes: usize,
    pub allowed_origins: Vec<HeaderValue>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            database_url: defaults::DATABASE_URL.to_string(),
            max_body_bytes: defaults::MAX_BODY_BYTES,
            allowed_origins: parse_allowed_origins(defaults::ALLOWED_ORIGINS),
        }
    }
}

impl ApiConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// Unparseable numbers are logged and replaced by their default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HOST") {
            if !host.trim().is_empty() {
                config.host = host.trim().to_string();
            }
        }
        if let Some(port) = env_number::<u16>("PORT") {
            config.port = port;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                config.database_url = url.trim().to_string();
            }
        }
        if let Some(limit) = env_number::<usize>("MAX_BODY_BYTES") {
            config.max_body_bytes = limit;
        }
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            if !origins.trim().is_empty() {
                config.allowed_origins = parse_allowed_origins(&origins);
            }
        }

        config
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid {}='{}'", name, raw);
            None
        }
    }
}

/// Parse a comma separated origin list, dropping entries that are not valid
/// header values.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}
