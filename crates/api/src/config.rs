//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — PostgreSQL connection string (default: unset, in-memory store)
/// - `DATABASE_MAX_CONNECTIONS` — pool size (default: `5`)
/// - `USER_SERVICE_URL` — base URL of the user directory (default: `"http://localhost:8081"`)
/// - `USER_SERVICE_TIMEOUT_MS` — per-request timeout for the user directory (default: `2000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub user_service_url: String,
    pub user_service_timeout_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            user_service_url: lookup("USER_SERVICE_URL").unwrap_or(defaults.user_service_url),
            user_service_timeout_ms: lookup("USER_SERVICE_TIMEOUT_MS")
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(defaults.user_service_timeout_ms),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the user directory request timeout.
    pub fn user_service_timeout(&self) -> Duration {
        Duration::from_millis(self.user_service_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            database_max_connections: 5,
            user_service_url: "http://localhost:8081".to_string(),
            user_service_timeout_ms: 2000,
        }
    }
}
