use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::{Result, ServerError};

/// Runtime mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ServerError::config(format!(
                "ENVIRONMENT must be development, production or test (got {other:?})"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        })
    }
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | data/inventory.db | SQLite database file |
/// | HTTP_PORT | 8080 | HTTP listen port |
/// | ENVIRONMENT | development | development / production / test |
/// | LOG_LEVEL | info | default log level (`RUST_LOG` wins) |
/// | LOG_DIR | (unset) | directory for daily rolling log files |
/// | REQUEST_TIMEOUT_MS | 15000 | per-request timeout |
/// | SHUTDOWN_TIMEOUT_MS | 15000 | grace period for in-flight requests |
///
/// # Example
///
/// ```ignore
/// DATABASE_PATH=/var/lib/inventory/db.sqlite HTTP_PORT=9000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub http_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub request_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// A variable that is set but cannot be parsed is an error, never a
    /// silent fallback to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "data/inventory.db".into()),
            http_port: parse_var(&get, "HTTP_PORT", 8080)?,
            environment: match get("ENVIRONMENT") {
                Some(v) => v.parse()?,
                None => Environment::default(),
            },
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: get("LOG_DIR"),
            request_timeout_ms: parse_var(&get, "REQUEST_TIMEOUT_MS", 15_000)?,
            shutdown_timeout_ms: parse_var(&get, "SHUTDOWN_TIMEOUT_MS", 15_000)?,
        })
    }

    /// Override the database path, keeping everything else
    ///
    /// Used by tests that point the server at a temporary file.
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ServerError::config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}
