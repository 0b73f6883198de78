//! ============================================================================
//! Client Configuration
//! ============================================================================
//! Base URL and session-store path, resolved from the environment with
//! defaults that match a local backend.
//! ============================================================================

use std::path::PathBuf;

use url::Url;

use crate::error::{ClientError, Result};

/// Default backend address when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Env var overriding the backend base URL.
pub const BASE_URL_ENV: &str = "CIVITRACK_API_BASE_URL";

/// Env var overriding the session database path.
pub const DB_PATH_ENV: &str = "CIVITRACK_DB_PATH";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: Url,
    /// None means "use the default location" (~/.civitrack/session.redb).
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw)
            .map_err(|e| ClientError::validation(format!("Invalid {}: {}", BASE_URL_ENV, e)))?;

        let db_path = std::env::var(DB_PATH_ENV).ok().map(PathBuf::from);

        Ok(Self { base_url, db_path })
    }

    /// Config pointing at an explicit base URL (tests, one-off overrides).
    pub fn with_base_url(raw: &str) -> Result<Self> {
        let base_url = Url::parse(raw)
            .map_err(|e| ClientError::validation(format!("Invalid base URL: {}", e)))?;
        Ok(Self {
            base_url,
            db_path: None,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            db_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_backend() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:8000/");
        assert!(cfg.db_path.is_none());
    }

    #[test]
    fn test_rejects_garbage_base_url() {
        assert!(AppConfig::with_base_url("not a url").is_err());
    }
}
