//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup. The JWT secret is shared with the external
//! identity provider that issues session tokens.

use std::env;

use crate::services::feed::FeedLimits;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// HS256 secret used to verify session tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Expected `aud` claim on session tokens
    pub jwt_audience: String,
    /// Bounds applied when building the activity feed
    pub feed_limits: FeedLimits,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            jwt_audience: "authenticated".to_string(),
            feed_limits: FeedLimits::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first when present (local development).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = FeedLimits::default();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8080)?,
            jwt_secret: env::var("JWT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            jwt_audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
            feed_limits: FeedLimits {
                per_source: parse_or("FEED_PER_SOURCE_LIMIT", defaults.per_source)?,
                total: parse_or("FEED_TOTAL_LIMIT", defaults.total)?,
            },
        })
    }
}

/// Read a numeric variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
