//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Base URL of the remote data API (default: http://127.0.0.1:8000/api/).
    pub api_base_url: Url,

    /// Per-request timeout for the remote API (default: 30s).
    pub api_timeout: Duration,

    /// Delay before retrying a server error once (default: 2000ms).
    pub api_retry_delay: Duration,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Fetch server routes at startup (default: false).
    pub load_remote_routes: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api/".to_string());
        let api_base_url = parse_base_url(&api_base_url)?;

        let api_timeout = env::var("API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("API_TIMEOUT_SECS must be a valid u64")?;

        let api_retry_delay = env::var("API_RETRY_DELAY_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map(Duration::from_millis)
            .context("API_RETRY_DELAY_MS must be a valid u64")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let load_remote_routes = env::var("LOAD_REMOTE_ROUTES")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            port,
            api_base_url,
            api_timeout,
            api_retry_delay,
            cors_allowed_origins,
            load_remote_routes,
        })
    }
}

/// Parse the API base URL, adding the trailing slash `Url::join` needs to
/// keep the last path segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).with_context(|| format!("API_BASE_URL is not a valid URL: {raw}"))
}
