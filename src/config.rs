//! Configuration management for the sporlproxy backend.
//!
//! Values come from environment variables, optionally seeded from a `.env` file.
//! They are read exactly once at startup into a [`Settings`] snapshot that is then
//! handed to the adapter selector and the HTTP layer. Nothing reads the environment
//! after that point.
//!
//! Lookup order for the `.env` file:
//! 1. `.env` in the current working directory
//! 2. `.env` in the local data directory (`<data_local_dir>/sporlproxy/.env`)
//!
//! Variables already present in the process environment always win over the file.

use std::{env, path::PathBuf, time::Duration};

use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_STREAMING_SERVICE: &str = "spotify";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_FRONTEND_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 5000;

/// Origins the local frontend is served from during development.
pub const DEVELOPMENT_ORIGINS: [&str; 4] = [
    "http://localhost:8080",
    "http://127.0.0.1:8080",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// Loads environment variables from a `.env` file.
///
/// Checks the working directory first, then the platform-specific local data
/// directory (created if it does not exist yet). A missing file is fine since a
/// deployment may only set real environment variables.
///
/// # Returns
///
/// The path of the file that was loaded, or `None` if no file was found.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] if the data directory cannot be created or a
/// `.env` file exists but cannot be parsed.
pub async fn load_env() -> Result<Option<PathBuf>, ConfigError> {
    let local = PathBuf::from(".env");
    if async_fs::metadata(&local).await.is_ok() {
        dotenv::from_path(&local).map_err(|e| ConfigError::Env(e.to_string()))?;
        return Ok(Some(local));
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlproxy/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Env(e.to_string()))?;
    }

    if async_fs::metadata(&path).await.is_err() {
        debug!(path = %path.display(), "no .env file found, using process environment");
        return Ok(None);
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::Env(e.to_string()))?;
    Ok(Some(path))
}

/// Runtime configuration read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Configured streaming service name, lower-cased.
    pub streaming_service: String,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    /// OAuth redirect URI registered with the provider.
    pub redirect_uri: String,
    /// Public origin of the frontend, used for CORS outside development.
    pub frontend_url: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    /// Upper bound for every outbound call.
    pub upstream_timeout: Duration,
    /// Address the HTTP server binds to.
    pub server_addr: String,
    pub development: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper around this; tests pass a map instead so they
    /// never have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let streaming_service = non_empty("STREAMING_SERVICE")
            .unwrap_or_else(|| DEFAULT_STREAMING_SERVICE.to_string())
            .to_lowercase();

        let upstream_timeout = non_empty("UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        let server_addr = non_empty("SERVER_ADDRESS").unwrap_or_else(|| {
            let port = non_empty("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);
            format!("0.0.0.0:{port}")
        });

        let development = lookup("DYNO").is_none()
            || non_empty("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("development"));

        Self {
            streaming_service,
            spotify_client_id: credential(lookup("SPOTIFY_CLIENT_ID")),
            spotify_client_secret: credential(lookup("SPOTIFY_CLIENT_SECRET")),
            redirect_uri: non_empty("REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            spotify_auth_url: non_empty("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_AUTH_URL.to_string()),
            spotify_token_url: non_empty("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            spotify_api_url: non_empty("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            upstream_timeout: Duration::from_secs(upstream_timeout),
            server_addr,
            development,
        }
    }

    /// Origins allowed to call the backend from a browser.
    pub fn allowed_origins(&self) -> Vec<String> {
        if self.development {
            DEVELOPMENT_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            vec![self.frontend_url.trim_end_matches('/').to_string()]
        }
    }
}

/// Treats empty and placeholder values as unset.
fn credential(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "None")
}

/// Debug view of a secret: only whether it is present.
pub fn presence(value: &Option<String>) -> &'static str {
    if value.is_some() { "SET" } else { "NOT SET" }
}
