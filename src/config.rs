//! Configuration management for the top tracks heatmap server.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. The identity provider credentials are required; everything else
//! falls back to defaults that talk to the real Spotify endpoints and listen
//! on the fixed local port.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf};

use reqwest::Url;

use crate::errors::ConfigError;

pub const APP_DIR: &str = "top-heat";

const DEFAULT_SCOPE: &str = "user-top-read";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
const TOKEN_CACHE_FILE: &str = "token_info.json";

/// Loads environment variables from `.env` files.
///
/// The working directory is tried first, then the platform specific local
/// data directory:
/// - Linux: `~/.local/share/top-heat/.env`
/// - macOS: `~/Library/Application Support/top-heat/.env`
/// - Windows: `%LOCALAPPDATA%/top-heat/.env`
///
/// Both files are optional. `dotenv` never overrides variables that are
/// already set, so the first file wins over the second and the real
/// environment wins over both.
///
/// Returns the files that were actually loaded.
pub fn load_env() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenv::dotenv() {
        loaded.push(path);
    }

    let mut path = data_dir();
    path.push(".env");
    if path.is_file() && dotenv::from_path(&path).is_ok() {
        loaded.push(path);
    }

    loaded
}

/// Local data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Everything the server needs to know at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: Url,
    pub token_url: Url,
    /// Web API base without a trailing slash.
    pub api_url: String,
    pub server_addr: SocketAddr,
    pub token_cache_path: PathBuf,
    /// How often a transient upstream failure is retried. Zero disables
    /// retrying.
    pub fetch_retries: u32,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `CLIENT_ID`, `CLIENT_SECRET` or `REDIRECT_URI` is unset or
    /// empty, or when an optional value is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));
        let url = |name: &'static str, default: &str| {
            let value = get(name).unwrap_or_else(|| default.to_string());
            Url::parse(&value).map_err(|_| ConfigError::InvalidUrl { name, value })
        };

        let client_id = required("CLIENT_ID")?;
        let client_secret = required("CLIENT_SECRET")?;
        let redirect_uri = required("REDIRECT_URI")?;

        let api_url = url("SPOTIFY_API_URL", DEFAULT_API_URL)?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let addr = get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
        let server_addr = addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddress(addr.clone()))?;

        let fetch_retries = match get("FETCH_RETRIES") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidRetries(value.clone()))?,
            None => 0,
        };

        let token_cache_path = get("TOKEN_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join(TOKEN_CACHE_FILE));

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            scope: get("SPOTIFY_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: url("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL)?,
            token_url: url("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL)?,
            api_url,
            server_addr,
            token_cache_path,
            fetch_retries,
        })
    }
}
