//! Configuration management for hostmix.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a single [`Config`] value holding the
//! Spotify client credentials, the OAuth endpoints, the REST API base and the
//! address the web server binds to.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use reqwest::Url;

/// Default callback registered with the Spotify application.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5000/callback";

/// Scopes needed to read the host profile and top tracks and to write playlists.
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-read-private playlist-modify-public playlist-modify-private user-top-read";

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";

/// Idle time after which a browser session is forgotten.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Upper bound on live sessions; the least recently seen one is evicted first.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `hostmix/.env` under the platform-specific local
/// data directory. When that file does not exist, a `.env` in the current
/// working directory is tried instead. Neither file is mandatory: variables
/// already present in the process environment are enough.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/hostmix/.env`
/// - macOS: `~/Library/Application Support/hostmix/.env`
/// - Windows: `%LOCALAPPDATA%/hostmix/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or if an
/// existing `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use hostmix::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("hostmix/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
        return Ok(());
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Runtime configuration for the web server and the Spotify client.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub show_dialog: bool,
    pub server_address: String,
    pub session_ttl: Duration,
    pub max_sessions: usize,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `SPOTIFY_API_AUTH_CLIENT_ID` or `SPOTIFY_API_AUTH_CLIENT_SECRET`
    /// is missing or empty, when `SPOTIFY_API_URL` is not an absolute URL, or
    /// when `SPOTIFY_API_SHOW_DIALOG`, `SESSION_TTL_SECS` or `MAX_SESSIONS`
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Used by [`Config::from_env`]; tests feed it a map instead of touching
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| value(key).ok_or_else(|| format!("{} must be set", key));
        let or_default = |key: &str, default: &str| value(key).unwrap_or_else(|| default.into());

        let show_dialog = match value("SPOTIFY_API_SHOW_DIALOG") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .map_err(|_| format!("SPOTIFY_API_SHOW_DIALOG must be true or false, got {}", raw))?,
            None => false,
        };

        let api_url = or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        match Url::parse(&api_url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            _ => return Err(format!("SPOTIFY_API_URL is not a valid base URL: {}", api_url)),
        }

        let max_sessions: usize =
            number_or("MAX_SESSIONS", value("MAX_SESSIONS"), DEFAULT_MAX_SESSIONS)?;
        if max_sessions == 0 {
            return Err("MAX_SESSIONS must be at least 1".to_string());
        }

        Ok(Config {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url,
            show_dialog,
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            session_ttl: Duration::from_secs(number_or(
                "SESSION_TTL_SECS",
                value("SESSION_TTL_SECS"),
                DEFAULT_SESSION_TTL_SECS,
            )?),
            max_sessions,
        })
    }

    /// Appends `segments` to the API base.
    ///
    /// Each segment is percent-encoded on its own, so ids taken from user
    /// input can never add path components or a query string.
    pub fn api_endpoint(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| format!("Invalid SPOTIFY_API_URL {}: {}", self.api_url, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("SPOTIFY_API_URL cannot be a base: {}", self.api_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn number_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, String> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a whole number, got {}", key, raw)),
        None => Ok(default),
    }
}
