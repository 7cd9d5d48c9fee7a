//! # Spotify Integration Module
//!
//! This module wraps the handful of Spotify endpoints hostmix needs: the two
//! grants of the accounts service and five calls against the versioned Web
//! API. Every function takes the [`Config`](crate::config::Config) that names
//! the endpoints, so the same code talks to Spotify in production and to a
//! mock server in tests.
//!
//! ## Architecture
//!
//! ```text
//! Web layer (api handlers)
//!          ↓
//! Workflow / TokenManager (management)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorize URL, code and refresh grants)
//!     ├── User (current profile)
//!     ├── Tracks (top tracks)
//!     ├── Recommendations (seeded by track ids)
//!     └── Playlist (create, append tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## API Coverage
//!
//! ### Authentication
//! - `GET /authorize` - Authorization URL the browser is redirected to
//! - `POST /api/token` - Code exchange and refresh grants
//!
//! ### Web API
//! - `GET /me` - Profile of the authenticated user
//! - `GET /me/top/tracks` - The user's top tracks
//! - `GET /recommendations` - Recommendations for up to five seed tracks
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - Append tracks to a playlist
//!
//! ## Error Handling
//!
//! Web API responses go through [`read_json`], which maps non-2xx statuses
//! and bodies that do not match the expected shape onto
//! [`Error::UpstreamApi`]. Token endpoint failures are reported as
//! [`Error::Auth`] by the `auth` module. There are no retries.

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{Error, Result},
    types::ApiErrorResponse,
};

pub mod auth;
pub mod playlist;
pub mod recommendations;
pub mod tracks;
pub mod user;

/// Web API URL for `segments`, each one percent-encoded as a single path segment.
pub(crate) fn endpoint(config: &Config, segments: &[&str]) -> Result<Url> {
    config.api_endpoint(segments).map_err(Error::Config)
}

/// Decodes a Web API response body into `T`.
///
/// # Errors
///
/// - [`Error::UpstreamApi`] carrying Spotify's error message for non-2xx statuses
/// - [`Error::UpstreamApi`] when a 2xx body is not valid JSON for `T`
/// - [`Error::Http`] when the body cannot be read
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => api_error.error.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => body,
        };
        return Err(Error::upstream(status.as_u16(), message));
    }

    serde_json::from_str::<T>(&body).map_err(|e| {
        Error::upstream(status.as_u16(), format!("malformed response body: {}", e))
    })
}
