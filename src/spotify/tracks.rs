use reqwest::Client;

use crate::{
    config::Config,
    error::Result,
    spotify::{endpoint, read_json},
    types::{TopTracksResponse, Track},
};

/// Retrieves up to `limit` of the user's top tracks, in the order Spotify ranks them.
///
/// # Arguments
///
/// * `config` - Endpoint configuration
/// * `token` - Valid access token carrying the `user-top-read` scope
/// * `limit` - Number of tracks to request (1-50)
///
/// # Errors
///
/// Returns [`Error::UpstreamApi`](crate::error::Error::UpstreamApi) when
/// Spotify rejects the request or answers with an unexpected body.
pub async fn get_top_tracks(config: &Config, token: &str, limit: u32) -> Result<Vec<Track>> {
    let client = Client::new();
    let res = client
        .get(endpoint(config, &["me", "top", "tracks"])?)
        .query(&[("limit", limit)])
        .bearer_auth(token)
        .send()
        .await?;

    let json = read_json::<TopTracksResponse>(res).await?;
    Ok(json.items)
}
