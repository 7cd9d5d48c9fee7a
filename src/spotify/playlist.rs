use reqwest::Client;

use crate::{
    config::Config,
    error::Result,
    spotify::{endpoint, read_json},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
};

pub const PLAYLIST_DESCRIPTION: &str = "Recommendations seeded by the host's top tracks.";

/// Creates a new, public, empty playlist owned by `user_id`.
///
/// The playlist always gets [`PLAYLIST_DESCRIPTION`] as its description.
///
/// # Errors
///
/// Spotify answers 404 for an unknown user id and 403 when the token lacks
/// the playlist-modify scopes; both surface as
/// [`Error::UpstreamApi`](crate::error::Error::UpstreamApi). `user_id` is
/// sent as one encoded path segment, so `../me` names a user called `../me`.
///
/// # Example
///
/// ```
/// let playlist = create(&config, &token, "smedjan", "Friday mix").await?;
/// println!("created {}", playlist.id);
/// ```
pub async fn create(
    config: &Config,
    token: &str,
    user_id: &str,
    name: &str,
) -> Result<CreatePlaylistResponse> {
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: PLAYLIST_DESCRIPTION.to_string(),
        public: true,
        collaborative: false,
    };

    let client = Client::new();
    let res = client
        .post(endpoint(config, &["users", user_id, "playlists"])?)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    read_json::<CreatePlaylistResponse>(res).await
}

/// Appends `uris` to the playlist in one request, keeping their order.
///
/// Duplicates are sent as given; Spotify stores them as separate entries.
pub async fn add_tracks(
    config: &Config,
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<AddTrackToPlaylistResponse> {
    let body = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
    };

    let client = Client::new();
    let res = client
        .post(endpoint(config, &["playlists", playlist_id, "tracks"])?)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    read_json::<AddTrackToPlaylistResponse>(res).await
}
